use thiserror::Error;

use crate::environment::Pos;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Agent cannot step from {from} to {to}: cells are not adjacent")]
    NonAdjacentStep { from: Pos, to: Pos },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    pub(crate) fn invalid_configuration(reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
