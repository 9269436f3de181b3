use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::environment::check_dimensions;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub size: usize,
    pub obstacle_count: usize,
    pub episodes: usize,
    /// Delay before the agent's first move.
    pub first_tick_ms: u64,
    /// Delay between later moves.
    pub tick_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Settings {
    /// Layers defaults, then the optional TOML file, then `TREASURE_*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("size", defaults.size as i64)?
            .set_default("obstacle_count", defaults.obstacle_count as i64)?
            .set_default("episodes", defaults.episodes as i64)?
            .set_default("first_tick_ms", defaults.first_tick_ms as i64)?
            .set_default("tick_ms", defaults.tick_ms as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix("TREASURE").try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.size, self.obstacle_count)
    }

    pub fn first_tick(&self) -> Duration {
        Duration::from_millis(self.first_tick_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size: 5,
            obstacle_count: 3,
            episodes: 1,
            first_tick_ms: 1000,
            tick_ms: 700,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::env;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};

    // Serialises every load so a TREASURE_* variable set by one test is
    // never seen by another
    static LOAD_LOCK: Mutex<()> = Mutex::new(());

    fn lock() -> MutexGuard<'static, ()> {
        LOAD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sets an environment variable for the lifetime of the guard.
    struct EnvVar {
        key: &'static str,
        previous: Option<String>,
    }

    impl EnvVar {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var(key).ok();
            env::set_var(key, value);
            EnvVar { key, previous }
        }
    }

    impl Drop for EnvVar {
        fn drop(&mut self) {
            match &self.previous {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn defaults_match_classic_board() {
        let settings = Settings::default();
        assert_eq!(settings.size, 5);
        assert_eq!(settings.obstacle_count, 3);
        assert_eq!(settings.first_tick(), Duration::from_millis(1000));
        assert_eq!(settings.tick(), Duration::from_millis(700));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn file_overrides_defaults() {
        let _lock = lock();
        let file = toml_file("size = 6\nobstacle_count = 4\nseed = 42\n");
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.size, 6);
        assert_eq!(settings.obstacle_count, 4);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.episodes, 1);
        assert_eq!(settings.tick_ms, 700);
    }

    #[test]
    fn crowded_file_is_rejected() {
        let _lock = lock();
        let file = toml_file("size = 3\nobstacle_count = 8\n");
        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn missing_file_is_an_error() {
        let _lock = lock();
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn environment_overrides_file_and_defaults() {
        let _lock = lock();
        let file = toml_file("obstacle_count = 4\nseed = 42\n");
        let _count = EnvVar::set("TREASURE_OBSTACLE_COUNT", "2");
        let _seed = EnvVar::set("TREASURE_SEED", "7");

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.obstacle_count, 2);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.size, 5);

        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.obstacle_count, 2);
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn crowded_environment_value_is_rejected() {
        let _lock = lock();
        let _count = EnvVar::set("TREASURE_OBSTACLE_COUNT", "24");
        let err = Settings::load(None).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }
}
