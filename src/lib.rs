//! Treasure hunt on a small grid: an agent walks from (0, 0) to a randomly
//! placed treasure along the shortest path that avoids the traps.
//!
//! Modules:
//! - environment: grid, cells, coordinates and random map generation
//! - pathfinding: A* search with the Manhattan heuristic
//! - agent: walks a found path one cell per tick
//! - episode: one generate / search / walk round
//! - config: layered settings for the demo binary
//! - error: Error and Result

pub mod agent;
pub mod config;
pub mod environment;
pub mod episode;
pub mod error;
pub mod pathfinding;

pub mod prelude {
    pub use crate::agent::{Agent, Step};
    pub use crate::config::Settings;
    pub use crate::environment::{Cell, Env, Movement, Pos};
    pub use crate::episode::{Episode, Outcome};
    pub use crate::error::{Error, Result};
    pub use crate::pathfinding::{find_path, manhattan, SearchPath};
}
