use crate::environment::{Env, Pos};
use crate::error::{Error, Result};
use crate::pathfinding::SearchPath;

/// Result of one traversal tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// The agent moved onto this cell.
    Moved(Pos),
    /// Only the goal is left on the path.
    Arrived,
    /// Nothing left to follow.
    Stalled,
}

pub struct Agent {
    pub pos: Pos,
    moves: usize,
}

impl Agent {
    pub fn new(env: &Env) -> Self {
        Self {
            pos: env.start_pos(),
            moves: 0,
        }
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn r#move(&mut self, to: Pos) -> Result<()> {
        if !self.pos.is_adjacent(to) {
            return Err(Error::NonAdjacentStep { from: self.pos, to });
        }
        self.pos = to;
        self.moves += 1;
        Ok(())
    }

    /// Consumes the front of `path` and steps onto the next cell.
    ///
    /// The last coordinate is never consumed; reaching it reports `Arrived`.
    pub fn advance(&mut self, path: &mut SearchPath) -> Result<Step> {
        if path.len() == 1 {
            return Ok(Step::Arrived);
        }
        path.pop_front();
        match path.front() {
            Some(next) => {
                self.r#move(next)?;
                Ok(Step::Moved(next))
            }
            None => Ok(Step::Stalled),
        }
    }
}
