use rand::Rng;
use tracing::{debug, info, warn};

use crate::agent::{Agent, Step};
use crate::config::Settings;
use crate::environment::Env;
use crate::error::Result;
use crate::pathfinding::{find_path, SearchPath};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A path exists and the agent is still walking it.
    InProgress,
    NoPath,
    Reached { steps: usize },
}

/// One round: a fresh grid, a single search, then the walk.
pub struct Episode {
    env: Env,
    agent: Agent,
    path: Option<SearchPath>,
    outcome: Outcome,
}

impl Episode {
    pub fn new<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Result<Self> {
        let env = Env::generate(settings.size, settings.obstacle_count, rng)?;
        Ok(Self::with_env(env))
    }

    pub fn with_env(env: Env) -> Self {
        let agent = Agent::new(&env);
        let path = find_path(&env, env.start_pos(), env.goal_pos());
        let outcome = match &path {
            Some(path) => {
                info!(goal = %env.goal_pos(), moves = path.moves(), "Planned path");
                Outcome::InProgress
            }
            None => {
                warn!(goal = %env.goal_pos(), "No safe path to treasure");
                Outcome::NoPath
            }
        };
        debug!("\n{}", env);
        Self { env, agent, path, outcome }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn path(&self) -> Option<&SearchPath> {
        self.path.as_ref()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn render(&self) -> String {
        self.env.render_with_agent(self.agent.pos)
    }

    /// Advances the agent by one cell.
    pub fn tick(&mut self) -> Result<Step> {
        let step = match self.path.as_mut() {
            Some(path) => self.agent.advance(path)?,
            None => Step::Stalled,
        };
        if step == Step::Arrived && self.outcome == Outcome::InProgress {
            self.outcome = Outcome::Reached { steps: self.agent.moves() };
            info!(steps = self.agent.moves(), "Agent found the treasure");
        }
        Ok(step)
    }

    /// Ticks until the goal is reached or there is nothing to follow,
    /// calling `on_move` after every move.
    pub fn run<F>(&mut self, mut on_move: F) -> Result<Outcome>
    where
        F: FnMut(&Episode),
    {
        loop {
            match self.tick()? {
                Step::Moved(_) => on_move(&*self),
                Step::Arrived | Step::Stalled => return Ok(self.outcome),
            }
        }
    }
}
