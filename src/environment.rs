use std::fmt;

use ndarray::Array2;
use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Obstacle,
    Goal,
}

impl Cell {
    pub fn is_traversable(self) -> bool {
        self != Cell::Obstacle
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Obstacle => 'X',
            Cell::Goal => 'T',
        }
    }
}

// Action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Movement {
    Up,
    Right,
    Down,
    Left,
}

impl Movement {
    pub fn into_vector(self) -> (isize, isize) {
        match self {
            Movement::Up    => (-1, 0),
            Movement::Down  => ( 1, 0),
            Movement::Left  => ( 0,-1),
            Movement::Right => ( 0, 1),
        }
    }

    /// Every movement, in the order neighbours are expanded during search.
    pub fn actions() -> &'static [Movement] {
        &[Movement::Right, Movement::Down, Movement::Up, Movement::Left]
    }
}

/// Grid coordinate. `x` is the row, `y` the column, both 0-indexed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Pos { x, y }
    }

    pub fn is_adjacent(self, other: Pos) -> bool {
        let dx = (self.x as isize - other.x as isize).abs();
        let dy = (self.y as isize - other.y as isize).abs();
        dx + dy == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rejects a grid that would leave no room for the goal.
pub fn check_dimensions(size: usize, obstacle_count: usize) -> Result<()> {
    if size == 0 {
        return Err(Error::invalid_configuration("grid size must be at least 1"));
    }
    let cells = size.checked_mul(size).ok_or_else(|| {
        Error::invalid_configuration(format!("a {}x{} grid is too large", size, size))
    })?;
    if obstacle_count >= cells - 1 {
        return Err(Error::invalid_configuration(format!(
            "{} obstacles leave no room for a goal on a {}x{} grid",
            obstacle_count, size, size
        )));
    }
    Ok(())
}

/// Square grid the agent moves on. The agent always starts at (0, 0).
#[derive(Debug, Clone, PartialEq)]
pub struct Env {
    map: Array2<Cell>,
    start: Pos,
    goal: Pos,
}

impl Env {
    /// Places up to `obstacle_count` obstacles and one goal at random.
    ///
    /// Obstacle draws that hit the start or an already blocked cell are
    /// dropped, so the obstacle count is an upper bound. The goal is redrawn
    /// until it lands on an empty cell; the start itself counts as empty.
    pub fn generate<R: Rng + ?Sized>(size: usize, obstacle_count: usize, rng: &mut R) -> Result<Self> {
        check_dimensions(size, obstacle_count)?;

        let start = Pos::new(0, 0);
        let mut map = Array2::from_elem((size, size), Cell::Empty);

        for _ in 0..obstacle_count {
            let pos = Pos::new(rng.gen_range(0..size), rng.gen_range(0..size));
            if pos != start {
                map[[pos.x, pos.y]] = Cell::Obstacle;
            }
        }

        let goal = loop {
            let pos = Pos::new(rng.gen_range(0..size), rng.gen_range(0..size));
            if map[[pos.x, pos.y]] == Cell::Empty {
                break pos;
            }
        };
        map[[goal.x, goal.y]] = Cell::Goal;

        let env = Self { map, start, goal };
        debug!(
            size,
            requested = obstacle_count,
            placed = env.obstacle_count(),
            goal = %goal,
            "Map setup"
        );
        Ok(env)
    }

    /// Builds a grid from a fixed layout.
    pub fn from_obstacles<I>(size: usize, obstacles: I, goal: Pos) -> Result<Self>
    where
        I: IntoIterator<Item = Pos>,
    {
        if size == 0 {
            return Err(Error::invalid_configuration("grid size must be at least 1"));
        }
        let start = Pos::new(0, 0);
        let mut map = Array2::from_elem((size, size), Cell::Empty);

        for pos in obstacles {
            if pos.x >= size || pos.y >= size {
                return Err(Error::invalid_configuration(format!(
                    "obstacle {} is outside the {}x{} grid", pos, size, size
                )));
            }
            if pos == start || pos == goal {
                return Err(Error::invalid_configuration(format!(
                    "obstacle {} overlaps the start or the goal", pos
                )));
            }
            map[[pos.x, pos.y]] = Cell::Obstacle;
        }

        if goal.x >= size || goal.y >= size {
            return Err(Error::invalid_configuration(format!(
                "goal {} is outside the {}x{} grid", goal, size, size
            )));
        }
        map[[goal.x, goal.y]] = Cell::Goal;

        Ok(Self { map, start, goal })
    }

    pub fn size(&self) -> usize {
        self.map.nrows()
    }

    pub fn start_pos(&self) -> Pos {
        self.start
    }

    pub fn goal_pos(&self) -> Pos {
        self.goal
    }

    pub fn cell(&self, pos: Pos) -> Option<Cell> {
        self.map.get([pos.x, pos.y]).copied()
    }

    pub fn is_traversable(&self, pos: Pos) -> bool {
        self.cell(pos).map_or(false, Cell::is_traversable)
    }

    pub fn obstacle_count(&self) -> usize {
        self.map.iter().filter(|cell| **cell == Cell::Obstacle).count()
    }

    /// Returns the cell reached by `movement`, or `None` past the border.
    pub fn check_movement(&self, pos: Pos, movement: Movement) -> Option<Pos> {
        let (dx, dy) = movement.into_vector();
        let x = pos.x as isize + dx;
        let y = pos.y as isize + dy;
        let size = self.size() as isize;
        if x < 0 || y < 0 || x >= size || y >= size {
            return None;
        }
        Some(Pos::new(x as usize, y as usize))
    }

    /// Traversable orthogonal neighbours of `pos`.
    pub fn neighbours(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        Movement::actions()
            .iter()
            .filter_map(move |movement| self.check_movement(pos, *movement))
            .filter(move |next| self.is_traversable(*next))
    }

    pub fn iter(&self) -> EnvIter {
        EnvIter::new(self.size())
    }

    pub fn render_with_agent(&self, agent: Pos) -> String {
        let mut out = String::new();
        for (x, row) in self.map.outer_iter().enumerate() {
            let symbols: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(y, cell)| {
                    let symbol = if Pos::new(x, y) == agent { 'A' } else { cell.symbol() };
                    symbol.to_string()
                })
                .collect();
            out.push_str(&symbols.join(" "));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.map.outer_iter() {
            let symbols: Vec<String> = row.iter().map(|cell| cell.symbol().to_string()).collect();
            writeln!(f, "{}", symbols.join(" "))?;
        }
        Ok(())
    }
}

/// Row-major walk over every coordinate of a grid.
pub struct EnvIter {
    currx: usize,
    curry: usize,
    size: usize,
}

impl EnvIter {
    fn new(size: usize) -> EnvIter {
        EnvIter {
            size,
            currx: 0,
            curry: 0,
        }
    }
}

impl Iterator for EnvIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        if self.currx >= self.size {
            return None;
        }
        let pos = Pos::new(self.currx, self.curry);
        self.curry += 1;
        if self.curry == self.size {
            self.curry = 0;
            self.currx += 1;
        }
        Some(pos)
    }
}
