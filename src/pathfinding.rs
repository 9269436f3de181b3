use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::environment::{Env, Pos};

/// Manhattan distance. Admissible on a 4-connected grid with unit step cost.
pub fn manhattan(a: Pos, b: Pos) -> usize {
    let dx = (a.x as isize - b.x as isize).abs();
    let dy = (a.y as isize - b.y as isize).abs();
    (dx + dy) as usize
}

/// Frontier entry. Lowest `f` pops first; among equal `f`, the earliest push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    f: usize,
    seq: usize,
    pos: Pos,
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so both keys are reversed
        other.f.cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Coordinates from start to goal inclusive, one orthogonal step apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    steps: VecDeque<Pos>,
}

impl SearchPath {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of moves needed to walk the whole path.
    pub fn moves(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn front(&self) -> Option<Pos> {
        self.steps.front().copied()
    }

    pub fn goal(&self) -> Option<Pos> {
        self.steps.back().copied()
    }

    pub fn pop_front(&mut self) -> Option<Pos> {
        self.steps.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.steps.iter().copied()
    }

    pub fn is_contiguous(&self) -> bool {
        self.steps
            .iter()
            .zip(self.steps.iter().skip(1))
            .all(|(a, b)| a.is_adjacent(*b))
    }

    pub fn into_vec(self) -> Vec<Pos> {
        self.steps.into_iter().collect()
    }
}

/// A* search from `start` to `goal`.
///
/// Returns `None` when the goal cannot be reached, including when either end
/// lies outside the grid or on an obstacle.
pub fn find_path(env: &Env, start: Pos, goal: Pos) -> Option<SearchPath> {
    if !env.is_traversable(start) || !env.is_traversable(goal) {
        debug!(start = %start, goal = %goal, "Endpoint is blocked or out of bounds");
        return None;
    }

    let mut frontier = BinaryHeap::new();
    let mut g_score: HashMap<Pos, usize> = HashMap::new();
    let mut came_from: HashMap<Pos, Pos> = HashMap::new();
    let mut closed: HashSet<Pos> = HashSet::new();
    let mut seq = 0;

    g_score.insert(start, 0);
    frontier.push(Node { f: manhattan(start, goal), seq, pos: start });

    while let Some(Node { pos: current, .. }) = frontier.pop() {
        if current == goal {
            let path = reconstruct(&came_from, goal);
            debug!(expanded = closed.len(), length = path.len(), "Path found");
            return Some(path);
        }
        // Stale duplicate of an already expanded cell
        if !closed.insert(current) {
            continue;
        }
        let g = match g_score.get(&current) {
            Some(g) => *g,
            None => continue,
        };

        for neighbour in env.neighbours(current) {
            let tentative = g + 1;
            let improves = g_score
                .get(&neighbour)
                .map_or(true, |known| tentative < *known);
            if improves {
                g_score.insert(neighbour, tentative);
                came_from.insert(neighbour, current);
                seq += 1;
                frontier.push(Node {
                    f: tentative + manhattan(neighbour, goal),
                    seq,
                    pos: neighbour,
                });
            }
        }
    }

    debug!(expanded = closed.len(), start = %start, goal = %goal, "Frontier exhausted");
    None
}

fn reconstruct(came_from: &HashMap<Pos, Pos>, goal: Pos) -> SearchPath {
    let mut steps = VecDeque::new();
    let mut current = goal;
    steps.push_front(current);
    while let Some(previous) = came_from.get(&current) {
        current = *previous;
        steps.push_front(current);
    }
    SearchPath { steps }
}
