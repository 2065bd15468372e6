// Cost-aware shortest path (A*)
//
// Manhattan distance heuristic. Entering a hazard costs
// `hazard_cost * (max_health / health)` on top of the unit step, so a weak
// snake steers around hazards that a healthy one walks through.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::config::Config;
use crate::grid::CellSet;
use crate::snapshot::Snapshot;
use crate::types::{Coord, Direction};

/// Open-list entry ordered so the heap pops the lowest f-score first,
/// and among equal f-scores the entry pushed first
#[derive(Debug)]
struct OpenNode {
    f_score: f64,
    sequence: u64,
    index: usize,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Hazard surcharge for entering `cell` at the given health
pub fn hazard_penalty(snapshot: &Snapshot, cell: &Coord, health: i32, config: &Config) -> f64 {
    if snapshot.is_hazard(cell) {
        config.pathfinding.hazard_cost * (config.pathfinding.max_health / health.max(1) as f64)
    } else {
        0.0
    }
}

/// Shortest route from `start` to `goal` for our snake, both endpoints included
///
/// Every snake body blocks, except our own tail when the goal is not food
/// (eating keeps the tail in place). The goal itself is never treated as
/// blocked. Returns None when the goal cannot be reached.
pub fn shortest_path(
    snapshot: &Snapshot,
    start: Coord,
    goal: Coord,
    config: &Config,
) -> Option<Vec<Coord>> {
    if !snapshot.in_bounds(&start) || !snapshot.in_bounds(&goal) {
        return None;
    }

    let you = snapshot.you();
    let mut blocked = snapshot.all_bodies();
    if you.body.len() > 1 && !snapshot.is_food(&goal) {
        if let Some(tail) = you.tail() {
            // A stacked tail does not vacate next turn.
            let stacked = you.body[..you.body.len() - 1].contains(&tail);
            if !stacked {
                blocked.remove(&tail);
            }
        }
    }

    search(snapshot, &blocked, start, goal, you.health, config)
}

fn search(
    snapshot: &Snapshot,
    blocked: &CellSet,
    start: Coord,
    goal: Coord,
    health: i32,
    config: &Config,
) -> Option<Vec<Coord>> {
    let cells = snapshot.area() as usize;
    let grid = snapshot.empty_cells();
    let start_idx = grid.index_of(&start)?;

    let mut g_score = vec![f64::INFINITY; cells];
    let mut came_from: Vec<Option<usize>> = vec![None; cells];
    let mut closed = vec![false; cells];
    let mut open = BinaryHeap::new();
    let mut sequence = 0u64;

    g_score[start_idx] = 0.0;
    open.push(OpenNode {
        f_score: start.manhattan(&goal) as f64,
        sequence,
        index: start_idx,
    });

    while let Some(OpenNode { index, .. }) = open.pop() {
        if closed[index] {
            continue;
        }
        let current = grid.coord_of(index);
        if current == goal {
            return Some(reconstruct(&grid, &came_from, index));
        }
        closed[index] = true;

        for neighbor in current.neighbors() {
            let Some(n_idx) = grid.index_of(&neighbor) else {
                continue;
            };
            if closed[n_idx] || (blocked.contains(&neighbor) && neighbor != goal) {
                continue;
            }

            let tentative =
                g_score[index] + 1.0 + hazard_penalty(snapshot, &neighbor, health, config);
            if tentative >= g_score[n_idx] {
                continue;
            }

            came_from[n_idx] = Some(index);
            g_score[n_idx] = tentative;
            sequence += 1;
            open.push(OpenNode {
                f_score: tentative + neighbor.manhattan(&goal) as f64,
                sequence,
                index: n_idx,
            });
        }
    }

    None
}

fn reconstruct(grid: &CellSet, came_from: &[Option<usize>], goal_idx: usize) -> Vec<Coord> {
    let mut path = vec![grid.coord_of(goal_idx)];
    let mut current = goal_idx;
    while let Some(prev) = came_from[current] {
        path.push(grid.coord_of(prev));
        current = prev;
    }
    path.reverse();
    path
}

/// First step of a path as a direction
pub fn first_step(path: &[Coord]) -> Option<Direction> {
    match path {
        [from, to, ..] => Direction::between(from, to),
        _ => None,
    }
}
