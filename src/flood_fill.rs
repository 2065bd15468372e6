// Reachable-space estimation
//
// Breadth-first fill over the 4-connected grid. The searching snake's own
// body is a moving obstacle: the segment that sits `i` places from the tail
// has vacated its cell after `i + 1` moves, so a blocked cell holding that
// segment opens up once the fill has expanded `i` levels deep.

use std::collections::VecDeque;

use crate::grid::CellSet;
use crate::types::{Coord, Direction};

/// Four step directions plus the heading-less start state
const HEADINGS: usize = 5;

/// Number of cells reachable from `start`, counting `start` itself
pub fn reachable_count(start: Coord, blocked: &CellSet, own_body: &[Coord]) -> usize {
    reachable_cells(start, blocked, own_body).len()
}

/// Cells reachable from `start`, including `start`
///
/// Cells in `blocked` are impassable unless they hold a segment of
/// `own_body` that has vacated by the time the fill reaches them. The search
/// runs over `(cell, depth, heading)` states and never steps straight back,
/// so a cell first reached too early is tried again when a longer walk gets
/// there. Depth stops mattering once the whole body has vacated.
pub fn reachable_cells(start: Coord, blocked: &CellSet, own_body: &[Coord]) -> CellSet {
    let width = blocked.width();
    let height = blocked.height();
    let mut reached = CellSet::new(width, height);
    let Some(start_idx) = reached.index_of(&start) else {
        return reached;
    };

    let vacates_after = vacate_depths(width, height, own_body);
    let cap = vacates_after.iter().flatten().copied().max().unwrap_or(0);
    let layers = cap + 1;
    let state = |idx: usize, depth: usize, heading: Option<Direction>| {
        (idx * layers + depth) * HEADINGS + heading.map_or(HEADINGS - 1, |dir| dir as usize)
    };
    let mut seen = vec![false; vacates_after.len() * layers * HEADINGS];

    let mut queue = VecDeque::new();
    reached.insert(start);
    seen[state(start_idx, 0, None)] = true;
    queue.push_back((start, 0usize, None::<Direction>));

    while let Some((current, depth, heading)) = queue.pop_front() {
        let next_depth = (depth + 1).min(cap);
        for dir in Direction::all() {
            if heading.map_or(false, |h| h.opposite() == dir) {
                continue;
            }
            let neighbor = dir.apply(&current);
            let Some(idx) = reached.index_of(&neighbor) else {
                continue;
            };
            let passable = !blocked.contains(&neighbor)
                || vacates_after[idx].map_or(false, |segment| depth >= segment);
            let key = state(idx, next_depth, Some(dir));
            if !passable || seen[key] {
                continue;
            }
            seen[key] = true;
            reached.insert(neighbor);
            queue.push_back((neighbor, next_depth, Some(dir)));
        }
    }

    reached
}

/// For each cell covered by the body, its distance from the tail
///
/// Stacked segments keep the cell occupied until the one nearest the head
/// leaves, so the largest distance wins.
fn vacate_depths(width: i32, height: i32, own_body: &[Coord]) -> Vec<Option<usize>> {
    let grid = CellSet::new(width, height);
    let mut depths = vec![None; grid.area()];
    for (from_tail, segment) in own_body.iter().rev().enumerate() {
        if let Some(idx) = grid.index_of(segment) {
            depths[idx] = Some(depths[idx].map_or(from_tail, |d: usize| d.max(from_tail)));
        }
    }
    depths
}
