// Bounded adversarial search
//
// Fixed-depth minimax with alpha-beta pruning over our own move sequence.
// The minimizing ply also draws from our moves, standing in for the worst
// follow-up we might be forced into. A node with no safe move is a loss on
// either ply.

use std::time::Instant;

use crate::config::Config;
use crate::flood_fill::reachable_count;
use crate::grid::CellSet;
use crate::snapshot::{simulate_body, Snapshot};
use crate::types::{Coord, Direction};

/// Value of a position where we have no safe move left
pub const LOSS: i64 = i64::MIN / 2;

/// Best first move found by the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub direction: Direction,
    pub next_head: Coord,
    pub value: i64,
}

struct SearchContext<'a> {
    snapshot: &'a Snapshot,
    config: &'a Config,
    rival_bodies: CellSet,
    deadline: Instant,
}

impl<'a> SearchContext<'a> {
    fn is_safe_step(&self, next: &Coord, body: &[Coord]) -> bool {
        if !self.snapshot.in_bounds(next) || self.rival_bodies.contains(next) {
            return false;
        }
        let keep = if self.snapshot.is_food(next) {
            body.len()
        } else {
            body.len().saturating_sub(1)
        };
        !body[..keep].contains(next)
    }

    fn search(
        &self,
        head: Coord,
        body: &[Coord],
        depth: u8,
        maximizing: bool,
        mut alpha: i64,
        mut beta: i64,
    ) -> i64 {
        if depth == 0 || Instant::now() >= self.deadline {
            return self.evaluate(head, body);
        }

        let mut best = if maximizing { i64::MIN } else { i64::MAX };
        let mut any_safe = false;

        for dir in Direction::all() {
            let next = dir.apply(&head);
            if !self.is_safe_step(&next, body) {
                continue;
            }
            any_safe = true;

            let moved = simulate_body(body, next, self.snapshot.is_food(&next));
            let value = self.search(next, &moved, depth - 1, !maximizing, alpha, beta);

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(best);
            } else {
                best = best.min(value);
                beta = beta.min(best);
            }
            if beta <= alpha {
                break;
            }
        }

        if any_safe {
            best
        } else {
            LOSS
        }
    }

    /// `space_weight * room + nearest rival distance - wall penalty`
    fn evaluate(&self, head: Coord, body: &[Coord]) -> i64 {
        let mut walls = self.rival_bodies.clone();
        walls.extend(body.iter().skip(1));
        let room = reachable_count(head, &walls, body) as i64;
        let nearest_rival = self.snapshot.nearest_rival_distance(&head).unwrap_or(0) as i64;

        self.config.search.space_weight * room + nearest_rival - self.wall_penalty(&head)
    }

    fn wall_penalty(&self, head: &Coord) -> i64 {
        let width = self.snapshot.width();
        let height = self.snapshot.height();
        let search = &self.config.search;
        if width.min(height) > search.small_board_dimension {
            return 0;
        }
        let to_wall = head
            .x
            .min(head.y)
            .min(width - 1 - head.x)
            .min(height - 1 - head.y);
        search.wall_penalty_weight * (search.wall_safe_distance - to_wall).max(0) as i64
    }
}

/// Root of the search; None when no first move is safe
pub fn best_move(snapshot: &Snapshot, config: &Config, deadline: Instant) -> Option<SearchOutcome> {
    let ctx = SearchContext {
        snapshot,
        config,
        rival_bodies: snapshot.rival_bodies(),
        deadline,
    };
    let you = snapshot.you();
    let depth = config.search.max_depth.saturating_sub(1);
    let mut alpha = i64::MIN;
    let beta = i64::MAX;
    let mut best: Option<SearchOutcome> = None;

    for dir in Direction::all() {
        let next = dir.apply(&you.head);
        if !ctx.is_safe_step(&next, &you.body) {
            continue;
        }
        let moved = simulate_body(&you.body, next, snapshot.is_food(&next));
        let value = ctx.search(next, &moved, depth, false, alpha, beta);

        if best.map_or(true, |b| value > b.value) {
            best = Some(SearchOutcome {
                direction: dir,
                next_head: next,
                value,
            });
        }
        alpha = alpha.max(value);
    }

    best
}
