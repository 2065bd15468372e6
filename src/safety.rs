// Move legality and self-collision look-ahead
//
// `is_legal_move` is the gate every strategy's output passes through. The two
// self-collision predicates tighten it into the default "safe move" filter.

use crate::config::Config;
use crate::snapshot::{simulate_body, Snapshot};
use crate::types::{Coord, Direction};

/// Whether `dir` keeps us on the board and out of every body and contested cell
///
/// Illegal when the new head is:
/// - off the board
/// - a hazard while health is at or below the low-health threshold
/// - our own neck, or any of our segments except a tail that is about to vacate
/// - any cell of a rival body
/// - a possible next head of a rival at least as long as us
pub fn is_legal_move(snapshot: &Snapshot, dir: Direction, config: &Config) -> bool {
    let you = snapshot.you();
    let next = dir.apply(&you.head);

    if !snapshot.in_bounds(&next) {
        return false;
    }

    if snapshot.is_hazard(&next) && you.health <= config.safety.low_health_hazard_threshold {
        return false;
    }

    if you.body.get(1).map_or(false, |neck| *neck == next && *neck != you.head) {
        return false;
    }

    let keep = if snapshot.is_food(&next) {
        you.body.len()
    } else {
        you.body.len().saturating_sub(1)
    };
    if you.body[..keep].contains(&next) {
        return false;
    }

    for rival in snapshot.rivals() {
        if rival.body.contains(&next) {
            return false;
        }
        if rival.length >= you.length && rival.head.manhattan(&next) == 1 {
            return false;
        }
    }

    true
}

/// Whether the new head lands on our own body after the move is simulated
pub fn would_self_collide_immediately(snapshot: &Snapshot, dir: Direction) -> bool {
    let you = snapshot.you();
    if you.body.len() <= 1 {
        return false;
    }
    let next = dir.apply(&you.head);
    let simulated = snapshot.simulate_own_body(next);
    simulated[1..].contains(&next)
}

/// Whether every on-board follow-up after `dir` runs into our own body
pub fn would_self_collide_next_turn(snapshot: &Snapshot, dir: Direction) -> bool {
    let you = snapshot.you();
    if you.body.len() <= 1 {
        return false;
    }
    let next = dir.apply(&you.head);
    let simulated = snapshot.simulate_own_body(next);

    let mut follow_ups = Direction::all()
        .into_iter()
        .map(|follow| follow.apply(&next))
        .filter(|future| snapshot.in_bounds(future))
        .peekable();
    if follow_ups.peek().is_none() {
        return true;
    }

    follow_ups.all(|future| self_collides(&simulated, future, snapshot.is_food(&future)))
}

fn self_collides(body: &[Coord], next_head: Coord, grows: bool) -> bool {
    let future = simulate_body(body, next_head, grows);
    future[1..].contains(&next_head)
}

/// Directions that pass `is_legal_move`
pub fn legal_moves(snapshot: &Snapshot, config: &Config) -> Vec<Direction> {
    Direction::all()
        .into_iter()
        .filter(|&dir| is_legal_move(snapshot, dir, config))
        .collect()
}

/// Legal directions that also clear both self-collision look-aheads
pub fn safe_moves(snapshot: &Snapshot, config: &Config) -> Vec<Direction> {
    Direction::all()
        .into_iter()
        .filter(|&dir| {
            is_legal_move(snapshot, dir, config)
                && !would_self_collide_immediately(snapshot, dir)
                && !would_self_collide_next_turn(snapshot, dir)
        })
        .collect()
}

/// Directions that merely stay on the board
pub fn in_bounds_moves(snapshot: &Snapshot) -> Vec<Direction> {
    let head = snapshot.you().head;
    Direction::all()
        .into_iter()
        .filter(|dir| snapshot.in_bounds(&dir.apply(&head)))
        .collect()
}
