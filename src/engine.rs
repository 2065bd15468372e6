// Decision cascade
//
// Strategies are tried in priority order and the first one that produces a
// gated move wins. Every path through `decide` ends in a direction.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

use crate::config::Config;
use crate::history::HeadHistory;
use crate::minimax;
use crate::pathfinding::{first_step, shortest_path};
use crate::safety::{
    in_bounds_moves, is_legal_move, legal_moves, safe_moves, would_self_collide_immediately,
};
use crate::snapshot::Snapshot;
use crate::tactics::{
    bait_alternative, evaluate_threats_and_targets, find_intercept, has_room_after_eating,
    head_on_candidates, is_food_in_starvation_loop, nearest_food, rank_food, rival_contests_food,
    Threat,
};
use crate::trap::{can_force_trap, detect_trap, would_trap_in_own_loop, TrapAnalysis};
use crate::types::{Battlesnake, Board, Direction};

/// Which stage of the cascade produced the move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Intercept,
    ForceTrap,
    HeadOn,
    FoodPath,
    FoodDetour,
    TrapFree,
    Escape,
    MostSpace,
    Minimax,
    LastResort,
    Shout,
    Fallback,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Intercept => "intercept",
            Strategy::ForceTrap => "force_trap",
            Strategy::HeadOn => "head_on",
            Strategy::FoodPath => "food_path",
            Strategy::FoodDetour => "food_detour",
            Strategy::TrapFree => "trap_free",
            Strategy::Escape => "escape",
            Strategy::MostSpace => "most_space",
            Strategy::Minimax => "minimax",
            Strategy::LastResort => "last_resort",
            Strategy::Shout => "shout",
            Strategy::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    pub strategy: Strategy,
}

impl Decision {
    fn new(direction: Direction, strategy: Strategy) -> Self {
        Decision { direction, strategy }
    }
}

/// Tie-breaking source for one turn
///
/// A configured seed is mixed with the turn number so replays of a single
/// turn reproduce the live choice.
pub fn turn_rng(config: &Config, turn: i32) -> StdRng {
    match config.engine.rng_seed {
        Some(seed) => {
            StdRng::seed_from_u64(seed ^ (turn as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        }
        None => StdRng::from_os_rng(),
    }
}

/// Builds the snapshot and a turn RNG, then runs the cascade
pub fn decide_turn(
    board: &Board,
    you: &Battlesnake,
    turn: i32,
    history: &HeadHistory,
    config: &Config,
    deadline: Instant,
) -> Decision {
    let snapshot = Snapshot::new(board, you);
    let mut rng = turn_rng(config, turn);
    decide(&snapshot, history, config, &mut rng, deadline)
}

pub fn decide<R: Rng + ?Sized>(
    snapshot: &Snapshot,
    history: &HeadHistory,
    config: &Config,
    rng: &mut R,
    deadline: Instant,
) -> Decision {
    let threats = evaluate_threats_and_targets(snapshot, config);

    if !threats.is_empty() && snapshot.you().health > config.tactics.intercept_min_health {
        if let Some(dir) = find_intercept(snapshot, &threats, config) {
            return Decision::new(dir, Strategy::Intercept);
        }
        debug!("No intercept among {} threats", threats.len());
    }

    if let Some(dir) = force_trap_move(snapshot, config) {
        return Decision::new(dir, Strategy::ForceTrap);
    }

    if let Some(dir) = head_on_move(snapshot, &threats, config) {
        return Decision::new(dir, Strategy::HeadOn);
    }

    if let Some(decision) = food_move(snapshot, history, config) {
        return decision;
    }

    if let Some(decision) = safe_move(snapshot, config, rng) {
        return decision;
    }

    last_resort(snapshot, config, rng, deadline)
}

/// Legal and not closing us inside our own body
fn passes_attack_gate(snapshot: &Snapshot, dir: Direction, config: &Config) -> bool {
    is_legal_move(snapshot, dir, config)
        && !would_trap_in_own_loop(snapshot, dir.apply(&snapshot.you().head))
}

fn force_trap_move(snapshot: &Snapshot, config: &Config) -> Option<Direction> {
    let found = snapshot
        .rivals()
        .filter_map(|rival| can_force_trap(snapshot, rival, config))
        .find(|&dir| passes_attack_gate(snapshot, dir, config));
    if found.is_none() {
        debug!("No rival can be forced into a trap");
    }
    found
}

fn head_on_move(snapshot: &Snapshot, threats: &[Threat], config: &Config) -> Option<Direction> {
    let found = head_on_candidates(snapshot, threats, config)
        .into_iter()
        .find(|&dir| passes_attack_gate(snapshot, dir, config));
    if found.is_none() {
        debug!("No winnable head-on");
    }
    found
}

fn food_move(snapshot: &Snapshot, history: &HeadHistory, config: &Config) -> Option<Decision> {
    let nearest = nearest_food(snapshot)?;
    if is_food_in_starvation_loop(snapshot, nearest, config) {
        debug!("Nearest food {:?} is a starvation loop", nearest);
        return None;
    }

    let head = snapshot.you().head;
    for target in rank_food(snapshot, config).into_iter().take(config.food.max_targets) {
        let Some(dir) = shortest_path(snapshot, head, target.food, config)
            .as_deref()
            .and_then(first_step)
        else {
            debug!("No path to food {:?}", target.food);
            continue;
        };

        if !is_legal_move(snapshot, dir, config)
            || would_self_collide_immediately(snapshot, dir)
        {
            debug!("Path step {} toward {:?} is unsafe", dir.as_str(), target.food);
            continue;
        }
        if !has_room_after_eating(snapshot, target.food, config) {
            debug!("Too little room after eating {:?}", target.food);
            continue;
        }

        // Oscillation covers every head in the recent history window.
        let next = dir.apply(&head);
        if rival_contests_food(snapshot, target.food) || history.recently_visited(&next) {
            match bait_alternative(snapshot, target.food, dir, history, config) {
                Some(alt) => return Some(Decision::new(alt, Strategy::FoodDetour)),
                None => {
                    debug!("Food {:?} is contested with no detour", target.food);
                    continue;
                }
            }
        }

        return Some(Decision::new(dir, Strategy::FoodPath));
    }

    None
}

fn safe_move<R: Rng + ?Sized>(snapshot: &Snapshot, config: &Config, rng: &mut R) -> Option<Decision> {
    let safe = safe_moves(snapshot, config);
    if safe.is_empty() {
        debug!("No safe moves");
        return None;
    }

    let analyses: Vec<(Direction, TrapAnalysis)> = safe
        .par_iter()
        .map(|&dir| (dir, detect_trap(snapshot, dir, config)))
        .collect();

    let trap_free: Vec<Direction> = analyses
        .iter()
        .filter(|(_, analysis)| !analysis.is_trap)
        .map(|(dir, _)| *dir)
        .collect();
    if let Some(&dir) = trap_free.choose(rng) {
        return Some(Decision::new(dir, Strategy::TrapFree));
    }

    let mut most_routes: Option<(Direction, usize)> = None;
    for (dir, analysis) in &analyses {
        let routes = analysis.escape_routes.len();
        if routes > 0 && most_routes.map_or(true, |(_, best)| routes > best) {
            most_routes = Some((*dir, routes));
        }
    }
    if let Some((dir, _)) = most_routes {
        return Some(Decision::new(dir, Strategy::Escape));
    }

    let mut most_space: Option<(Direction, usize)> = None;
    for (dir, analysis) in &analyses {
        if most_space.map_or(true, |(_, best)| analysis.available_space > best) {
            most_space = Some((*dir, analysis.available_space));
        }
    }
    most_space.map(|(dir, _)| Decision::new(dir, Strategy::MostSpace))
}

fn last_resort<R: Rng + ?Sized>(
    snapshot: &Snapshot,
    config: &Config,
    rng: &mut R,
    deadline: Instant,
) -> Decision {
    let legal = legal_moves(snapshot, config);
    if !legal.is_empty() {
        if let Some(outcome) = minimax::best_move(snapshot, config, deadline) {
            if legal.contains(&outcome.direction) {
                return Decision::new(outcome.direction, Strategy::Minimax);
            }
        }
        debug!("Search found no safe branch among {} legal moves", legal.len());
        if let Some(&dir) = legal.choose(rng) {
            return Decision::new(dir, Strategy::LastResort);
        }
    }

    let on_board = in_bounds_moves(snapshot);
    if let Some(dir) = shouted_direction(snapshot) {
        if on_board.contains(&dir) {
            return Decision::new(dir, Strategy::Shout);
        }
    }

    match on_board.choose(rng) {
        Some(&dir) => Decision::new(dir, Strategy::Fallback),
        None => Decision::new(Direction::Down, Strategy::Fallback),
    }
}

fn shouted_direction(snapshot: &Snapshot) -> Option<Direction> {
    snapshot.you().shout.as_deref()?.parse().ok()
}
