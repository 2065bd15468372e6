// Interception, head-on and food heuristics
//
// Opportunistic attacks on nearby rivals, scored food selection and the
// bait/oscillation checks that guard the path-directed food move.

use crate::config::Config;
use crate::flood_fill::{reachable_cells, reachable_count};
use crate::history::HeadHistory;
use crate::pathfinding::shortest_path;
use crate::safety::{is_legal_move, would_self_collide_immediately};
use crate::snapshot::Snapshot;
use crate::types::{Coord, Direction};

/// A rival close enough to matter this turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Threat {
    pub snake_id: String,
    pub distance: i32,
    pub is_smaller: bool,
    pub is_equal: bool,
    pub head: Coord,
    pub length: i32,
    pub possible_moves: Vec<Coord>,
}

/// Rivals within the threat radius, nearest first
pub fn evaluate_threats_and_targets(snapshot: &Snapshot, config: &Config) -> Vec<Threat> {
    let you = snapshot.you();
    let mut threats: Vec<Threat> = snapshot
        .rivals()
        .filter_map(|rival| {
            let distance = you.head.manhattan(&rival.head);
            if distance > config.tactics.threat_radius {
                return None;
            }
            Some(Threat {
                snake_id: rival.id.clone(),
                distance,
                is_smaller: rival.length < you.length,
                is_equal: rival.length == you.length,
                head: rival.head,
                length: rival.length,
                possible_moves: snapshot.possible_next_heads(rival),
            })
        })
        .collect();
    threats.sort_by_key(|t| t.distance);
    threats
}

/// Our move whose new head covers the most of the target's possible next heads
///
/// "Covers" means within one step. Moves covering nothing are never returned;
/// ties keep the earlier direction.
pub fn interception_move(snapshot: &Snapshot, target: &Threat) -> Option<Direction> {
    let head = snapshot.you().head;
    let mut best: Option<(Direction, usize)> = None;

    for dir in Direction::all() {
        let next = dir.apply(&head);
        let covered = target
            .possible_moves
            .iter()
            .filter(|cell| next.manhattan(cell) <= 1)
            .count();
        if covered > 0 && best.map_or(true, |(_, most)| covered > most) {
            best = Some((dir, covered));
        }
    }

    best.map(|(dir, _)| dir)
}

/// First safe intercept against a smaller rival, or an equal one that is very close
pub fn find_intercept(snapshot: &Snapshot, threats: &[Threat], config: &Config) -> Option<Direction> {
    if snapshot.you().health <= config.tactics.intercept_min_health {
        return None;
    }

    threats
        .iter()
        .filter(|t| {
            t.is_smaller || (t.is_equal && t.distance <= config.tactics.equal_size_intercept_distance)
        })
        .filter_map(|t| interception_move(snapshot, t))
        .find(|&dir| {
            is_legal_move(snapshot, dir, config) && !would_self_collide_immediately(snapshot, dir)
        })
}

/// Moves straight at a rival one cell away that we would beat head-on
///
/// The returned moves land on a cell the rival's head could also enter.
pub fn head_on_candidates(snapshot: &Snapshot, threats: &[Threat], config: &Config) -> Vec<Direction> {
    let you = snapshot.you();
    let mut candidates = Vec::new();

    for threat in threats {
        if threat.distance != config.tactics.head_on_distance || you.length < threat.length {
            continue;
        }
        for dir in Direction::all() {
            let next = dir.apply(&you.head);
            if next.manhattan(&threat.head) == 1 && !candidates.contains(&dir) {
                candidates.push(dir);
            }
        }
    }

    candidates
}

/// Food cell with its desirability score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodTarget {
    pub food: Coord,
    pub score: i32,
}

/// Our body once the head has walked `path` and eaten at its end
fn body_after_path(body: &[Coord], path: &[Coord]) -> Vec<Coord> {
    let grown_len = body.len() + 1;
    path.iter()
        .skip(1)
        .rev()
        .chain(body.iter())
        .take(grown_len)
        .copied()
        .collect()
}

/// Our body right after eating `food`, following a shortest path when one exists
fn body_after_eating(snapshot: &Snapshot, food: Coord, config: &Config) -> Vec<Coord> {
    let you = snapshot.you();
    match shortest_path(snapshot, you.head, food, config) {
        Some(path) if path.len() > 1 => body_after_path(&you.body, &path),
        _ => std::iter::once(food)
            .chain(you.body.iter().copied())
            .take(you.body.len() + 1)
            .collect(),
    }
}

/// Whether eating `food` leaves no other food reachable
///
/// With no other food on the board, the check becomes whether at least our
/// grown length of room is left.
pub fn is_food_in_starvation_loop(snapshot: &Snapshot, food: Coord, config: &Config) -> bool {
    let grown = body_after_eating(snapshot, food, config);
    let mut walls = snapshot.rival_bodies();
    walls.extend(grown.iter().skip(1));

    let reachable = reachable_cells(food, &walls, &grown);
    let mut others = snapshot.food().iter().filter(|f| **f != food).peekable();
    if others.peek().is_none() {
        return reachable.len() < grown.len();
    }
    !others.any(|f| reachable.contains(f))
}

/// Whether the food sits in a pocket smaller than our grown body
fn food_in_pocket(snapshot: &Snapshot, food: Coord) -> bool {
    let you = snapshot.you();
    let mut walls = snapshot.all_bodies();
    walls.remove(&food);
    let room = reachable_count(food, &walls, &you.body);
    (room as i32) < you.length + 1
}

/// `-d_me + 2 * max(0, d_rival - d_me) - penalties (+ hunger bonus)`
pub fn score_food(snapshot: &Snapshot, food: Coord, config: &Config) -> i32 {
    let you = snapshot.you();
    let to_me = you.head.manhattan(&food);
    let contest = snapshot
        .nearest_rival_distance(&food)
        .map_or(0, |to_rival| (to_rival - to_me).max(0));

    let mut score = -to_me + config.food.contest_weight * contest;
    if food_in_pocket(snapshot, food) {
        score -= config.food.trap_penalty;
    }
    if you.health < config.food.hungry_health_threshold {
        let span = snapshot.width() + snapshot.height();
        score += config.food.hungry_bonus_weight * (span - to_me).max(0);
    }
    if is_food_in_starvation_loop(snapshot, food, config) {
        score -= config.food.starvation_penalty;
    }
    score
}

/// All food, best score first; equal scores keep the closer food first
pub fn rank_food(snapshot: &Snapshot, config: &Config) -> Vec<FoodTarget> {
    let head = snapshot.you().head;
    let mut targets: Vec<FoodTarget> = snapshot
        .food()
        .iter()
        .map(|&food| FoodTarget {
            food,
            score: score_food(snapshot, food, config),
        })
        .collect();
    targets.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| head.manhattan(&a.food).cmp(&head.manhattan(&b.food)))
    });
    targets
}

/// Closest food by Manhattan distance, first listed on ties
pub fn nearest_food(snapshot: &Snapshot) -> Option<Coord> {
    let head = snapshot.you().head;
    snapshot
        .food()
        .iter()
        .copied()
        .min_by_key(|food| head.manhattan(food))
}

/// Whether a rival is already heading for `food` and is no farther from it than us
pub fn rival_contests_food(snapshot: &Snapshot, food: Coord) -> bool {
    let to_me = snapshot.you().head.manhattan(&food);
    snapshot.rivals().any(|rival| {
        let to_rival = rival.head.manhattan(&food);
        let approaching = rival
            .facing()
            .map_or(false, |facing| facing.apply(&rival.head).manhattan(&food) < to_rival);
        approaching && to_rival <= to_me
    })
}

/// Another direction that still closes on `food` and is safe
///
/// Cells anywhere in the recent head history are refused, not only the
/// previous turn's head.
pub fn bait_alternative(
    snapshot: &Snapshot,
    food: Coord,
    avoid: Direction,
    history: &HeadHistory,
    config: &Config,
) -> Option<Direction> {
    let head = snapshot.you().head;
    let current = head.manhattan(&food);
    let mut best: Option<(Direction, i32)> = None;

    for dir in Direction::all() {
        if dir == avoid {
            continue;
        }
        let next = dir.apply(&head);
        if !is_legal_move(snapshot, dir, config)
            || would_self_collide_immediately(snapshot, dir)
            || history.recently_visited(&next)
        {
            continue;
        }
        let progress = current - next.manhattan(&food);
        if progress > 0 && best.map_or(true, |(_, most)| progress > most) {
            best = Some((dir, progress));
        }
    }

    best.map(|(dir, _)| dir)
}

/// Whether eating `food` leaves at least `max(length, area / 6)` room
///
/// The fill starts on the food cell with our body grown along the path there.
pub fn has_room_after_eating(snapshot: &Snapshot, food: Coord, config: &Config) -> bool {
    let grown = body_after_eating(snapshot, food, config);
    let mut walls = snapshot.rival_bodies();
    walls.extend(grown.iter().skip(1));

    let room = reachable_count(food, &walls, &grown) as f64;
    let needed = (snapshot.you().length as f64)
        .max(snapshot.area() as f64 / config.food.post_eat_area_divisor as f64);
    room >= needed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Battlesnake, Board};

    fn snake(id: &str, health: i32, body: Vec<Coord>) -> Battlesnake {
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health,
            head: body[0],
            length: body.len() as i32,
            body,
            latency: String::new(),
            shout: None,
        }
    }

    fn snapshot(me: &Battlesnake, rivals: Vec<Battlesnake>, food: Vec<Coord>) -> Snapshot {
        let mut snakes = vec![me.clone()];
        snakes.extend(rivals);
        Snapshot::new(
            &Board {
                width: 11,
                height: 11,
                food,
                snakes,
                hazards: vec![],
            },
            me,
        )
    }

    fn column(x: i32, from_y: i32, to_y: i32) -> Vec<Coord> {
        if from_y <= to_y {
            (from_y..=to_y).map(|y| Coord::new(x, y)).collect()
        } else {
            (to_y..=from_y).rev().map(|y| Coord::new(x, y)).collect()
        }
    }

    #[test]
    fn test_threats_sorted_and_filtered_by_radius() {
        let me = snake("me", 90, column(5, 5, 3));
        let near = snake("near", 90, column(5, 7, 8));
        let far = snake("far", 90, column(0, 0, 1));
        let snap = snapshot(&me, vec![far, near], vec![]);
        let threats = evaluate_threats_and_targets(&snap, &Config::default_hardcoded());
        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].snake_id, "near");
        assert!(threats[0].is_smaller);
        assert_eq!(threats[0].distance, 2);
    }

    #[test]
    fn test_interception_covers_most_rival_moves() {
        let me = snake("me", 90, column(5, 5, 1));
        let rival = snake("r", 90, column(5, 7, 9));
        let snap = snapshot(&me, vec![rival], vec![]);
        let threats = evaluate_threats_and_targets(&snap, &Config::default_hardcoded());
        assert_eq!(interception_move(&snap, &threats[0]), Some(Direction::Up));
        assert_eq!(
            find_intercept(&snap, &threats, &Config::default_hardcoded()),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_no_intercept_when_hungry() {
        let me = snake("me", 50, column(5, 5, 1));
        let rival = snake("r", 90, column(5, 7, 9));
        let snap = snapshot(&me, vec![rival], vec![]);
        let config = Config::default_hardcoded();
        let threats = evaluate_threats_and_targets(&snap, &config);
        assert_eq!(find_intercept(&snap, &threats, &config), None);
    }

    #[test]
    fn test_head_on_candidates_only_against_shorter_or_equal() {
        let config = Config::default_hardcoded();
        let me = snake("me", 90, column(5, 5, 3));

        let shorter = snake("r", 90, column(5, 7, 8));
        let snap = snapshot(&me, vec![shorter], vec![]);
        let threats = evaluate_threats_and_targets(&snap, &config);
        assert_eq!(head_on_candidates(&snap, &threats, &config), vec![Direction::Up]);

        let longer = snake("r", 90, column(5, 7, 10));
        let snap = snapshot(&me, vec![longer], vec![]);
        let threats = evaluate_threats_and_targets(&snap, &config);
        assert!(head_on_candidates(&snap, &threats, &config).is_empty());
    }

    #[test]
    fn test_food_closer_to_rival_scores_lower() {
        let me = snake("me", 90, column(5, 5, 3));
        let rival = snake("r", 90, column(9, 9, 8));
        let ours = Coord::new(3, 5);
        let theirs = Coord::new(8, 9);
        let snap = snapshot(&me, vec![rival], vec![theirs, ours]);
        let ranked = rank_food(&snap, &Config::default_hardcoded());
        assert_eq!(ranked[0].food, ours);
    }

    #[test]
    fn test_dead_end_food_is_a_starvation_loop() {
        // Food at (0,10) sits at the end of a corridor sealed by a rival wall; the other food is outside.
        let me = snake("me", 90, vec![Coord::new(0, 7), Coord::new(0, 6), Coord::new(0, 5)]);
        let wall = snake("r", 90, column(1, 10, 4));
        let trapped = Coord::new(0, 10);
        let outside = Coord::new(6, 6);
        let snap = snapshot(&me, vec![wall], vec![trapped, outside]);
        let config = Config::default_hardcoded();
        assert!(is_food_in_starvation_loop(&snap, trapped, &config));
        assert!(!is_food_in_starvation_loop(&snap, outside, &config));
    }

    #[test]
    fn test_rival_heading_for_food_is_bait() {
        let me = snake("me", 90, column(5, 3, 1));
        let rival = snake("r", 90, column(5, 8, 10));
        let food = Coord::new(5, 6);
        let snap = snapshot(&me, vec![rival], vec![food]);
        assert!(rival_contests_food(&snap, food));

        let away = snake("r", 90, column(5, 8, 6));
        let snap = snapshot(&me, vec![away], vec![Coord::new(5, 5)]);
        assert!(!rival_contests_food(&snap, Coord::new(5, 5)));
    }

    #[test]
    fn test_bait_alternative_makes_progress() {
        let me = snake("me", 90, column(5, 3, 1));
        let food = Coord::new(7, 6);
        let snap = snapshot(&me, vec![], vec![food]);
        let history = HeadHistory::new(4);
        let config = Config::default_hardcoded();
        assert_eq!(
            bait_alternative(&snap, food, Direction::Up, &history, &config),
            Some(Direction::Right)
        );

        let mut visited = HeadHistory::new(4);
        visited.push(Coord::new(6, 3));
        assert_eq!(bait_alternative(&snap, food, Direction::Up, &visited, &config), None);
    }

    #[test]
    fn test_room_after_eating_counts_from_the_food() {
        // The first step toward (0,0) is wide open, but once eaten we sit in a 7-cell
        // column and need area / 6 = 8.17.
        let me = snake("me", 90, vec![Coord::new(3, 0), Coord::new(4, 0), Coord::new(5, 0)]);
        let wall = snake("r", 90, column(1, 6, 1));
        let food = Coord::new(0, 0);
        let board = Board {
            width: 7,
            height: 7,
            food: vec![food],
            snakes: vec![me.clone(), wall],
            hazards: vec![],
        };
        let snap = Snapshot::new(&board, &me);
        let config = Config::default_hardcoded();
        assert!(!has_room_after_eating(&snap, food, &config));

        let open = snake("me", 90, column(5, 5, 3));
        let snap = snapshot(&open, vec![], vec![Coord::new(5, 8)]);
        assert!(has_room_after_eating(&snap, Coord::new(5, 8), &config));
    }
}
