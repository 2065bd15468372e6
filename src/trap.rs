// Trap and escape analysis
//
// Three questions about pockets of space:
// - does one of our moves walk into a pocket too small to live in?
// - if so, which nearby cells lead back out to enough room?
// - can we step next to a rival's head and leave it boxed in?

use std::collections::VecDeque;

use crate::config::Config;
use crate::flood_fill::reachable_count;
use crate::grid::CellSet;
use crate::snapshot::Snapshot;
use crate::types::{Battlesnake, Coord, Direction};

/// Outcome of looking one move ahead for a trap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapAnalysis {
    pub is_trap: bool,
    pub available_space: usize,
    pub escape_routes: Vec<Vec<Coord>>,
}

/// Space below which a move counts as a trap: `min(2 * length, area / 4)`
pub fn trap_threshold(snapshot: &Snapshot, config: &Config) -> f64 {
    let by_length = (config.trap.space_length_multiplier * snapshot.you().length) as f64;
    let by_area = snapshot.area() as f64 / config.trap.space_area_divisor as f64;
    by_length.min(by_area)
}

/// Space an escape point must open up: `2 * length`
fn escape_threshold(snapshot: &Snapshot, config: &Config) -> usize {
    (config.trap.space_length_multiplier * snapshot.you().length).max(0) as usize
}

/// Cells considered closed when judging our room after a move
///
/// Rival bodies, every cell a rival head could step into, and our own body
/// after the move (which the fill releases as the tail moves on).
fn danger_cells(snapshot: &Snapshot, simulated_body: &[Coord]) -> CellSet {
    let mut blocked = snapshot.rival_bodies();
    for rival in snapshot.rivals() {
        blocked.extend(&snapshot.possible_next_heads(rival));
    }
    blocked.extend(simulated_body.iter().skip(1));
    blocked
}

pub fn detect_trap(snapshot: &Snapshot, dir: Direction, config: &Config) -> TrapAnalysis {
    let next = dir.apply(&snapshot.you().head);
    let simulated = snapshot.simulate_own_body(next);
    let blocked = danger_cells(snapshot, &simulated);

    let available_space = reachable_count(next, &blocked, &simulated);
    if (available_space as f64) < trap_threshold(snapshot, config) {
        let escape_routes = find_escape_routes(snapshot, next, &blocked, &simulated, config);
        TrapAnalysis {
            is_trap: true,
            available_space,
            escape_routes,
        }
    } else {
        TrapAnalysis {
            is_trap: false,
            available_space,
            escape_routes: Vec::new(),
        }
    }
}

/// Breadth-first search for cells from which enough space is reachable
///
/// Routes start at `start`, are returned in discovery order, and the search
/// stops after `max_escape_routes` of them. An escape cell is not expanded.
pub fn find_escape_routes(
    snapshot: &Snapshot,
    start: Coord,
    blocked: &CellSet,
    own_body: &[Coord],
    config: &Config,
) -> Vec<Vec<Coord>> {
    let mut routes = Vec::new();
    let grid = snapshot.empty_cells();
    let Some(start_idx) = grid.index_of(&start) else {
        return routes;
    };

    let needed = escape_threshold(snapshot, config);
    let mut parent: Vec<Option<usize>> = vec![None; snapshot.area() as usize];
    let mut visited = snapshot.empty_cells();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start_idx);

    while let Some(idx) = queue.pop_front() {
        if routes.len() >= config.trap.max_escape_routes {
            break;
        }
        let current = grid.coord_of(idx);

        if reachable_count(current, blocked, own_body) >= needed {
            routes.push(route_to(&grid, &parent, idx));
            continue;
        }

        for neighbor in current.neighbors() {
            let Some(n_idx) = grid.index_of(&neighbor) else {
                continue;
            };
            if visited.contains(&neighbor) || blocked.contains(&neighbor) {
                continue;
            }
            visited.insert(neighbor);
            parent[n_idx] = Some(idx);
            queue.push_back(n_idx);
        }
    }

    routes
}

fn route_to(grid: &CellSet, parent: &[Option<usize>], end: usize) -> Vec<Coord> {
    let mut route = vec![grid.coord_of(end)];
    let mut current = end;
    while let Some(prev) = parent[current] {
        route.push(grid.coord_of(prev));
        current = prev;
    }
    route.reverse();
    route
}

/// A move that lands next to `rival`'s head and leaves it at most one way out
///
/// The squeeze only counts when the rival is also against at least two edges
/// or its flood-filled room is no more than `length + margin`.
pub fn can_force_trap(
    snapshot: &Snapshot,
    rival: &Battlesnake,
    config: &Config,
) -> Option<Direction> {
    let head = snapshot.you().head;

    Direction::all().into_iter().find(|dir| {
        let next = dir.apply(&head);
        if !snapshot.in_bounds(&next) || next.manhattan(&rival.head) != 1 {
            return false;
        }

        let simulated = snapshot.simulate_own_body(next);
        let mut occupied = snapshot.empty_cells();
        for other in snapshot.rivals() {
            let keep = other.body.len().saturating_sub(1);
            occupied.extend(&other.body[..keep]);
        }
        occupied.extend(&simulated);

        let exits = snapshot
            .neighbors(&rival.head)
            .into_iter()
            .filter(|cell| !occupied.contains(cell))
            .count();
        if exits > 1 {
            return false;
        }

        let pressed = snapshot.edges_touching(&rival.head) >= config.trap.force_trap_min_edges;
        let mut walls = occupied;
        walls.extend(&rival.body);
        let room = reachable_count(rival.head, &walls, &rival.body) as i32;
        let cramped = room <= rival.length + config.trap.force_trap_space_margin;

        pressed || cramped
    })
}

/// Whether stepping onto `next_head` closes us inside our own coils
///
/// True when no neighbour of the new head is free of the board edge and our
/// moved body, or when less room than our length is left inside.
pub fn would_trap_in_own_loop(snapshot: &Snapshot, next_head: Coord) -> bool {
    let simulated = snapshot.simulate_own_body(next_head);
    let mut walls = snapshot.empty_cells();
    walls.extend(simulated.iter().skip(1));

    let boxed_in = next_head
        .neighbors()
        .iter()
        .all(|n| !snapshot.in_bounds(n) || walls.contains(n));
    if boxed_in {
        return true;
    }

    let room = reachable_count(next_head, &walls, &simulated);
    (room as i32) < snapshot.you().length
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Board;

    fn snake(id: &str, body: Vec<Coord>) -> Battlesnake {
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health: 90,
            head: body[0],
            length: body.len() as i32,
            body,
            latency: String::new(),
            shout: None,
        }
    }

    fn snapshot(width: i32, height: i32, me: &Battlesnake, rivals: Vec<Battlesnake>) -> Snapshot {
        let mut snakes = vec![me.clone()];
        snakes.extend(rivals);
        Snapshot::new(
            &Board {
                width,
                height,
                food: vec![],
                snakes,
                hazards: vec![],
            },
            me,
        )
    }

    #[test]
    fn test_open_board_is_not_a_trap() {
        let me = snake("me", vec![Coord::new(5, 5), Coord::new(5, 4), Coord::new(5, 3)]);
        let snap = snapshot(11, 11, &me, vec![]);
        let analysis = detect_trap(&snap, Direction::Up, &Config::default_hardcoded());
        assert!(!analysis.is_trap);
        assert!(analysis.escape_routes.is_empty());
        assert!(analysis.available_space >= 6);
    }

    #[test]
    fn test_pocket_behind_rival_is_a_trap() {
        // A rival wall closes column 0 above and below (0,5); stepping left enters a 1-cell pocket.
        let me = snake("me", vec![Coord::new(1, 5), Coord::new(2, 5), Coord::new(3, 5)]);
        let wall = snake(
            "r",
            vec![
                Coord::new(0, 6),
                Coord::new(1, 6),
                Coord::new(2, 6),
                Coord::new(3, 6),
                Coord::new(4, 6),
                Coord::new(4, 5),
                Coord::new(4, 4),
                Coord::new(3, 4),
                Coord::new(2, 4),
                Coord::new(1, 4),
                Coord::new(0, 4),
            ],
        );
        let snap = snapshot(11, 11, &me, vec![wall]);
        let analysis = detect_trap(&snap, Direction::Left, &Config::default_hardcoded());
        assert!(analysis.is_trap);
        assert!((analysis.available_space as f64) < trap_threshold(&snap, &Config::default_hardcoded()));
    }

    #[test]
    fn test_force_trap_against_corner() {
        // Rival in the corner (0,0) heading down; its only exit is (1,0).
        let me = snake("me", vec![Coord::new(2, 0), Coord::new(3, 0), Coord::new(4, 0), Coord::new(5, 0)]);
        let rival = snake("r", vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)]);
        let snap = snapshot(11, 11, &me, vec![rival.clone()]);
        assert_eq!(
            can_force_trap(&snap, &rival, &Config::default_hardcoded()),
            Some(Direction::Left)
        );
    }

    #[test]
    fn test_no_force_trap_in_open_space() {
        let me = snake("me", vec![Coord::new(2, 5), Coord::new(2, 4), Coord::new(2, 3), Coord::new(2, 2)]);
        let rival = snake("r", vec![Coord::new(5, 5), Coord::new(5, 4), Coord::new(5, 3)]);
        let snap = snapshot(11, 11, &me, vec![rival.clone()]);
        assert_eq!(can_force_trap(&snap, &rival, &Config::default_hardcoded()), None);
    }

    #[test]
    fn test_own_loop_detection() {
        // A long body curls around (1,1); entering it leaves no way out.
        let me = snake(
            "me",
            vec![
                Coord::new(1, 2),
                Coord::new(2, 2),
                Coord::new(2, 1),
                Coord::new(2, 0),
                Coord::new(1, 0),
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(0, 2),
                Coord::new(0, 3),
                Coord::new(1, 3),
                Coord::new(2, 3),
                Coord::new(3, 3),
            ],
        );
        let snap = snapshot(11, 11, &me, vec![]);
        assert!(would_trap_in_own_loop(&snap, Coord::new(1, 1)));

        let open = snake("me", vec![Coord::new(5, 5), Coord::new(5, 4), Coord::new(5, 3)]);
        let snap = snapshot(11, 11, &open, vec![]);
        assert!(!would_trap_in_own_loop(&snap, Coord::new(5, 6)));
    }

    #[test]
    fn test_escape_routes_found_past_vacating_body() {
        // Stepping left enters a 2-cell pocket. From its far end the fill reaches our
        // old head late enough to pass and gets back to the open board.
        let me = snake("me", vec![Coord::new(5, 0), Coord::new(5, 1), Coord::new(5, 2)]);
        let wall = snake(
            "r",
            vec![
                Coord::new(4, 3),
                Coord::new(4, 2),
                Coord::new(4, 1),
                Coord::new(3, 1),
                Coord::new(2, 1),
                Coord::new(2, 0),
            ],
        );
        let snap = snapshot(11, 11, &me, vec![wall]);
        let mut config = Config::default_hardcoded();

        let analysis = detect_trap(&snap, Direction::Left, &config);
        assert!(analysis.is_trap);
        assert_eq!(analysis.available_space, 2);
        assert!(!analysis.escape_routes.is_empty());
        assert!(analysis.escape_routes.len() <= config.trap.max_escape_routes);
        assert!(analysis.escape_routes.iter().all(|route| route[0] == Coord::new(4, 0)));

        let next = Coord::new(4, 0);
        let simulated = snap.simulate_own_body(next);
        let blocked = danger_cells(&snap, &simulated);
        config.trap.max_escape_routes = 0;
        assert!(find_escape_routes(&snap, next, &blocked, &simulated, &config).is_empty());
    }

    #[test]
    fn test_escape_search_stops_at_cap_in_discovery_order() {
        // (5,5) is a plus-shaped pocket whose only exit is our segment at (5,4). Each arm
        // reaches that segment one move later, after it has vacated.
        let me = snake("me", vec![Coord::new(0, 10)]);
        let snap = snapshot(11, 11, &me, vec![]);
        let start = Coord::new(5, 5);
        let own_body = [start, Coord::new(5, 4), Coord::new(5, 3)];
        let mut blocked = CellSet::from_coords(11, 11, &own_body[1..]);
        blocked.extend(&[
            Coord::new(3, 5),
            Coord::new(4, 4),
            Coord::new(4, 6),
            Coord::new(5, 7),
            Coord::new(6, 6),
            Coord::new(6, 4),
            Coord::new(7, 5),
        ]);

        let mut config = Config::default_hardcoded();
        config.trap.space_length_multiplier = 10;
        assert_eq!(reachable_count(start, &blocked, &own_body), 4);

        let routes = find_escape_routes(&snap, start, &blocked, &own_body, &config);
        assert_eq!(
            routes,
            vec![
                vec![start, Coord::new(5, 6)],
                vec![start, Coord::new(4, 5)],
                vec![start, Coord::new(6, 5)],
            ]
        );

        config.trap.max_escape_routes = 2;
        let capped = find_escape_routes(&snap, start, &blocked, &own_body, &config);
        assert_eq!(capped, routes[..2].to_vec());
    }
}
