// Per-turn board snapshot
//
// Built once from the incoming request and read by every strategy. Input is
// repaired here so the rest of the engine can rely on its invariants:
// every snake has a non-empty body, head == body[0], length == body.len(),
// food and hazard cells are in-bounds and unique, and `you` is one of the
// snakes rather than a separate copy.

use log::warn;

use crate::grid::{CellSet, MAX_DIMENSION};
use crate::types::{Battlesnake, Board, Coord};

#[derive(Debug, Clone)]
pub struct Snapshot {
    width: i32,
    height: i32,
    food: Vec<Coord>,
    food_set: CellSet,
    hazards: CellSet,
    snakes: Vec<Battlesnake>,
    you_index: usize,
}

impl Snapshot {
    pub fn new(board: &Board, you: &Battlesnake) -> Self {
        let width = board.width.clamp(1, MAX_DIMENSION);
        let height = board.height.clamp(1, MAX_DIMENSION);
        if width != board.width || height != board.height {
            warn!(
                "Board dimensions {}x{} are out of range, clamping to {}x{}",
                board.width, board.height, width, height
            );
        }

        let mut food_set = CellSet::new(width, height);
        let food: Vec<Coord> = board
            .food
            .iter()
            .copied()
            .filter(|f| food_set.insert(*f))
            .collect();
        let hazards = CellSet::from_coords(width, height, &board.hazards);

        let mut snakes: Vec<Battlesnake> = board
            .snakes
            .iter()
            .filter_map(|snake| {
                let normalized = Self::normalize(snake);
                if normalized.is_none() {
                    warn!("Dropping snake '{}' with an empty body", snake.id);
                }
                normalized
            })
            .collect();

        let you_index = match snakes.iter().position(|s| s.id == you.id) {
            Some(idx) => idx,
            None => {
                warn!("Snake '{}' missing from board.snakes, inserting it", you.id);
                let mut own = you.clone();
                if own.body.is_empty() {
                    own.body.push(you.head);
                }
                snakes.push(Self::normalize(&own).unwrap_or(own));
                snakes.len() - 1
            }
        };

        Snapshot {
            width,
            height,
            food,
            food_set,
            hazards,
            snakes,
            you_index,
        }
    }

    fn normalize(snake: &Battlesnake) -> Option<Battlesnake> {
        let head = *snake.body.first()?;
        let mut normalized = snake.clone();
        normalized.head = head;
        normalized.length = normalized.body.len() as i32;
        Some(normalized)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    pub fn in_bounds(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Orthogonal neighbours that lie on the board
    pub fn neighbors(&self, coord: &Coord) -> Vec<Coord> {
        coord
            .neighbors()
            .into_iter()
            .filter(|n| self.in_bounds(n))
            .collect()
    }

    /// Number of board edges the cell touches (0 in the interior, 2 in a corner)
    pub fn edges_touching(&self, coord: &Coord) -> usize {
        [
            coord.x == 0,
            coord.x == self.width - 1,
            coord.y == 0,
            coord.y == self.height - 1,
        ]
        .iter()
        .filter(|&&edge| edge)
        .count()
    }

    pub fn food(&self) -> &[Coord] {
        &self.food
    }

    pub fn is_food(&self, coord: &Coord) -> bool {
        self.food_set.contains(coord)
    }

    pub fn is_hazard(&self, coord: &Coord) -> bool {
        self.hazards.contains(coord)
    }

    pub fn snakes(&self) -> &[Battlesnake] {
        &self.snakes
    }

    pub fn you(&self) -> &Battlesnake {
        &self.snakes[self.you_index]
    }

    pub fn rivals(&self) -> impl Iterator<Item = &Battlesnake> {
        let you_index = self.you_index;
        self.snakes
            .iter()
            .enumerate()
            .filter(move |(idx, _)| *idx != you_index)
            .map(|(_, snake)| snake)
    }

    /// Empty cell set sized to this board
    pub fn empty_cells(&self) -> CellSet {
        CellSet::new(self.width, self.height)
    }

    /// Bodies of every rival snake
    pub fn rival_bodies(&self) -> CellSet {
        let mut cells = self.empty_cells();
        for rival in self.rivals() {
            cells.extend(&rival.body);
        }
        cells
    }

    /// Bodies of every snake, including ours
    pub fn all_bodies(&self) -> CellSet {
        let mut cells = self.empty_cells();
        for snake in &self.snakes {
            cells.extend(&snake.body);
        }
        cells
    }

    /// Distance from a cell to the closest rival head, if any rival exists
    pub fn nearest_rival_distance(&self, coord: &Coord) -> Option<i32> {
        self.rivals().map(|r| r.head.manhattan(coord)).min()
    }

    /// Our body after the head steps onto `next_head`
    ///
    /// The tail stays put when `next_head` holds food, which models growth.
    pub fn simulate_own_body(&self, next_head: Coord) -> Vec<Coord> {
        simulate_body(&self.you().body, next_head, self.is_food(&next_head))
    }

    /// Cells a snake could move its head into next turn
    ///
    /// In-bounds and not inside any body, where every tail is assumed to vacate.
    pub fn possible_next_heads(&self, snake: &Battlesnake) -> Vec<Coord> {
        let mut occupied = self.empty_cells();
        for other in &self.snakes {
            let keep = other.body.len().saturating_sub(1);
            occupied.extend(&other.body[..keep]);
        }
        self.neighbors(&snake.head)
            .into_iter()
            .filter(|cell| !occupied.contains(cell))
            .collect()
    }
}

/// Moves a body one step onto `next_head`, keeping the tail when growing
pub fn simulate_body(body: &[Coord], next_head: Coord, grows: bool) -> Vec<Coord> {
    let keep = if grows {
        body.len()
    } else {
        body.len().saturating_sub(1)
    };
    let mut simulated = Vec::with_capacity(keep + 1);
    simulated.push(next_head);
    simulated.extend_from_slice(&body[..keep]);
    simulated
}
