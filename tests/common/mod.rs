// Board builders shared by the integration tests

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use strategic_snake::types::{Battlesnake, Board, Coord, Direction, Game};

pub fn game(id: &str) -> Game {
    Game {
        id: id.to_string(),
        timeout: 500,
        source: "test".to_string(),
        ..Default::default()
    }
}

pub fn snake(id: &str, health: i32, body: &[(i32, i32)]) -> Battlesnake {
    let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord::new(x, y)).collect();
    Battlesnake {
        id: id.to_string(),
        name: id.to_string(),
        health,
        head: body[0],
        length: body.len() as i32,
        body,
        latency: "0".to_string(),
        shout: None,
    }
}

pub fn board(width: i32, height: i32, snakes: Vec<Battlesnake>) -> Board {
    Board {
        width,
        height,
        food: vec![],
        snakes,
        hazards: vec![],
    }
}

fn free_cell(rng: &mut StdRng, width: i32, height: i32, taken: &[Coord]) -> Option<Coord> {
    for _ in 0..64 {
        let cell = Coord::new(rng.random_range(0..width), rng.random_range(0..height));
        if !taken.contains(&cell) {
            return Some(cell);
        }
    }
    None
}

/// Self-avoiding random walk; the walk's start is the head
pub fn random_body(rng: &mut StdRng, width: i32, height: i32, len: usize, taken: &[Coord]) -> Vec<Coord> {
    let Some(head) = free_cell(rng, width, height, taken) else {
        return vec![];
    };
    let mut body = vec![head];
    while body.len() < len {
        let Some(last) = body.last().copied() else {
            break;
        };
        let mut dirs = Direction::all();
        dirs.shuffle(rng);
        let next = dirs.iter().map(|d| d.apply(&last)).find(|c| {
            c.x >= 0 && c.y >= 0 && c.x < width && c.y < height && !body.contains(c) && !taken.contains(c)
        });
        match next {
            Some(cell) => body.push(cell),
            None => break,
        }
    }
    body
}

/// A random but well-formed board: our snake first, zero to three rivals, some food and hazards
pub fn random_board(rng: &mut StdRng) -> (Board, Battlesnake) {
    let width = rng.random_range(5..=11);
    let height = rng.random_range(5..=11);
    let mut taken: Vec<Coord> = Vec::new();
    let mut snakes = Vec::new();

    let rivals = rng.random_range(0..=3);
    for idx in 0..=rivals {
        let len = rng.random_range(1..=7);
        let body = random_body(rng, width, height, len, &taken);
        if body.is_empty() {
            continue;
        }
        taken.extend(&body);
        let health = rng.random_range(1..=100);
        let id = if idx == 0 { "me".to_string() } else { format!("rival-{}", idx) };
        let coords: Vec<(i32, i32)> = body.iter().map(|c| (c.x, c.y)).collect();
        snakes.push(snake(&id, health, &coords));
    }

    let mut food = Vec::new();
    for _ in 0..rng.random_range(0..4) {
        if let Some(cell) = free_cell(rng, width, height, &taken) {
            taken.push(cell);
            food.push(cell);
        }
    }
    let hazards = (0..rng.random_range(0..6))
        .map(|_| Coord::new(rng.random_range(0..width), rng.random_range(0..height)))
        .collect();

    let you = snakes[0].clone();
    (
        Board {
            width,
            height,
            food,
            snakes,
            hazards,
        },
        you,
    )
}
