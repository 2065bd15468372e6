// Rolling head history for oscillation checks
//
// The only state that outlives a turn. It is partitioned per (game, snake)
// so concurrent games never see each other's positions.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

use crate::types::Coord;

/// Identity of one snake in one game
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub game_id: String,
    pub snake_id: String,
}

impl SessionKey {
    pub fn new(game_id: &str, snake_id: &str) -> Self {
        SessionKey {
            game_id: game_id.to_string(),
            snake_id: snake_id.to_string(),
        }
    }
}

/// Most recent head positions, oldest first, capped at `capacity`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadHistory {
    positions: VecDeque<Coord>,
    capacity: usize,
}

impl HeadHistory {
    pub fn new(capacity: usize) -> Self {
        HeadHistory {
            positions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn from_positions(capacity: usize, positions: &[Coord]) -> Self {
        let mut history = HeadHistory::new(capacity);
        for pos in positions {
            history.push(*pos);
        }
        history
    }

    pub fn push(&mut self, head: Coord) {
        if self.capacity == 0 {
            return;
        }
        while self.positions.len() >= self.capacity {
            self.positions.pop_front();
        }
        self.positions.push_back(head);
    }

    /// Whether `coord` was one of our recent head positions
    pub fn recently_visited(&self, coord: &Coord) -> bool {
        self.positions.contains(coord)
    }

    pub fn last(&self) -> Option<Coord> {
        self.positions.back().copied()
    }

    pub fn positions(&self) -> Vec<Coord> {
        self.positions.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Head histories of every active session
#[derive(Debug, Default)]
pub struct HistoryStore {
    sessions: Mutex<HashMap<SessionKey, HeadHistory>>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        HistoryStore {
            sessions: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// Copy of a session's history; empty if the session is unknown
    pub fn get(&self, key: &SessionKey) -> HeadHistory {
        self.sessions
            .lock()
            .get(key)
            .cloned()
            .unwrap_or_else(|| HeadHistory::new(self.capacity))
    }

    pub fn record(&self, key: &SessionKey, head: Coord) {
        let mut sessions = self.sessions.lock();
        sessions
            .entry(key.clone())
            .or_insert_with(|| HeadHistory::new(self.capacity))
            .push(head);
    }

    pub fn end_session(&self, key: &SessionKey) {
        self.sessions.lock().remove(key);
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().len()
    }
}
