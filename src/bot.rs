// API-facing bot
//
// Owns the static configuration, the per-session head histories and the
// optional debug log. Each /move copies its session's history out, runs the
// cascade on a blocking thread and records the current head afterwards.

use log::{info, warn};
use rand::seq::IndexedRandom;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::debug_logger::{DebugLogEntry, DebugLogger};
use crate::engine::{decide_turn, Decision, Strategy};
use crate::history::{HistoryStore, SessionKey};
use crate::types::{Battlesnake, Board, Direction, Game};

const COLORS: [&str; 6] = ["#888888", "#FF5733", "#33FF57", "#3357FF", "#FFD700", "#00CED1"];
const HEADS: [&str; 6] = ["default", "beluga", "evil", "sand-worm", "smile", "tiger"];
const TAILS: [&str; 6] = ["default", "bolt", "coffee", "pixel", "sharp", "skinny"];

pub struct Bot {
    config: Config,
    history: HistoryStore,
    debug_logger: DebugLogger,
}

impl Bot {
    pub fn new(config: Config) -> Self {
        Self::with_debug_logger(config, DebugLogger::disabled())
    }

    pub fn with_debug_logger(config: Config, debug_logger: DebugLogger) -> Self {
        let history = HistoryStore::new(config.history.depth);
        Bot {
            config,
            history,
            debug_logger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Metadata and a randomly picked appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let mut rng = rand::rng();
        json!({
            "apiversion": "1",
            "author": "strategic-snake",
            "color": COLORS.choose(&mut rng).copied().unwrap_or("#888888"),
            "head": HEADS.choose(&mut rng).copied().unwrap_or("default"),
            "tail": TAILS.choose(&mut rng).copied().unwrap_or("default"),
        })
    }

    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, _board: &Board, you: &Battlesnake) {
        info!("GAME START {} ({})", game.id, you.id);
    }

    /// Corresponds to POST /end endpoint; forgets the session's head history
    pub fn end(&self, game: &Game, _turn: &i32, _board: &Board, you: &Battlesnake) {
        self.history.end_session(&SessionKey::new(&game.id, &you.id));
        info!("GAME OVER {} ({})", game.id, you.id);
    }

    /// Runs the decision cascade for one turn
    /// Corresponds to POST /move endpoint
    pub async fn get_move(&self, game: &Game, turn: &i32, board: &Board, you: &Battlesnake) -> Value {
        let start_time = Instant::now();
        let deadline = start_time + Duration::from_millis(self.config.timing.effective_budget_ms());
        let key = SessionKey::new(&game.id, &you.id);
        let history = self.history.get(&key);

        info!("Turn {}: Computing move", turn);

        let decision = {
            let board = board.clone();
            let you = you.clone();
            let history = history.clone();
            let config = self.config.clone();
            let turn = *turn;
            tokio::task::spawn_blocking(move || {
                decide_turn(&board, &you, turn, &history, &config, deadline)
            })
            .await
        };

        let decision = match decision {
            Ok(decision) => decision,
            Err(e) => {
                warn!("Turn {}: move computation failed: {}", turn, e);
                Self::emergency_decision(board, you)
            }
        };

        self.history.record(&key, you.head_coord());

        info!(
            "Turn {}: Chose {} via {} ({}ms)",
            turn,
            decision.direction.as_str(),
            decision.strategy.as_str(),
            start_time.elapsed().as_millis()
        );

        if self.debug_logger.is_enabled() {
            self.debug_logger.log_turn(DebugLogEntry::new(
                &game.id,
                &you.id,
                *turn,
                &decision,
                history.positions(),
                board.clone(),
            ));
        }

        json!({ "move": decision.direction.as_str() })
    }

    /// First direction that stays on the board, without any analysis
    fn emergency_decision(board: &Board, you: &Battlesnake) -> Decision {
        let head = you.head_coord();
        let direction = Direction::all()
            .into_iter()
            .find(|dir| {
                let next = dir.apply(&head);
                next.x >= 0 && next.y >= 0 && next.x < board.width && next.y < board.height
            })
            .unwrap_or(Direction::Down);
        Decision {
            direction,
            strategy: Strategy::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;

    #[test]
    fn test_info_uses_palettes() {
        let bot = Bot::new(Config::default_hardcoded());
        let info = bot.info();
        assert_eq!(info["apiversion"], "1");
        assert!(COLORS.contains(&info["color"].as_str().unwrap_or("")));
        assert!(HEADS.contains(&info["head"].as_str().unwrap_or("")));
        assert!(TAILS.contains(&info["tail"].as_str().unwrap_or("")));
    }

    #[test]
    fn test_emergency_decision_stays_on_board() {
        let board = Board {
            width: 11,
            height: 11,
            food: vec![],
            snakes: vec![],
            hazards: vec![],
        };
        let you = Battlesnake {
            id: "me".to_string(),
            name: "me".to_string(),
            health: 50,
            body: vec![Coord::new(0, 10)],
            head: Coord::new(0, 10),
            length: 1,
            latency: String::new(),
            shout: None,
        };
        assert_eq!(Bot::emergency_decision(&board, &you).direction, Direction::Down);
    }
}
