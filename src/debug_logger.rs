// Per-turn decision log
//
// One JSON line per /move, written by a fire-and-forget tokio task so the
// response never waits on disk. The replay tool reads the same format.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::engine::Decision;
use crate::types::{Board, Coord};

/// A single logged turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugLogEntry {
    pub game_id: String,
    pub snake_id: String,
    pub turn: i32,
    pub chosen_move: String,
    pub strategy: String,
    #[serde(default)]
    pub history: Vec<Coord>,
    pub board: Board,
    pub timestamp: String,
}

impl DebugLogEntry {
    pub fn new(
        game_id: &str,
        snake_id: &str,
        turn: i32,
        decision: &Decision,
        history: Vec<Coord>,
        board: Board,
    ) -> Self {
        DebugLogEntry {
            game_id: game_id.to_string(),
            snake_id: snake_id.to_string(),
            turn,
            chosen_move: decision.direction.as_str().to_string(),
            strategy: decision.strategy.as_str().to_string(),
            history,
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Opens (and truncates) the log file when enabled
    ///
    /// A file that cannot be created leaves the logger disabled.
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues an entry for writing; must be called inside a tokio runtime
    pub fn log_turn(&self, entry: DebugLogEntry) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: DebugLogEntry) {
        let mut file_guard = file_handle.lock().await;
        let Some(file) = file_guard.as_mut() else {
            return;
        };

        let json_line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
                return;
            }
        };

        if let Err(e) = file.write_all(format!("{}\n", json_line).as_bytes()).await {
            error!("Failed to write debug log entry: {}", e);
        } else if let Err(e) = file.flush().await {
            error!("Failed to flush debug log: {}", e);
        }
    }
}
