// Configuration module for reading Snake.toml
// Every tuned threshold of the decision cascade lives here rather than inline

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub safety: SafetyConfig,
    pub pathfinding: PathfindingConfig,
    pub trap: TrapConfig,
    pub tactics: TacticsConfig,
    pub food: FoodConfig,
    pub search: SearchConfig,
    pub history: HistoryConfig,
    pub engine: EngineConfig,
    pub debug: DebugConfig,
}

/// Timing constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Move legality constants
#[derive(Debug, Deserialize, Clone)]
pub struct SafetyConfig {
    /// At or below this health, hazard cells are illegal
    pub low_health_hazard_threshold: i32,
}

/// Cost-aware pathfinding constants
#[derive(Debug, Deserialize, Clone)]
pub struct PathfindingConfig {
    /// Hazard penalty is `hazard_cost * (max_health / health)`
    pub hazard_cost: f64,
    pub max_health: f64,
}

/// Trap detection and forced-trap constants
#[derive(Debug, Deserialize, Clone)]
pub struct TrapConfig {
    pub space_length_multiplier: i32,
    pub space_area_divisor: i32,
    pub max_escape_routes: usize,
    pub force_trap_space_margin: i32,
    pub force_trap_min_edges: usize,
}

/// Interception and head-on constants
#[derive(Debug, Deserialize, Clone)]
pub struct TacticsConfig {
    pub threat_radius: i32,
    pub intercept_min_health: i32,
    pub equal_size_intercept_distance: i32,
    pub head_on_distance: i32,
}

/// Food scoring constants
#[derive(Debug, Deserialize, Clone)]
pub struct FoodConfig {
    pub contest_weight: i32,
    pub hungry_health_threshold: i32,
    pub hungry_bonus_weight: i32,
    pub trap_penalty: i32,
    pub starvation_penalty: i32,
    pub post_eat_area_divisor: i32,
    pub max_targets: usize,
}

/// Bounded adversarial search constants
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub space_weight: i64,
    pub small_board_dimension: i32,
    pub wall_penalty_weight: i64,
    pub wall_safe_distance: i32,
}

/// Oscillation history constants
#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    pub depth: usize,
}

/// Engine-wide settings
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Fixed seed for tie-breaking; None seeds from the OS every turn
    pub rng_seed: Option<u64>,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 500,
                network_overhead_ms: 100,
            },
            safety: SafetyConfig {
                low_health_hazard_threshold: 15,
            },
            pathfinding: PathfindingConfig {
                hazard_cost: 10.0,
                max_health: 100.0,
            },
            trap: TrapConfig {
                space_length_multiplier: 2,
                space_area_divisor: 4,
                max_escape_routes: 3,
                force_trap_space_margin: 2,
                force_trap_min_edges: 2,
            },
            tactics: TacticsConfig {
                threat_radius: 8,
                intercept_min_health: 50,
                equal_size_intercept_distance: 2,
                head_on_distance: 2,
            },
            food: FoodConfig {
                contest_weight: 2,
                hungry_health_threshold: 40,
                hungry_bonus_weight: 1,
                trap_penalty: 50,
                starvation_penalty: 1000,
                post_eat_area_divisor: 6,
                max_targets: 3,
            },
            search: SearchConfig {
                max_depth: 3,
                space_weight: 10,
                small_board_dimension: 12,
                wall_penalty_weight: 5,
                wall_safe_distance: 2,
            },
            history: HistoryConfig { depth: 4 },
            engine: EngineConfig { rng_seed: None },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Default configuration with a fixed tie-breaking seed
    pub fn deterministic(seed: u64) -> Self {
        let mut config = Self::default_hardcoded();
        config.engine.rng_seed = Some(seed);
        config
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!("Warning: Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
