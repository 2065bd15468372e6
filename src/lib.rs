// Library exports for the Battlesnake bot
// The server binary and the replay tool both build on these modules

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod engine;
pub mod flood_fill;
pub mod grid;
pub mod handler;
pub mod history;
pub mod minimax;
pub mod pathfinding;
pub mod replay;
pub mod safety;
pub mod snapshot;
pub mod tactics;
pub mod trap;
pub mod types;
