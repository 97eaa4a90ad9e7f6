//! Simulation core of an isometric survival game.
//!
//! The crate owns the world: level and tiles, enemies and their pathing,
//! the player's combat and economy, and the clock that drives them. A
//! renderer embeds it through `engine::GameState`, feeds input in, ticks it
//! and draws from the ECS world and the drained `GameEvent`s.

pub mod biome;
pub mod components;
pub mod config;
pub mod constants;
pub mod coords;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod hooks;
pub mod level;
pub mod live;
pub mod mapgen;
pub mod navigator;
pub mod progression;
pub mod spawner;
pub mod spawning;
pub mod systems;
pub mod tile;
pub mod time_system;
pub mod viewport;

pub use engine::GameState;
