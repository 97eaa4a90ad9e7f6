//! Game engine - owns all game state and provides a clean API to the
//! application shell.
//!
//! The engine handles:
//! - Game state (world, level, clock, timers, navigator)
//! - Session setup (level generation, initial spawns)
//! - Simulation advancement
//!
//! The application shell (main.rs, or a renderer embedding the crate) only
//! forwards input, ticks the engine and drains its events.

pub mod game_state;
pub mod initialization;
pub mod simulation;

pub use game_state::GameState;
pub use simulation::tick;
