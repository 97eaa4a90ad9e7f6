//! Game constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! Constants are split into submodules by domain for easier navigation.

mod difficulty;
mod enemies;
mod level;
mod player;
mod time;

pub use difficulty::*;
pub use enemies::*;
pub use level::*;
pub use player::*;
pub use time::*;
