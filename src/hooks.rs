//! Seams to the transaction and persistence layers.
//!
//! Both are called after the gameplay effect has been applied locally and
//! return nothing the simulation depends on, so a slow or failing backend
//! can never hold up or undo a move.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::coords::MatrixPosition;

/// Fire-and-forget notifications for the on-chain action log
pub trait TransactionHooks {
    fn on_player_move(&mut self, _position: MatrixPosition) {}
    fn on_player_attack(&mut self) {}
}

/// Hooks that ignore everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl TransactionHooks for NoopHooks {}

/// Best results of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameStat {
    pub coins: u32,
    pub kills: u32,
    pub lived_minutes: u32,
}

impl GameStat {
    /// Field-wise maximum
    pub fn merge_max(self, other: GameStat) -> GameStat {
        GameStat {
            coins: self.coins.max(other.coins),
            kills: self.kills.max(other.kills),
            lived_minutes: self.lived_minutes.max(other.lived_minutes),
        }
    }
}

/// Persistent player progress
pub trait ProgressStore {
    fn load_coins(&self) -> u32;
    fn save_coins(&mut self, coins: u32);
    fn best_stat(&self) -> Option<GameStat>;
    /// Merge a finished session into the best record, field by field
    fn record_stat(&mut self, stat: GameStat);
}

/// In-process store, used headless and in tests
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub coins: u32,
    pub best: Option<GameStat>,
}

impl MemoryStore {
    pub fn with_coins(coins: u32) -> Self {
        Self { coins, best: None }
    }
}

impl ProgressStore for MemoryStore {
    fn load_coins(&self) -> u32 {
        self.coins
    }

    fn save_coins(&mut self, coins: u32) {
        self.coins = coins;
    }

    fn best_stat(&self) -> Option<GameStat> {
        self.best
    }

    fn record_stat(&mut self, stat: GameStat) {
        let best = self.best.map_or(stat, |best| best.merge_max(stat));
        debug!("best stat is now {:?}", best);
        self.best = Some(best);
    }
}
