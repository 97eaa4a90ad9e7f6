//! Pausable world clock and one-shot timers.
//!
//! All gameplay timing (freeze windows, cooldowns, respawns, regeneration)
//! reads `WorldClock::now`, which only advances while the game runs.

use hecs::Entity;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

// =============================================================================
// WORLD CLOCK
// =============================================================================

/// Simulation time in milliseconds
#[derive(Debug, Clone, Default)]
pub struct WorldClock {
    time: u64,
    paused: bool,
}

impl WorldClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.time
    }

    /// Move time forward unless paused
    pub fn advance(&mut self, delta_ms: u64) {
        if !self.paused {
            self.time += delta_ms;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Whole seconds of unpaused play
    pub fn lived_seconds(&self) -> u64 {
        self.time / 1000
    }
}

// =============================================================================
// TIMERS
// =============================================================================

pub type TimerId = u64;

/// What happens when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// The freeze visual effect of an NPC ends
    FreezeEffectEnd(Entity),
    /// A telepath's regeneration area hides again
    TelepathAreaEnd(Entity),
    /// A dead enemy finished decaying and is removed
    Despawn(Entity),
    /// Retry a spawn that found no free position
    RespawnEnemy,
    /// Put a picked-up coin back on the map
    CoinRespawn,
}

impl TimerKind {
    /// Entity whose despawn cancels this timer
    pub fn owner(&self) -> Option<Entity> {
        match self {
            TimerKind::FreezeEffectEnd(e) | TimerKind::TelepathAreaEnd(e) | TimerKind::Despawn(e) => {
                Some(*e)
            }
            TimerKind::RespawnEnemy | TimerKind::CoinRespawn => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTimer {
    id: TimerId,
    at: u64,
    kind: TimerKind,
}

impl PartialEq for ScheduledTimer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ScheduledTimer {}

impl PartialOrd for ScheduledTimer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTimer {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior (earliest first, then oldest)
        other.at.cmp(&self.at).then_with(|| other.id.cmp(&self.id))
    }
}

#[derive(Debug, Clone)]
pub struct TimerScheduler {
    pending: BinaryHeap<ScheduledTimer>,
    next_id: TimerId,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self {
            pending: BinaryHeap::new(),
            next_id: 1,
        }
    }

    /// Fire `kind` once the clock reaches `at`
    pub fn schedule(&mut self, at: u64, kind: TimerKind) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(ScheduledTimer { id, at, kind });
        id
    }

    /// Pop the earliest timer due at `now`
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerId, TimerKind)> {
        if self.pending.peek()?.at > now {
            return None;
        }
        self.pending.pop().map(|timer| (timer.id, timer.kind))
    }

    pub fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|timer| timer.id != id);
    }

    /// Remove every timer owned by an entity (e.g., on despawn)
    pub fn cancel_for_entity(&mut self, entity: Entity) {
        self.pending.retain(|timer| timer.kind.owner() != Some(entity));
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.pending.iter().any(|timer| timer.id == id)
    }

    pub fn count(&self, kind: TimerKind) -> usize {
        self.pending.iter().filter(|timer| timer.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}
