//! Game event system for decoupled communication between systems.
//!
//! The simulation pushes events while it runs; the presentation layer
//! (UI, audio, effects) drains them once per tick and reacts without the
//! core knowing it exists.

use glam::Vec2;
use hecs::Entity;

use crate::components::{EnemyVariant, PlayerSkill};
use crate::coords::MatrixPosition;
use crate::hooks::GameStat;

/// Game events that systems emit and the presentation layer consumes
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The player's coin balance changed
    CoinsChanged { amount: u32 },
    /// A skill reached a new level
    SkillUpgraded { skill: PlayerSkill, level: u32 },
    /// Damage was applied (for floating labels)
    Damaged {
        entity: Entity,
        amount: f32,
        position: Vec2,
    },
    /// Health was restored; `with_effect` asks for a visual
    Healed {
        entity: Entity,
        amount: f32,
        with_effect: bool,
    },
    /// A new enemy entered the world
    EnemySpawned {
        entity: Entity,
        variant: EnemyVariant,
        level: u32,
    },
    /// An enemy died; `roar` selects the boss death sound
    EnemyDied {
        entity: Entity,
        variant: EnemyVariant,
        position: Vec2,
        roar: bool,
    },
    /// The player died
    PlayerDied,
    /// The session ended; the stat is what the store should remember
    GameFinished { stat: GameStat },
    /// User-facing message (e.g., "Not enough coins")
    Notice { message: String },
    /// An NPC started glowing frozen
    FreezeStarted { entity: Entity },
    FreezeEnded { entity: Entity },
    /// An explosive enemy blew up
    Explosion { position: Vec2, radius: f32 },
    /// A telepath's regeneration area became visible or hidden
    TelepathArea { entity: Entity, visible: bool },
    /// The player swung; `distance` is the reach of the swing
    PlayerAttacked { distance: f32 },
    /// The player stepped onto a new tile
    PlayerMovedTile { position: MatrixPosition },
    CoinPickedUp { amount: u32, position: Vec2 },
}

/// Simple event queue - events are pushed during update, drained at end of tick
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Pending events, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
