//! ECS components.
//!
//! Entities are plain bundles of these; behavior lives in `systems`.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::coords::{to_matrix_position, to_world_position, MatrixPosition};
use crate::navigator::TaskId;
use crate::tile::TileKind;
use crate::time_system::TimerId;

// =============================================================================
// SPRITES
// =============================================================================

/// Which group an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Enemy,
    Coin,
}

/// Position in both coordinate systems. `world` is authoritative; `matrix`
/// follows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub world: Vec2,
    pub matrix: MatrixPosition,
}

impl Position {
    pub fn at_world(world: Vec2) -> Self {
        Self {
            world,
            matrix: to_matrix_position(world),
        }
    }

    pub fn at_matrix(matrix: MatrixPosition) -> Self {
        Self {
            world: to_world_position(matrix),
            matrix,
        }
    }

    pub fn set_world(&mut self, world: Vec2) {
        self.world = world;
        self.matrix = to_matrix_position(world);
    }
}

/// Current velocity in px/s
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

/// Movement speed in px/s before friction and status effects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speed(pub f32);

/// Facing, one of the eight compass directions in degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Facing(pub u16);

/// Tile kinds this entity bumps into, and whether it collides with
/// non-standable ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub tiles: &'static [TileKind],
    pub ground: bool,
}

impl Collider {
    pub const WALKER: Collider = Collider {
        tiles: &[TileKind::Scenery],
        ground: true,
    };
    pub const PLAYER: Collider = Collider {
        tiles: &[TileKind::Scenery, TileKind::Coin],
        ground: true,
    };
}

// =============================================================================
// NPC
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NpcState {
    /// No valid target
    #[default]
    Idle,
    /// Following a path towards the target
    Pursuing,
    /// Within trigger distance, holding position
    Engaged,
}

/// Path-following state of a non-player character
#[derive(Debug, Clone)]
pub struct Npc {
    pub state: NpcState,
    /// Remaining waypoints in world space, consumed front-first
    pub path: VecDeque<Vec2>,
    /// Tile the current path leads to
    pub path_target: Option<MatrixPosition>,
    /// In-flight search, at most one
    pub path_task: Option<TaskId>,
    /// Isometric distance at which pathing stops
    pub path_find_trigger_distance: f32,
    /// No new search before this time
    pub next_path_find_at: u64,
    /// Reached the target through pathing at least once since the last path
    pub path_passed: bool,
    /// Pursuit needs the trigger latch below
    pub needs_pursuit_trigger: bool,
    /// Aggro latch: set once, never cleared
    pub pursuit_triggered_before: bool,
    pub frozen_until: u64,
    /// Timer that ends the freeze visual
    pub freeze_effect: Option<TimerId>,
}

impl Npc {
    pub fn new(path_find_trigger_distance: f32) -> Self {
        Self {
            state: NpcState::Idle,
            path: VecDeque::new(),
            path_target: None,
            path_task: None,
            path_find_trigger_distance,
            next_path_find_at: 0,
            path_passed: false,
            needs_pursuit_trigger: false,
            pursuit_triggered_before: false,
            frozen_until: 0,
            freeze_effect: None,
        }
    }

    pub fn is_frozen(&self, now: u64) -> bool {
        now < self.frozen_until
    }

    pub fn reset_path(&mut self) {
        self.path.clear();
        self.path_target = None;
    }
}

// =============================================================================
// ENEMY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyVariant {
    Adherent,
    Berserk,
    Boss,
    Demon,
    Explosive,
    Ghost,
    Risper,
    Spike,
    Stranger,
    Tank,
    Telepath,
    Undead,
}

impl EnemyVariant {
    /// Variants the spawner may pick. Adherents only come from strangers.
    pub const SPAWNABLE: [EnemyVariant; 11] = [
        EnemyVariant::Berserk,
        EnemyVariant::Boss,
        EnemyVariant::Demon,
        EnemyVariant::Explosive,
        EnemyVariant::Ghost,
        EnemyVariant::Risper,
        EnemyVariant::Spike,
        EnemyVariant::Stranger,
        EnemyVariant::Tank,
        EnemyVariant::Telepath,
        EnemyVariant::Undead,
    ];
}

/// Per-variant mutable state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariantState {
    None,
    /// Next self-heal time
    Berserk { heal_at: u64 },
    /// Timer hiding the regeneration area, while it is shown
    Telepath { area: Option<TimerId> },
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub variant: EnemyVariant,
    pub level: u32,
    pub damage: f32,
    /// Currently touching the player
    pub overlap_target: bool,
    pub state: VariantState,
}

/// Spawn a replacement when this enemy dies
#[derive(Debug, Clone, Copy)]
pub struct RespawnOnDeath;

/// Dead and waiting for removal
#[derive(Debug, Clone, Copy)]
pub struct Decaying;

// =============================================================================
// PLAYER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSkill {
    MaxHealth,
    Speed,
    Stamina,
    AttackDamage,
    AttackDistance,
}

impl PlayerSkill {
    pub const ALL: [PlayerSkill; 5] = [
        PlayerSkill::MaxHealth,
        PlayerSkill::Speed,
        PlayerSkill::Stamina,
        PlayerSkill::AttackDamage,
        PlayerSkill::AttackDistance,
    ];

    fn index(self) -> usize {
        match self {
            PlayerSkill::MaxHealth => 0,
            PlayerSkill::Speed => 1,
            PlayerSkill::Stamina => 2,
            PlayerSkill::AttackDamage => 3,
            PlayerSkill::AttackDistance => 4,
        }
    }
}

/// Upgrade level per skill, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillLevels([u32; 5]);

impl SkillLevels {
    pub fn get(&self, skill: PlayerSkill) -> u32 {
        self.0[skill.index()]
    }

    pub fn set(&mut self, skill: PlayerSkill, level: u32) {
        self.0[skill.index()] = level;
    }
}

impl Default for SkillLevels {
    fn default() -> Self {
        Self([1; 5])
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub coins: u32,
    pub kills: u32,
    pub skills: SkillLevels,
    pub stamina: f32,
    pub stamina_max: f32,
    /// Last stamina drain/regeneration
    pub stamina_at: u64,
    /// Last health regeneration
    pub heal_at: u64,
    /// Requested movement direction in screen degrees, `None` when idle
    pub movement_angle: Option<f32>,
    /// Tile reported to the move hook last
    pub last_tile: MatrixPosition,
}

impl Player {
    pub fn new(coins: u32, stamina_max: f32, tile: MatrixPosition) -> Self {
        Self {
            coins,
            kills: 0,
            skills: SkillLevels::default(),
            stamina: stamina_max,
            stamina_max,
            stamina_at: 0,
            heal_at: 0,
            movement_angle: None,
            last_tile: tile,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.movement_angle.is_some()
    }
}

// =============================================================================
// PICKUPS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coin {
    pub amount: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_keeps_matrix_in_sync() {
        let mut pos = Position::at_matrix(MatrixPosition::new(4, 6));
        assert_eq!(pos.matrix, MatrixPosition::new(4, 6));
        pos.set_world(to_world_position(MatrixPosition::new(7, 2)));
        assert_eq!(pos.matrix, MatrixPosition::new(7, 2));
    }

    #[test]
    fn test_skill_levels_start_at_one() {
        let levels = SkillLevels::default();
        for skill in PlayerSkill::ALL {
            assert_eq!(levels.get(skill), 1);
        }
    }

    #[test]
    fn test_npc_freeze_window() {
        let mut npc = Npc::new(20.0);
        npc.frozen_until = 500;
        assert!(npc.is_frozen(499));
        assert!(!npc.is_frozen(500));
    }

    #[test]
    fn test_spawnable_excludes_adherent() {
        assert!(!EnemyVariant::SPAWNABLE.contains(&EnemyVariant::Adherent));
    }
}
