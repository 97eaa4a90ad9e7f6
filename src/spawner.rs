//! Enemy spawner.
//!
//! Keeps a cached grid of enemy spawn tiles and places new enemies on ones
//! that are free, off screen and away from the living enemies. Enemies it
//! places come back (somewhere else) when they die.

use hecs::{Entity, World};
use log::{debug, error, warn};
use rand::seq::SliceRandom;

use crate::biome::SpawnTarget;
use crate::components::{Enemy, EnemyVariant, Position, RespawnOnDeath};
use crate::config::Difficulty;
use crate::coords::{matrix_distance, MatrixPosition};
use crate::engine::GameState;
use crate::events::GameEvent;
use crate::level::Level;
use crate::live::Live;
use crate::progression::{progression_quadratic, QuadraticProgression};
use crate::spawning::{self, SpriteData};
use crate::time_system::TimerKind;
use crate::viewport::Viewport;

pub struct Spawner {
    positions: Vec<MatrixPosition>,
}

impl Spawner {
    /// Read the enemy spawn tiles of `level`, keeping every `grid_step`-th
    /// row and column
    pub fn new(level: &Level, grid_step: usize) -> Self {
        let positions = level.read_spawn_positions(SpawnTarget::Enemy, grid_step);
        debug!("Spawner cached {} positions", positions.len());
        Self { positions }
    }

    pub fn positions(&self) -> &[MatrixPosition] {
        &self.positions
    }

    /// Cached positions where an enemy may appear right now
    pub fn candidates(
        &self,
        world: &World,
        level: &Level,
        viewport: &dyn Viewport,
        min_space: f32,
    ) -> Vec<MatrixPosition> {
        let enemies: Vec<MatrixPosition> = world
            .query::<(&Enemy, &Position, &Live)>()
            .iter()
            .filter(|(_, (_, _, live))| !live.is_dead())
            .map(|(_, (_, position, _))| position.matrix)
            .collect();

        self.positions
            .iter()
            .copied()
            .filter(|position| level.is_free_point(*position))
            .filter(|position| !viewport.is_visible(Position::at_matrix(*position).world))
            .filter(|position| {
                enemies
                    .iter()
                    .all(|enemy| matrix_distance(*position, *enemy) >= min_space)
            })
            .collect()
    }
}

/// Level of newly spawned enemies after `lived_seconds` of play
pub fn enemy_level(lived_seconds: u64, difficulty: &Difficulty) -> u32 {
    let minutes = (lived_seconds / 60) as u32;
    let level = progression_quadratic(QuadraticProgression {
        default_value: 1.0,
        scale: difficulty.spawner_enemy_level_growth,
        level: minutes,
        retardation_level: Some(difficulty.spawner_enemy_level_growth_retardation_level),
        round_to: Some(1.0),
    });
    level as u32 + 1
}

/// Spawn one enemy at a random candidate position. Without a candidate a
/// retry is scheduled and `None` is returned.
pub fn spawn_enemy(state: &mut GameState) -> Option<Entity> {
    let candidates = state.spawner.candidates(
        &state.world,
        &state.level,
        state.viewport.as_ref(),
        state.config.spawner.min_space_between,
    );

    let Some(position) = candidates.choose(&mut state.rng).copied() else {
        let at = state.clock.now() + state.config.spawner.retry_delay;
        state.timers.schedule(at, TimerKind::RespawnEnemy);
        debug!("No spawn position available, retrying at {}", at);
        return None;
    };
    let variant = *EnemyVariant::SPAWNABLE.choose(&mut state.rng)?;
    let level = enemy_level(state.clock.lived_seconds(), &state.config.difficulty);

    let entity = match spawning::spawn_enemy(
        &mut state.world,
        &state.config.difficulty,
        state.clock.now(),
        variant,
        level,
        SpriteData::at_matrix(position),
    ) {
        Ok(entity) => entity,
        Err(err) => {
            error!("failed to spawn {:?}: {}", variant, err);
            return None;
        }
    };
    if let Err(err) = state.world.insert_one(entity, RespawnOnDeath) {
        warn!("{:?} will not respawn: {}", entity, err);
    }

    state.events.push(GameEvent::EnemySpawned {
        entity,
        variant,
        level,
    });
    Some(entity)
}

/// Fill the level with the configured number of enemies. Returns how many
/// were placed right away.
pub fn spawn_default_enemies(state: &mut GameState) -> usize {
    let count = state.config.difficulty.enemy_count;
    (0..count).filter_map(|_| spawn_enemy(state)).count()
}
