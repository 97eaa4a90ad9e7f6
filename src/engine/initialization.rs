//! Session initialization - generates the level and spawns the initial
//! entities.

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::biome::SpawnTarget;
use crate::components::{Player, Position};
use crate::config::GameConfig;
use crate::coords::MatrixPosition;
use crate::error::SessionError;
use crate::hooks::{ProgressStore, TransactionHooks};
use crate::level::Level;
use crate::mapgen;
use crate::spawner;
use crate::systems::coins;
use crate::viewport::Viewport;

use super::GameState;

/// Build the level for `config`: generated biomes plus scattered scenery
pub fn build_level(config: &GameConfig, rng: &mut StdRng) -> Level {
    puffin::profile_function!();

    let map = mapgen::generate(config.map_size, config.seed as u32);
    let mut level = Level::new(map);
    let scenery = level.scatter_scenery(rng, config.scenery_density);
    info!(
        "Generated {}x{} level (seed {}, {} scenery tiles)",
        level.width(),
        level.height(),
        config.seed,
        scenery
    );
    level
}

/// Pick a free player spawn tile
fn choose_player_spawn(level: &Level, rng: &mut StdRng) -> Option<MatrixPosition> {
    let candidates: Vec<_> = level
        .read_spawn_positions(SpawnTarget::Player, 1)
        .into_iter()
        .filter(|p| level.is_free_point(*p))
        .collect();
    candidates.choose(rng).copied()
}

/// Start a session: level, player with the stored coins, coins and the
/// default enemies
pub fn new_session(
    config: GameConfig,
    viewport: Box<dyn Viewport>,
    hooks: Box<dyn TransactionHooks>,
    store: Box<dyn ProgressStore>,
) -> Result<GameState, SessionError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let level = build_level(&config, &mut rng);
    let player_at = choose_player_spawn(&level, &mut rng).ok_or(SessionError::NoPlayerSpawn)?;

    let mut state = GameState::from_level(level, player_at, config)?
        .with_viewport(viewport)
        .with_hooks(hooks)
        .with_store(store);
    state.rng = rng;

    let stored = state.store.load_coins();
    if let Ok(mut player) = state.world.get::<&mut Player>(state.player_entity) {
        player.coins = stored;
    }
    if let Ok(position) = state.world.get::<&Position>(state.player_entity) {
        state.viewport.follow(position.world);
    }

    let coin_count = state.config.difficulty.coins_count;
    let placed_coins = coins::spawn_coins(&mut state, coin_count);
    let placed_enemies = spawner::spawn_default_enemies(&mut state);

    info!(
        "Session started at {:?} with {} coins: {} coin pickups, {} enemies",
        player_at, stored, placed_coins, placed_enemies
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Coin, Enemy};
    use crate::hooks::{MemoryStore, NoopHooks};
    use crate::live::Live;
    use glam::Vec2;

    fn small_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.map_size = 64;
        config.seed = 7;
        config.difficulty.enemy_count = 4;
        config.difficulty.coins_count = 5;
        config
    }

    #[test]
    fn test_session_restores_coins_and_populates_level() {
        let config = small_config();
        let state = GameState::new(
            config.clone(),
            Box::new(|_: Vec2| false),
            Box::new(NoopHooks),
            Box::new(MemoryStore::with_coins(42)),
        )
        .unwrap();

        let player = state.world.get::<&Player>(state.player_entity).unwrap();
        assert_eq!(player.coins, 42);
        assert!(!state.world.get::<&Live>(state.player_entity).unwrap().is_dead());
        assert_eq!(
            state.world.query::<&Coin>().iter().count(),
            config.difficulty.coins_count
        );
        assert_eq!(
            state.world.query::<&Enemy>().iter().count(),
            config.difficulty.enemy_count
        );
    }

    #[test]
    fn test_same_seed_same_level() {
        let config = small_config();
        let a = build_level(&config, &mut StdRng::seed_from_u64(config.seed));
        let b = build_level(&config, &mut StdRng::seed_from_u64(config.seed));
        for y in 0..config.map_size as i32 {
            for x in 0..config.map_size as i32 {
                let p = MatrixPosition::new(x, y);
                assert_eq!(
                    a.get_biome_at(p).map(|b| b.biome_type),
                    b.get_biome_at(p).map(|b| b.biome_type)
                );
                assert_eq!(a.is_blocked(p), b.is_blocked(p));
            }
        }
    }
}
