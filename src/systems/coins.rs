//! Coin pickups: placement on free tiles, pickup and delayed respawn.

use hecs::Entity;
use log::{debug, warn};
use rand::seq::SliceRandom;

use crate::biome::SpawnTarget;
use crate::components::{Coin, Position};
use crate::constants::*;
use crate::engine::GameState;
use crate::events::GameEvent;
use crate::level::OBJECT_LAYER;
use crate::spawning::spawn_coin_entity;
use crate::systems::player;
use crate::tile::{Tile, TilePosition};
use crate::time_system::TimerKind;

/// Place one coin on a random free coin tile away from the player
pub fn spawn_coin(state: &mut GameState) -> Option<Entity> {
    let player_tile = state
        .world
        .get::<&Position>(state.player_entity)
        .ok()
        .map(|p| p.matrix);
    let candidates: Vec<_> = state
        .level
        .read_spawn_positions(SpawnTarget::Coin, 1)
        .into_iter()
        .filter(|p| Some(*p) != player_tile && state.level.is_free_point(*p))
        .collect();

    let position = *candidates.choose(&mut state.rng)?;
    let amount = state.config.difficulty.coins_size;
    let entity = spawn_coin_entity(&mut state.world, amount, position);

    let at = TilePosition::new(position.x, position.y, OBJECT_LAYER);
    if let Err(err) = state.level.put_tile(Tile::coin(entity), at) {
        warn!("Failed to place coin at {:?}: {}", position, err);
        if let Err(err) = state.world.despawn(entity) {
            debug!("Unplaced coin {:?} already gone: {}", entity, err);
        }
        return None;
    }
    Some(entity)
}

/// Returns the number of coins actually placed
pub fn spawn_coins(state: &mut GameState, count: usize) -> usize {
    (0..count).filter_map(|_| spawn_coin(state)).count()
}

/// The player walked into a coin tile
pub fn pickup(state: &mut GameState, tile: Tile) {
    let Some(entity) = tile.entity else {
        return;
    };
    let Ok((coin, position)) = state
        .world
        .query_one_mut::<(&Coin, &Position)>(entity)
        .map(|(coin, position)| (*coin, *position))
    else {
        return;
    };

    let matrix = position.matrix;
    state
        .level
        .remove_tile(TilePosition::new(matrix.x, matrix.y, OBJECT_LAYER));
    if let Err(err) = state.world.despawn(entity) {
        debug!("Picked up coin {:?} already gone: {}", entity, err);
    }

    player::give_coins(state, coin.amount);
    state.events.push(GameEvent::CoinPickedUp {
        amount: coin.amount,
        position: position.world,
    });
    debug!("Picked up {} coins at {:?}", coin.amount, matrix);

    let at = state.clock.now() + COINS_RESPAWN_DELAY;
    state.timers.schedule(at, TimerKind::CoinRespawn);
}

pub fn respawn_coin(state: &mut GameState) {
    if spawn_coin(state).is_none() {
        debug!("No free tile for a coin");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Player;
    use crate::coords::MatrixPosition;
    use crate::engine::game_state::tests::open_state;

    fn coin_count(state: &GameState) -> usize {
        state.world.query::<&Coin>().iter().count()
    }

    #[test]
    fn test_coins_land_on_free_tiles() {
        let mut state = open_state(6, MatrixPosition::new(2, 2));
        assert_eq!(spawn_coins(&mut state, 5), 5);
        assert_eq!(coin_count(&state), 5);

        for (_, (_, position)) in state.world.query::<(&Coin, &Position)>().iter() {
            let at = TilePosition::new(position.matrix.x, position.matrix.y, OBJECT_LAYER);
            assert!(state.level.get_tile(at).is_some());
            assert_ne!(position.matrix, MatrixPosition::new(2, 2));
        }
    }

    #[test]
    fn test_no_free_tile_spawns_nothing() {
        let mut state = open_state(2, MatrixPosition::new(0, 0));
        assert_eq!(spawn_coins(&mut state, 5), 3);
        assert!(spawn_coin(&mut state).is_none());
    }

    #[test]
    fn test_pickup_pays_and_schedules_respawn() {
        let mut state = open_state(6, MatrixPosition::new(2, 2));
        let coin = spawn_coin(&mut state).unwrap();
        let matrix = state.world.get::<&Position>(coin).unwrap().matrix;
        let at = TilePosition::new(matrix.x, matrix.y, OBJECT_LAYER);
        let tile = *state.level.get_tile(at).unwrap();

        pickup(&mut state, tile);

        assert!(!state.world.contains(coin));
        assert!(state.level.get_tile(at).is_none());
        let coins = state.world.get::<&Player>(state.player_entity).unwrap().coins;
        assert_eq!(coins, COINS_SIZE);
        assert_eq!(state.timers.count(TimerKind::CoinRespawn), 1);
    }
}
