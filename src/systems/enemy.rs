//! Enemy behavior on top of the NPC layer: pursuit trigger, melee contact
//! and the direct chase once the path has brought the enemy close.

use glam::Vec2;
use hecs::Entity;

use crate::components::{Enemy, Npc, Position, Velocity};
use crate::constants::*;
use crate::coords::{isometric_distance, matrix_distance};
use crate::engine::GameState;
use crate::error::UpdateError;
use crate::live::Live;
use crate::systems::{combat, npc, variants};

pub fn update_enemy(state: &mut GameState, entity: Entity) -> Result<(), UpdateError> {
    if state.world.get::<&Live>(entity)?.is_dead() {
        return Ok(());
    }

    let player = state.player_entity;
    let player_position = *state.world.get::<&Position>(player)?;
    let player_alive = !state.world.get::<&Live>(player)?.is_dead();
    let position = *state.world.get::<&Position>(entity)?;

    variants::update_variant(state, entity)?;

    if player_alive
        && isometric_distance(position.world, player_position.world) <= ENEMY_CONTACT_DISTANCE
    {
        attack(state, entity, player)?;
        state.world.get::<&mut Enemy>(entity)?.overlap_target = true;
    }

    let can_pursue = can_pursue(state, entity, player_position, player_alive)?;
    npc::update_npc(state, entity, player_position.into(), can_pursue)?;

    let overlap = state.world.get::<&Enemy>(entity)?.overlap_target;
    let path_passed = state.world.get::<&Npc>(entity)?.path_passed;
    if overlap {
        state.world.get::<&mut Velocity>(entity)?.0 = Vec2::ZERO;
    } else if path_passed {
        npc::move_to(state, entity, player_position.world)?;
    }
    state.world.get::<&mut Enemy>(entity)?.overlap_target = false;

    Ok(())
}

/// Whether the enemy chases the player. The first time the player comes
/// within the trigger distance the enemy latches on and keeps chasing.
fn can_pursue(
    state: &mut GameState,
    entity: Entity,
    player_position: Position,
    player_alive: bool,
) -> Result<bool, UpdateError> {
    let position = state.world.get::<&Position>(entity)?.matrix;
    let mut npc = state.world.get::<&mut Npc>(entity)?;

    if !player_alive {
        return Ok(false);
    }
    if !npc.needs_pursuit_trigger {
        return Ok(true);
    }
    if !npc.pursuit_triggered_before
        && matrix_distance(position, player_position.matrix) <= ENEMY_PURSUIT_TRIGGER_DISTANCE
    {
        npc.pursuit_triggered_before = true;
    }
    Ok(npc.pursuit_triggered_before)
}

/// Melee hit. The enemy freezes itself for the cooldown, so it cannot hit
/// again until the freeze runs out.
pub fn attack(state: &mut GameState, entity: Entity, target: Entity) -> Result<(), UpdateError> {
    let now = state.clock.now();
    if state.world.get::<&Npc>(entity)?.is_frozen(now) {
        return Ok(());
    }
    if state.world.get::<&Live>(target)?.is_dead() {
        return Ok(());
    }

    let damage = state.world.get::<&Enemy>(entity)?.damage;
    npc::freeze(state, entity, ENEMY_ATTACK_COOLDOWN, false)?;
    combat::apply_damage(state, target, damage);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{EnemyVariant, NpcState};
    use crate::coords::{to_world_position, MatrixPosition};
    use crate::engine::game_state::tests::{open_state, spawn_enemy_at};

    fn player_health(state: &GameState) -> f32 {
        state.world.get::<&Live>(state.player_entity).unwrap().health()
    }

    #[test]
    fn test_far_enemy_does_not_pursue() {
        let mut state = open_state(40, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(30, 30));
        update_enemy(&mut state, enemy).unwrap();

        let npc = state.world.get::<&Npc>(enemy).unwrap();
        assert_eq!(npc.state, NpcState::Idle);
        assert!(!npc.pursuit_triggered_before);
    }

    #[test]
    fn test_pursuit_latch_survives_distance() {
        let mut state = open_state(40, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(10, 10));
        update_enemy(&mut state, enemy).unwrap();
        assert!(state.world.get::<&Npc>(enemy).unwrap().pursuit_triggered_before);

        // teleport the player far away
        state
            .world
            .get::<&mut Position>(state.player_entity)
            .unwrap()
            .set_world(to_world_position(MatrixPosition::new(38, 38)));
        state.clock.advance(NPC_PATH_FIND_RATE);
        update_enemy(&mut state, enemy).unwrap();

        assert_eq!(
            state.world.get::<&Npc>(enemy).unwrap().state,
            NpcState::Pursuing
        );
    }

    #[test]
    fn test_contact_hits_once_per_cooldown() {
        let mut state = open_state(16, MatrixPosition::new(5, 5));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(5, 5));
        let damage = state.world.get::<&Enemy>(enemy).unwrap().damage;
        let full = player_health(&state);

        update_enemy(&mut state, enemy).unwrap();
        assert_eq!(player_health(&state), full - damage);
        assert_eq!(state.world.get::<&Velocity>(enemy).unwrap().0, Vec2::ZERO);

        state.clock.advance(ENEMY_ATTACK_COOLDOWN - 1);
        update_enemy(&mut state, enemy).unwrap();
        assert_eq!(player_health(&state), full - damage);

        state.clock.advance(1);
        update_enemy(&mut state, enemy).unwrap();
        assert!((player_health(&state) - (full - 2.0 * damage)).abs() < 1e-3);
    }

    #[test]
    fn test_engaged_enemy_chases_directly() {
        let mut state = open_state(16, MatrixPosition::new(5, 5));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(6, 5));
        update_enemy(&mut state, enemy).unwrap();

        let npc = state.world.get::<&Npc>(enemy).unwrap();
        assert_eq!(npc.state, NpcState::Engaged);
        assert!(npc.path_passed);
        let velocity = state.world.get::<&Velocity>(enemy).unwrap().0;
        // (6, 5) sits below and to the right of (5, 5) on screen
        assert!(velocity.x < 0.0 && velocity.y < 0.0);
    }

    #[test]
    fn test_dead_player_stops_pursuit() {
        let mut state = open_state(16, MatrixPosition::new(5, 5));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(8, 8));
        state
            .world
            .get::<&mut Live>(state.player_entity)
            .unwrap()
            .damage(f32::MAX);

        update_enemy(&mut state, enemy).unwrap();
        assert_eq!(state.world.get::<&Npc>(enemy).unwrap().state, NpcState::Idle);
        assert_eq!(state.navigator.pending_count(), 0);
    }
}
