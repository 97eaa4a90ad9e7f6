//! Game simulation - one frame of time advancement and entity updates.

use hecs::Entity;
use log::{trace, warn};

use crate::components::{Enemy, Position};
use crate::constants::*;
use crate::live::Live;
use crate::spawner;
use crate::systems::{coins, combat, enemy, movement, npc, player, variants};
use crate::time_system::TimerKind;

use super::GameState;

/// Run one frame. Nothing happens while the clock is paused, so neither
/// timers nor path results move on.
pub fn tick(state: &mut GameState, delta_ms: u64) {
    puffin::profile_function!();

    if state.clock.is_paused() {
        return;
    }
    state.clock.advance(delta_ms.min(MAX_TICK_DELTA));

    fire_timers(state);

    {
        puffin::profile_scope!("pathfinding");
        state.navigator.process();
        npc::drain_path_replies(state);
    }

    update_enemies(state);

    if let Err(err) = player::update_player(state) {
        warn!("Player update failed: {}", err);
    }

    movement::integrate(&mut state.world, delta_ms.min(MAX_TICK_DELTA));
    combat::resolve_deaths(state);

    if let Ok(position) = state.world.get::<&Position>(state.player_entity) {
        state.viewport.follow(position.world);
    }
}

/// Run every timer that is due, in due order
fn fire_timers(state: &mut GameState) {
    puffin::profile_function!();

    let now = state.clock.now();
    while let Some((id, kind)) = state.timers.pop_due(now) {
        trace!("timer {} fired: {:?}", id, kind);
        match kind {
            TimerKind::FreezeEffectEnd(entity) => npc::end_freeze_effect(state, entity, id),
            TimerKind::TelepathAreaEnd(entity) => variants::hide_telepath_area(state, entity, id),
            TimerKind::Despawn(entity) => npc::despawn(state, entity),
            TimerKind::RespawnEnemy => {
                spawner::spawn_enemy(state);
            }
            TimerKind::CoinRespawn => coins::respawn_coin(state),
        }
    }
}

fn update_enemies(state: &mut GameState) {
    puffin::profile_function!();

    let enemies: Vec<Entity> = state
        .world
        .query::<(&Enemy, &Live)>()
        .iter()
        .filter(|(_, (_, live))| !live.is_dead())
        .map(|(entity, _)| entity)
        .collect();

    for entity in enemies {
        if let Err(err) = enemy::update_enemy(state, entity) {
            warn!("Enemy {:?} update failed: {}", entity, err);
        }
    }
}
