//! Damage, healing and death handling.
//!
//! All health changes of sprites go through `apply_damage` and
//! `apply_heal`, so the events and the variant hooks fire in one place.
//! Deaths are queued and resolved once per tick by `resolve_deaths`.

use glam::Vec2;
use hecs::Entity;
use log::{debug, info};

use crate::components::{Decaying, Enemy, EnemyVariant, Player, Position, RespawnOnDeath, Velocity};
use crate::constants::*;
use crate::engine::GameState;
use crate::events::GameEvent;
use crate::hooks::{GameStat, ProgressStore};
use crate::live::{DamageOutcome, Live};
use crate::spawner;
use crate::systems::{npc, player, variants};
use crate::time_system::TimerKind;

/// Damage an entity. Returns what the hit actually did; dead or unknown
/// entities take nothing.
pub fn apply_damage(state: &mut GameState, entity: Entity, amount: f32) -> DamageOutcome {
    let outcome = match state.world.get::<&mut Live>(entity) {
        Ok(mut live) => live.damage(amount),
        Err(_) => return DamageOutcome::default(),
    };
    if outcome.applied <= 0.0 && !outcome.died {
        return outcome;
    }

    let position = state
        .world
        .get::<&Position>(entity)
        .map_or(Vec2::ZERO, |p| p.world);
    state.events.push(GameEvent::Damaged {
        entity,
        amount: outcome.applied,
        position,
    });

    let telepath = state
        .world
        .get::<&Enemy>(entity)
        .is_ok_and(|enemy| enemy.variant == EnemyVariant::Telepath);
    if telepath && outcome.applied > 0.0 {
        variants::on_damage(state, entity, outcome.applied);
    }

    if outcome.died {
        state.pending_deaths.push(entity);
    }
    outcome
}

/// Heal an entity. Returns the amount restored.
pub fn apply_heal(state: &mut GameState, entity: Entity, amount: f32, with_effect: bool) -> Option<f32> {
    let healed = state.world.get::<&mut Live>(entity).ok()?.heal(amount)?;
    state.events.push(GameEvent::Healed {
        entity,
        amount: healed,
        with_effect,
    });
    Some(healed)
}

/// Settle every death queued this tick, including deaths caused while
/// settling (explosions)
pub fn resolve_deaths(state: &mut GameState) {
    puffin::profile_function!();

    while !state.pending_deaths.is_empty() {
        let deaths = std::mem::take(&mut state.pending_deaths);
        for entity in deaths {
            if entity == state.player_entity {
                on_player_dead(state);
            } else {
                on_enemy_dead(state, entity);
            }
        }
    }
}

fn on_enemy_dead(state: &mut GameState, entity: Entity) {
    let Ok(enemy) = state.world.get::<&Enemy>(entity).map(|e| Enemy::clone(&e)) else {
        return;
    };
    let position = state
        .world
        .get::<&Position>(entity)
        .map_or(Vec2::ZERO, |p| p.world);

    player::give_coins(state, enemy.level);
    player::increment_kills(state);

    state.events.push(GameEvent::EnemyDied {
        entity,
        variant: enemy.variant,
        position,
        roar: enemy.variant == EnemyVariant::Boss,
    });
    debug!("{:?} {:?} (level {}) died", enemy.variant, entity, enemy.level);

    variants::on_dead(state, entity, &enemy, position);

    // stop and decay
    if let Err(err) = npc::reset_path(state, entity) {
        debug!("{:?} had no path state: {}", entity, err);
    }
    if let Ok(mut velocity) = state.world.get::<&mut Velocity>(entity) {
        velocity.0 = Vec2::ZERO;
    }
    let respawn = state.world.get::<&RespawnOnDeath>(entity).is_ok();
    if state.world.insert_one(entity, Decaying).is_err() {
        return;
    }
    state.timers.cancel_for_entity(entity);
    let at = state.clock.now() + DEATH_DECAY_DURATION;
    state.timers.schedule(at, TimerKind::Despawn(entity));

    if respawn {
        spawner::spawn_enemy(state);
    }
}

fn on_player_dead(state: &mut GameState) {
    let player_entity = state.player_entity;
    if let Ok(mut velocity) = state.world.get::<&mut Velocity>(player_entity) {
        velocity.0 = Vec2::ZERO;
    }

    let stat = match state.world.get::<&mut Player>(player_entity) {
        Ok(mut player) => {
            player.movement_angle = None;
            GameStat {
                coins: player.coins,
                kills: player.kills,
                lived_minutes: (state.clock.lived_seconds() / 60) as u32,
            }
        }
        Err(_) => GameStat::default(),
    };

    state.events.push(GameEvent::PlayerDied);
    state.store.record_stat(stat);
    state.events.push(GameEvent::GameFinished { stat });
    info!(
        "game over after {} s: {} coins, {} kills",
        state.clock.lived_seconds(),
        stat.coins,
        stat.kills
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::MatrixPosition;
    use crate::engine::game_state::tests::{open_state, spawn_enemy_at};

    #[test]
    fn test_damage_emits_event_and_queues_death() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(8, 8));

        let outcome = apply_damage(&mut state, enemy, 5.0);
        assert_eq!(outcome.applied, 5.0);
        assert!(state.pending_deaths.is_empty());

        let outcome = apply_damage(&mut state, enemy, f32::MAX);
        assert!(outcome.died);
        assert_eq!(state.pending_deaths, vec![enemy]);

        // already dead: nothing more happens
        let outcome = apply_damage(&mut state, enemy, 5.0);
        assert_eq!(outcome, DamageOutcome::default());
        assert_eq!(state.pending_deaths.len(), 1);
    }

    #[test]
    fn test_enemy_death_rewards_and_decays() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Boss, 3, MatrixPosition::new(8, 8));
        let coins_before = state.world.get::<&Player>(state.player_entity).unwrap().coins;

        apply_damage(&mut state, enemy, f32::MAX);
        resolve_deaths(&mut state);

        let player = state.world.get::<&Player>(state.player_entity).unwrap();
        assert_eq!(player.coins, coins_before + 3);
        assert_eq!(player.kills, 1);
        drop(player);

        assert!(state.world.get::<&Decaying>(enemy).is_ok());
        assert_eq!(state.timers.count(TimerKind::Despawn(enemy)), 1);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::EnemyDied { roar: true, variant: EnemyVariant::Boss, .. }
        )));
    }

    #[test]
    fn test_player_death_records_stat() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        state.clock.advance(125_000);
        state.world.get::<&mut Player>(state.player_entity).unwrap().kills = 4;

        let player = state.player_entity;
        apply_damage(&mut state, player, f32::MAX);
        resolve_deaths(&mut state);

        let expected = GameStat {
            coins: 0,
            kills: 4,
            lived_minutes: 2,
        };
        assert_eq!(state.store.best_stat(), Some(expected));
        assert!(state.events.iter().any(|e| *e == GameEvent::PlayerDied));
        assert!(state
            .events
            .iter()
            .any(|e| *e == GameEvent::GameFinished { stat: expected }));
    }

    #[test]
    fn test_heal_reports_restored_amount() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        let player = state.player_entity;
        assert_eq!(apply_heal(&mut state, player, 10.0, false), None);

        apply_damage(&mut state, player, 4.0);
        assert_eq!(apply_heal(&mut state, player, 10.0, true), Some(4.0));
        assert!(state.events.iter().any(|e| *e
            == GameEvent::Healed {
                entity: player,
                amount: 4.0,
                with_effect: true
            }));
    }
}
