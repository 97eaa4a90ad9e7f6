//! Enemy variant abilities.
//!
//! Each variant hooks into at most three points: the per-tick update, being
//! damaged, and dying. Variants without an ability only differ by their stat
//! multipliers (see `spawning::variants`).

use glam::Vec2;
use hecs::Entity;
use log::{debug, error};

use crate::components::{Enemy, EnemyVariant, EntityKind, Position, VariantState};
use crate::constants::*;
use crate::coords::isometric_distance;
use crate::engine::GameState;
use crate::error::UpdateError;
use crate::events::GameEvent;
use crate::live::Live;
use crate::spawning::{self, SpriteData};
use crate::systems::combat;
use crate::time_system::{TimerId, TimerKind};

/// Per-tick variant behavior. A berserk only starts its heal countdown
/// once it is hurt, and stops healing when the player is gone.
pub fn update_variant(state: &mut GameState, entity: Entity) -> Result<(), UpdateError> {
    let now = state.clock.now();
    let player_dead = state
        .world
        .get::<&Live>(state.player_entity)
        .map_or(true, |live| live.is_dead());

    let amount = {
        let live = state.world.get::<&Live>(entity)?;
        let mut enemy = state.world.get::<&mut Enemy>(entity)?;
        let VariantState::Berserk { heal_at } = &mut enemy.state else {
            return Ok(());
        };
        if player_dead || live.is_dead() || live.is_max_health() || now < *heal_at {
            return Ok(());
        }
        *heal_at = now + ENEMY_HEAL_DELAY;
        (live.max_health() * ENEMY_HEAL_MULTIPLIER).ceil()
    };
    combat::apply_heal(state, entity, amount, true);

    Ok(())
}

/// Telepath ability: share the damage taken as healing among hurt
/// neighbors, and show the regeneration area while doing so
pub fn on_damage(state: &mut GameState, entity: Entity, amount: f32) {
    let Ok(center) = state.world.get::<&Position>(entity).map(|p| p.world) else {
        return;
    };

    let targets: Vec<Entity> = state
        .world
        .query::<(&Enemy, &Position, &Live)>()
        .iter()
        .filter(|(other, (enemy, position, live))| {
            *other != entity
                && enemy.variant != EnemyVariant::Telepath
                && !live.is_dead()
                && !live.is_max_health()
                && isometric_distance(center, position.world) <= ENEMY_REGENERATION_RADIUS
        })
        .map(|(other, _)| other)
        .collect();

    if targets.is_empty() {
        return;
    }

    show_telepath_area(state, entity);

    let share = (amount / targets.len() as f32).floor();
    if share <= 0.0 {
        return;
    }
    for target in targets {
        combat::apply_heal(state, target, share, true);
    }
}

fn show_telepath_area(state: &mut GameState, entity: Entity) {
    let until = state.clock.now() + ENEMY_REGENERATION_EFFECT_DURATION;
    let Ok(mut enemy) = state.world.get::<&mut Enemy>(entity) else {
        return;
    };
    let VariantState::Telepath { area } = &mut enemy.state else {
        return;
    };

    match area.take() {
        Some(timer) => state.timers.cancel(timer),
        None => state.events.push(GameEvent::TelepathArea {
            entity,
            visible: true,
        }),
    }
    *area = Some(state.timers.schedule(until, TimerKind::TelepathAreaEnd(entity)));
}

/// Timer callback: the regeneration area fades out
pub fn hide_telepath_area(state: &mut GameState, entity: Entity, timer: TimerId) {
    let Ok(mut enemy) = state.world.get::<&mut Enemy>(entity) else {
        return;
    };
    if let VariantState::Telepath { area } = &mut enemy.state {
        if *area == Some(timer) {
            *area = None;
            state.events.push(GameEvent::TelepathArea {
                entity,
                visible: false,
            });
        }
    }
}

/// Death abilities. Runs after the kill has been rewarded.
pub fn on_dead(state: &mut GameState, entity: Entity, enemy: &Enemy, position: Vec2) {
    match enemy.variant {
        EnemyVariant::Explosive => explode(state, entity, position, enemy.damage),
        EnemyVariant::Stranger => spawn_adherents(state, position, enemy.level),
        EnemyVariant::Telepath => {
            if let VariantState::Telepath { area: Some(timer) } = enemy.state {
                hide_telepath_area(state, entity, timer);
            }
        }
        _ => {}
    }
}

/// Blast damage at `distance` from the center: half damage at the edge,
/// rising linearly to full damage at the center. Nothing beyond `radius`.
pub fn explosion_damage(damage: f32, distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 || distance > radius {
        return 0.0;
    }
    (damage * (0.5 + 0.5 * (1.0 - distance / radius))).min(damage)
}

fn explode(state: &mut GameState, source: Entity, center: Vec2, damage: f32) {
    let radius = ENEMY_EXPLOSION_RADIUS;
    state.events.push(GameEvent::Explosion {
        position: center,
        radius,
    });

    let hits: Vec<(Entity, f32)> = state
        .world
        .query::<(&EntityKind, &Position, &Live)>()
        .iter()
        .filter(|(other, (kind, _, live))| {
            *other != source && **kind != EntityKind::Coin && !live.is_dead()
        })
        .filter_map(|(other, (_, position, _))| {
            let distance = isometric_distance(center, position.world);
            (distance <= radius).then(|| (other, explosion_damage(damage, distance, radius)))
        })
        .collect();

    debug!("explosion at {:?} hits {} targets", center, hits.len());
    for (target, amount) in hits {
        combat::apply_damage(state, target, amount);
    }
}

fn spawn_adherents(state: &mut GameState, center: Vec2, level: u32) {
    let now = state.clock.now();
    for (dx, dy) in STRANGER_ADHERENT_OFFSETS {
        let data = SpriteData::at_world(center + Vec2::new(dx, dy));
        match spawning::spawn_enemy(
            &mut state.world,
            &state.config.difficulty,
            now,
            EnemyVariant::Adherent,
            level,
            data,
        ) {
            Ok(adherent) => state.events.push(GameEvent::EnemySpawned {
                entity: adherent,
                variant: EnemyVariant::Adherent,
                level,
            }),
            Err(err) => error!("failed to spawn adherent: {}", err),
        }
    }
}
