//! Player update, melee sweep and the coin/skill economy.

use glam::Vec2;
use log::debug;

use crate::components::{Collider, Enemy, Facing, Player, PlayerSkill, Position, Speed, Velocity};
use crate::config::Difficulty;
use crate::constants::*;
use crate::coords::{direction_8, isometric_distance, velocity_from_angle};
use crate::engine::GameState;
use crate::error::{ActionError, UpdateError};
use crate::events::GameEvent;
use crate::hooks::ProgressStore;
use crate::live::Live;
use crate::progression::{
    progression_linear, progression_quadratic, LinearProgression, QuadraticProgression,
};
use crate::systems::movement::{handle_collide, Collision};
use crate::systems::{coins, combat};
use crate::tile::TileKind;

// =============================================================================
// FORMULAS
// =============================================================================

/// Melee damage at an attack-damage skill level
pub fn attack_damage(difficulty: &Difficulty, level: u32) -> f32 {
    progression_quadratic(QuadraticProgression {
        default_value: difficulty.player_attack_damage,
        scale: difficulty.player_attack_damage_growth,
        level,
        ..Default::default()
    })
}

/// Melee reach (isometric px) at an attack-distance skill level
pub fn attack_distance(difficulty: &Difficulty, level: u32) -> f32 {
    progression_quadratic(QuadraticProgression {
        default_value: difficulty.player_attack_distance,
        scale: difficulty.player_attack_distance_growth,
        level,
        ..Default::default()
    })
}

/// Coins needed to raise `skill` from `level` to the next level
pub fn upgrade_cost(difficulty: &Difficulty, skill: PlayerSkill, level: u32) -> u32 {
    let base = match skill {
        PlayerSkill::MaxHealth => difficulty.player_health_coins_to_upgrade,
        PlayerSkill::Speed => difficulty.player_speed_coins_to_upgrade,
        PlayerSkill::Stamina => difficulty.player_stamina_coins_to_upgrade,
        PlayerSkill::AttackDamage => difficulty.player_attack_damage_coins_to_upgrade,
        PlayerSkill::AttackDistance => difficulty.player_attack_distance_coins_to_upgrade,
    };
    progression_quadratic(QuadraticProgression {
        default_value: base,
        scale: difficulty.player_coins_to_upgrade_growth,
        level,
        round_to: Some(10.0),
        ..Default::default()
    }) as u32
}

/// Stat value a skill grants at `level`. Attack skills are read straight
/// from the level by the attack formulas, so their value is the level.
pub fn skill_value(difficulty: &Difficulty, skill: PlayerSkill, level: u32) -> f32 {
    match skill {
        PlayerSkill::MaxHealth => progression_quadratic(QuadraticProgression {
            default_value: difficulty.player_health,
            scale: difficulty.player_health_growth,
            level,
            round_to: Some(10.0),
            ..Default::default()
        }),
        PlayerSkill::Speed => progression_linear(LinearProgression {
            default_value: difficulty.player_speed,
            scale: difficulty.player_speed_growth,
            level,
            round_to: Some(1.0),
            ..Default::default()
        }),
        PlayerSkill::Stamina => progression_quadratic(QuadraticProgression {
            default_value: difficulty.player_stamina,
            scale: difficulty.player_stamina_growth,
            level,
            ..Default::default()
        }),
        PlayerSkill::AttackDamage | PlayerSkill::AttackDistance => level as f32,
    }
}

// =============================================================================
// UPDATE
// =============================================================================

pub fn update_player(state: &mut GameState) -> Result<(), UpdateError> {
    if state.world.get::<&Live>(state.player_entity)?.is_dead() {
        return Ok(());
    }

    regenerate_health(state)?;
    update_movement(state)?;
    update_velocity(state)?;
    update_stamina(state)?;
    Ok(())
}

fn regenerate_health(state: &mut GameState) -> Result<(), UpdateError> {
    let now = state.clock.now();
    let player = state.player_entity;

    let amount = {
        let live = state.world.get::<&Live>(player)?;
        let mut stats = state.world.get::<&mut Player>(player)?;
        if live.is_max_health() || now < stats.heal_at {
            return Ok(());
        }
        stats.heal_at = now + PLAYER_HEALTH_REGENERATE_DELAY;
        live.max_health() * state.config.difficulty.player_health_regenerate_multiplier
    };

    combat::apply_heal(state, player, amount, false);
    Ok(())
}

/// Report tile changes and turn towards the requested direction
fn update_movement(state: &mut GameState) -> Result<(), UpdateError> {
    let player = state.player_entity;
    let tile = state.world.get::<&Position>(player)?.matrix;

    let moved = {
        let mut stats = state.world.get::<&mut Player>(player)?;
        if let Some(angle) = stats.movement_angle {
            state.world.get::<&mut Facing>(player)?.0 = direction_8(angle);
        }
        let moved = stats.last_tile != tile;
        stats.last_tile = tile;
        moved
    };

    if moved {
        state.events.push(GameEvent::PlayerMovedTile { position: tile });
        state.hooks.on_player_move(tile);
    }
    Ok(())
}

fn update_velocity(state: &mut GameState) -> Result<(), UpdateError> {
    let player = state.player_entity;
    let (angle, exhausted) = {
        let stats = state.world.get::<&Player>(player)?;
        (stats.movement_angle, stats.stamina <= 0.0)
    };

    let Some(angle) = angle.map(f32::to_radians) else {
        state.world.get::<&mut Velocity>(player)?.0 = Vec2::ZERO;
        return Ok(());
    };

    let position = *state.world.get::<&Position>(player)?;
    let collider = *state.world.get::<&Collider>(player)?;
    let direction = velocity_from_angle(angle, 1.0);

    let velocity = match handle_collide(&state.level, position.world, direction, &collider) {
        Some(Collision::Tile(tile)) => {
            if tile.kind == TileKind::Coin {
                coins::pickup(state, tile);
            }
            Vec2::ZERO
        }
        Some(_) => Vec2::ZERO,
        None => {
            let friction = state
                .level
                .get_biome_at(position.matrix)
                .map_or(1.0, |biome| biome.friction());
            let mut speed = state.world.get::<&Speed>(player)?.0 / friction;
            if exhausted {
                speed /= PLAYER_EXHAUSTED_SPEED_DIVISOR;
            }
            velocity_from_angle(angle, speed)
        }
    };

    state.world.get::<&mut Velocity>(player)?.0 = velocity;
    Ok(())
}

/// Drain while moving, regenerate while idle. Each step stamps the time, so
/// at most one step happens per `PLAYER_STAMINA_TICK`.
fn update_stamina(state: &mut GameState) -> Result<(), UpdateError> {
    let now = state.clock.now();
    let mut stats = state.world.get::<&mut Player>(state.player_entity)?;
    if stats.stamina_at >= now || stats.stamina_max <= 0.0 {
        return Ok(());
    }

    if stats.is_moving() {
        if stats.stamina > 0.0 {
            stats.stamina = (stats.stamina - PLAYER_STAMINA_DRAIN).max(0.0);
            stats.stamina_at = now + PLAYER_STAMINA_TICK;
        }
    } else if stats.stamina < stats.stamina_max {
        let fill = (stats.stamina / stats.stamina_max).max(PLAYER_STAMINA_REGEN_FLOOR);
        stats.stamina =
            (stats.stamina + stats.stamina_max * PLAYER_STAMINA_REGEN_RATE * fill).min(stats.stamina_max);
        stats.stamina_at = now + PLAYER_STAMINA_TICK;
    }
    Ok(())
}

// =============================================================================
// ACTIONS
// =============================================================================

fn ensure_alive(state: &GameState) -> Result<(), ActionError> {
    let dead = state
        .world
        .get::<&Live>(state.player_entity)
        .map_or(true, |live| live.is_dead());
    if dead {
        Err(ActionError::PlayerDead)
    } else {
        Ok(())
    }
}

/// Melee sweep: spend stamina and hit every living enemy in reach
pub fn attack(state: &mut GameState) -> Result<(), ActionError> {
    ensure_alive(state)?;
    let player = state.player_entity;

    let (damage, distance) = {
        let mut stats = state
            .world
            .get::<&mut Player>(player)
            .map_err(|_| ActionError::PlayerDead)?;
        let need = state.config.difficulty.player_attack_need_stamina;
        if stats.stamina < need {
            return Err(ActionError::NotEnoughStamina {
                need,
                have: stats.stamina,
            });
        }
        stats.stamina = (stats.stamina - need).max(0.0);
        stats.stamina_at = state.clock.now() + PLAYER_STAMINA_TICK;

        let difficulty = &state.config.difficulty;
        (
            attack_damage(difficulty, stats.skills.get(PlayerSkill::AttackDamage)),
            attack_distance(difficulty, stats.skills.get(PlayerSkill::AttackDistance)),
        )
    };

    let center = state
        .world
        .get::<&Position>(player)
        .map_err(|_| ActionError::PlayerDead)?
        .world;
    let targets: Vec<_> = state
        .world
        .query::<(&Enemy, &Position, &Live)>()
        .iter()
        .filter(|(_, (_, position, live))| {
            !live.is_dead() && isometric_distance(center, position.world) <= distance
        })
        .map(|(entity, _)| entity)
        .collect();

    state.events.push(GameEvent::PlayerAttacked { distance });
    for target in targets {
        combat::apply_damage(state, target, damage);
    }
    state.hooks.on_player_attack();
    Ok(())
}

/// Buy the next level of a skill
pub fn upgrade(state: &mut GameState, skill: PlayerSkill) -> Result<(), ActionError> {
    ensure_alive(state)?;
    let player = state.player_entity;

    let (level, coins) = {
        let stats = state
            .world
            .get::<&Player>(player)
            .map_err(|_| ActionError::PlayerDead)?;
        (stats.skills.get(skill), stats.coins)
    };
    if level >= PLAYER_MAX_SKILL_LEVEL {
        return Err(ActionError::MaxLevel);
    }
    let cost = upgrade_cost(&state.config.difficulty, skill, level);
    if coins < cost {
        return Err(ActionError::NotEnoughCoins {
            need: cost,
            have: coins,
        });
    }

    let next = level + 1;
    if let Ok(mut stats) = state.world.get::<&mut Player>(player) {
        stats.skills.set(skill, next);
    }
    apply_skill_value(state, skill, next);
    take_coins(state, cost);

    state.events.push(GameEvent::SkillUpgraded { skill, level: next });
    debug!("{:?} upgraded to level {} for {} coins", skill, next, cost);
    Ok(())
}

fn apply_skill_value(state: &mut GameState, skill: PlayerSkill, level: u32) {
    let player = state.player_entity;
    let value = skill_value(&state.config.difficulty, skill, level);

    match skill {
        PlayerSkill::MaxHealth => {
            if let Ok(mut live) = state.world.get::<&mut Live>(player) {
                let added = value - live.max_health();
                live.set_max_health(value);
                live.add_health(added);
            }
        }
        PlayerSkill::Speed => {
            if let Ok(mut speed) = state.world.get::<&mut Speed>(player) {
                speed.0 = value;
            }
        }
        PlayerSkill::Stamina => {
            if let Ok(mut stats) = state.world.get::<&mut Player>(player) {
                stats.stamina_max = value;
                stats.stamina = value;
            }
        }
        PlayerSkill::AttackDamage | PlayerSkill::AttackDistance => {}
    }
}

// =============================================================================
// ECONOMY
// =============================================================================

/// Add coins and persist the balance. A dead player earns nothing.
pub fn give_coins(state: &mut GameState, amount: u32) {
    let player = state.player_entity;
    if state
        .world
        .get::<&Live>(player)
        .map_or(true, |live| live.is_dead())
    {
        return;
    }
    let Ok(mut stats) = state.world.get::<&mut Player>(player) else {
        return;
    };
    stats.coins += amount;
    state.store.save_coins(stats.coins);
    state.events.push(GameEvent::CoinsChanged {
        amount: stats.coins,
    });
}

pub fn take_coins(state: &mut GameState, amount: u32) {
    let Ok(mut stats) = state.world.get::<&mut Player>(state.player_entity) else {
        return;
    };
    stats.coins = stats.coins.saturating_sub(amount);
    state.store.save_coins(stats.coins);
    state.events.push(GameEvent::CoinsChanged {
        amount: stats.coins,
    });
}

pub fn increment_kills(state: &mut GameState) {
    if let Ok(mut stats) = state.world.get::<&mut Player>(state.player_entity) {
        stats.kills += 1;
    }
}
