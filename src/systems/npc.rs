//! NPC path following.
//!
//! Every tick an NPC decides between idling, holding position close to its
//! target, and following a path to it. Path searches run on the navigator
//! and come back as `PathReply` messages, which are applied before the next
//! round of updates.

use glam::Vec2;
use hecs::Entity;
use log::{debug, trace};

use crate::components::{Collider, Facing, Npc, NpcState, Position, Speed, Velocity};
use crate::constants::*;
use crate::coords::{
    direction_8, isometric_angle, isometric_distance, to_world_position, velocity_from_angle,
    MatrixPosition,
};
use crate::engine::GameState;
use crate::error::UpdateError;
use crate::events::GameEvent;
use crate::live::Live;
use crate::navigator::{Path, PathRequest, TaskId};
use crate::systems::movement::handle_collide;
use crate::time_system::{TimerId, TimerKind};

/// Result of a path search, sent from the navigator callback
#[derive(Debug, Clone)]
pub struct PathReply {
    pub entity: Entity,
    pub task: TaskId,
    pub target: MatrixPosition,
    pub path: Option<Path>,
}

/// Where an NPC is heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub world: Vec2,
    pub matrix: MatrixPosition,
}

impl From<Position> for Target {
    fn from(position: Position) -> Self {
        Self {
            world: position.world,
            matrix: position.matrix,
        }
    }
}

/// Re-evaluate the NPC state and steer towards `target`
pub fn update_npc(
    state: &mut GameState,
    entity: Entity,
    target: Target,
    can_pursue: bool,
) -> Result<(), UpdateError> {
    let position = *state.world.get::<&Position>(entity)?;

    if !can_pursue {
        {
            let mut npc = state.world.get::<&mut Npc>(entity)?;
            npc.state = NpcState::Idle;
            npc.path_passed = false;
        }
        state.world.get::<&mut Velocity>(entity)?.0 = Vec2::ZERO;
        return Ok(());
    }

    let trigger = state.world.get::<&Npc>(entity)?.path_find_trigger_distance;
    if isometric_distance(position.world, target.world) <= trigger {
        reset_path(state, entity)?;
        {
            let mut npc = state.world.get::<&mut Npc>(entity)?;
            npc.state = NpcState::Engaged;
            npc.path_passed = true;
        }
        state.world.get::<&mut Velocity>(entity)?.0 = Vec2::ZERO;
        return Ok(());
    }

    {
        let mut npc = state.world.get::<&mut Npc>(entity)?;
        npc.state = NpcState::Pursuing;
        npc.path_passed = false;
    }
    find_path_to_target(state, entity, position.matrix, target.matrix)?;
    move_by_path(state, entity)
}

/// Drop the current path and any search still in flight
pub fn reset_path(state: &mut GameState, entity: Entity) -> Result<(), UpdateError> {
    let mut npc = state.world.get::<&mut Npc>(entity)?;
    npc.reset_path();
    if let Some(task) = npc.path_task.take() {
        state.navigator.cancel_task(task);
    }
    Ok(())
}

fn find_path_to_target(
    state: &mut GameState,
    entity: Entity,
    from: MatrixPosition,
    to: MatrixPosition,
) -> Result<(), UpdateError> {
    let now = state.clock.now();
    let mut npc = state.world.get::<&mut Npc>(entity)?;

    if npc.path_task.is_some() || now < npc.next_path_find_at || npc.path_target == Some(to) {
        return Ok(());
    }
    npc.next_path_find_at = now + NPC_PATH_FIND_RATE;

    let request = PathRequest {
        from,
        to,
        grid: state.level.grid_collide(),
    };
    let tx = state.path_tx.clone();
    let task = state.navigator.create_task(request, move |task, path| {
        let reply = PathReply {
            entity,
            task,
            target: to,
            path,
        };
        if let Err(err) = tx.send(reply) {
            debug!("dropping path reply: {}", err);
        }
    });
    trace!("{:?} requested path {:?} -> {:?} as task {}", entity, from, to, task);
    npc.path_task = Some(task);

    Ok(())
}

/// Install finished searches. Replies for despawned entities or for tasks
/// that are no longer current are ignored.
pub fn drain_path_replies(state: &mut GameState) {
    let replies: Vec<PathReply> = state.path_rx.try_iter().collect();
    for reply in replies {
        apply_path_reply(state, reply);
    }
}

fn apply_path_reply(state: &mut GameState, reply: PathReply) {
    let Ok(mut npc) = state.world.get::<&mut Npc>(reply.entity) else {
        return;
    };
    if npc.path_task != Some(reply.task) {
        return;
    }
    npc.path_task = None;

    let dead = state
        .world
        .get::<&Live>(reply.entity)
        .map_or(true, |live| live.is_dead());
    if dead {
        return;
    }

    match reply.path {
        Some(path) => {
            // the first step is the tile the NPC already stands on
            npc.path = path.into_iter().skip(1).map(to_world_position).collect();
            npc.path_target = if npc.path.is_empty() {
                None
            } else {
                Some(reply.target)
            };
        }
        None => trace!("{:?} has no path to {:?}", reply.entity, reply.target),
    }
}

/// A waypoint counts as reached when it is close, or when the NPC has moved
/// past it along both axes of its current velocity
fn waypoint_reached(position: Vec2, waypoint: Vec2, velocity: Vec2) -> bool {
    if position.distance(waypoint) <= NPC_WAYPOINT_REACH {
        return true;
    }
    if velocity == Vec2::ZERO {
        return false;
    }
    let sign = velocity.signum();
    let passed_x = velocity.x == 0.0 || position.x * sign.x >= waypoint.x * sign.x;
    let passed_y = velocity.y == 0.0 || position.y * sign.y >= waypoint.y * sign.y;
    passed_x && passed_y
}

fn move_by_path(state: &mut GameState, entity: Entity) -> Result<(), UpdateError> {
    let position = state.world.get::<&Position>(entity)?.world;
    let velocity = state.world.get::<&Velocity>(entity)?.0;

    let next = {
        let mut npc = state.world.get::<&mut Npc>(entity)?;
        while let Some(&head) = npc.path.front() {
            if !waypoint_reached(position, head, velocity) {
                break;
            }
            npc.path.pop_front();
        }
        if npc.path.is_empty() {
            npc.path_target = None;
        }
        npc.path.front().copied()
    };

    match next {
        Some(waypoint) => move_to(state, entity, waypoint),
        None => {
            state.world.get::<&mut Velocity>(entity)?.0 = Vec2::ZERO;
            Ok(())
        }
    }
}

/// Head straight for a world point, respecting collisions, ground friction
/// and freeze
pub fn move_to(state: &mut GameState, entity: Entity, target: Vec2) -> Result<(), UpdateError> {
    let now = state.clock.now();
    let position = *state.world.get::<&Position>(entity)?;
    let collider = *state.world.get::<&Collider>(entity)?;

    let angle = isometric_angle(position.world, target);
    let direction = velocity_from_angle(angle, 1.0);

    let velocity = if handle_collide(&state.level, position.world, direction, &collider).is_some() {
        Vec2::ZERO
    } else {
        let friction = state
            .level
            .get_biome_at(position.matrix)
            .map_or(1.0, |biome| biome.friction());
        let frozen = state
            .world
            .get::<&Npc>(entity)
            .map_or(false, |npc| npc.is_frozen(now));

        let mut speed = state.world.get::<&Speed>(entity)?.0 / friction;
        if frozen {
            speed *= FREEZE_SPEED_FACTOR;
        }
        velocity_from_angle(angle, speed)
    };

    state.world.get::<&mut Velocity>(entity)?.0 = velocity;
    state.world.get::<&mut Facing>(entity)?.0 = direction_8(angle.to_degrees());
    Ok(())
}

/// Slow the NPC down until `now + duration`. Overlapping freezes extend to
/// the later end. With effects, the frozen visual runs until the freeze
/// ends; a running visual is extended instead of restarted.
pub fn freeze(
    state: &mut GameState,
    entity: Entity,
    duration: u64,
    with_effects: bool,
) -> Result<(), UpdateError> {
    let now = state.clock.now();
    let mut npc = state.world.get::<&mut Npc>(entity)?;
    npc.frozen_until = npc.frozen_until.max(now + duration);

    if !with_effects {
        return Ok(());
    }

    match npc.freeze_effect {
        Some(timer) => state.timers.cancel(timer),
        None => state.events.push(GameEvent::FreezeStarted { entity }),
    }
    let until = npc.frozen_until;
    npc.freeze_effect = Some(state.timers.schedule(until, TimerKind::FreezeEffectEnd(entity)));

    Ok(())
}

/// Timer callback: the frozen visual is over
pub fn end_freeze_effect(state: &mut GameState, entity: Entity, timer: TimerId) {
    let Ok(mut npc) = state.world.get::<&mut Npc>(entity) else {
        return;
    };
    if npc.freeze_effect == Some(timer) {
        npc.freeze_effect = None;
        state.events.push(GameEvent::FreezeEnded { entity });
    }
}

/// Remove an NPC together with its search and timers
pub fn despawn(state: &mut GameState, entity: Entity) {
    if let Ok(mut npc) = state.world.get::<&mut Npc>(entity) {
        if let Some(task) = npc.path_task.take() {
            state.navigator.cancel_task(task);
        }
    }
    state.timers.cancel_for_entity(entity);
    if state.world.despawn(entity).is_ok() {
        trace!("despawned {:?}", entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::EnemyVariant;
    use crate::engine::game_state::tests::{open_state, spawn_enemy_at};

    fn npc(state: &GameState, entity: Entity) -> Npc {
        Npc::clone(&state.world.get::<&Npc>(entity).unwrap())
    }

    fn target_at(matrix: MatrixPosition) -> Target {
        Target {
            world: to_world_position(matrix),
            matrix,
        }
    }

    #[test]
    fn test_within_trigger_distance_is_engaged_without_search() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(8, 8));
        state.world.get::<&mut Npc>(enemy).unwrap().path_find_trigger_distance = 20.0;
        state.world.get::<&mut Velocity>(enemy).unwrap().0 = Vec2::new(5.0, 5.0);

        let origin = state.world.get::<&Position>(enemy).unwrap().world;
        let target = Target {
            world: origin + Vec2::new(15.0, 0.0),
            matrix: MatrixPosition::new(8, 8),
        };
        update_npc(&mut state, enemy, target, true).unwrap();

        let npc = npc(&state, enemy);
        assert_eq!(npc.state, NpcState::Engaged);
        assert!(npc.path_passed);
        assert_eq!(npc.path_task, None);
        assert_eq!(state.navigator.pending_count(), 0);
        assert_eq!(state.world.get::<&Velocity>(enemy).unwrap().0, Vec2::ZERO);
    }

    #[test]
    fn test_cannot_pursue_is_idle() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(8, 8));
        update_npc(&mut state, enemy, target_at(MatrixPosition::new(1, 1)), false).unwrap();

        assert_eq!(npc(&state, enemy).state, NpcState::Idle);
        assert_eq!(state.navigator.pending_count(), 0);
    }

    #[test]
    fn test_pursuit_requests_one_path_and_follows_it() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(8, 8));
        let target = target_at(MatrixPosition::new(2, 8));

        update_npc(&mut state, enemy, target, true).unwrap();
        update_npc(&mut state, enemy, target, true).unwrap();
        assert_eq!(npc(&state, enemy).state, NpcState::Pursuing);
        assert_eq!(state.navigator.pending_count(), 1);

        state.navigator.process();
        drain_path_replies(&mut state);

        let npc_after = npc(&state, enemy);
        assert_eq!(npc_after.path_task, None);
        assert_eq!(npc_after.path_target, Some(MatrixPosition::new(2, 8)));
        assert_eq!(npc_after.path.len(), 6);

        update_npc(&mut state, enemy, target, true).unwrap();
        let velocity = state.world.get::<&Velocity>(enemy).unwrap().0;
        assert!(velocity.length() > 0.0);
        // the same target is not searched again
        assert_eq!(state.navigator.pending_count(), 0);
    }

    #[test]
    fn test_path_requests_are_rate_limited() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(8, 8));

        update_npc(&mut state, enemy, target_at(MatrixPosition::new(2, 8)), true).unwrap();
        state.navigator.process();
        drain_path_replies(&mut state);

        // new target right away: too soon for another search
        update_npc(&mut state, enemy, target_at(MatrixPosition::new(8, 2)), true).unwrap();
        assert_eq!(state.navigator.pending_count(), 0);

        state.clock.advance(NPC_PATH_FIND_RATE);
        update_npc(&mut state, enemy, target_at(MatrixPosition::new(8, 2)), true).unwrap();
        assert_eq!(state.navigator.pending_count(), 1);
    }

    #[test]
    fn test_engaging_cancels_search_in_flight() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(8, 8));

        update_npc(&mut state, enemy, target_at(MatrixPosition::new(2, 8)), true).unwrap();
        assert_eq!(state.navigator.pending_count(), 1);

        update_npc(&mut state, enemy, target_at(MatrixPosition::new(8, 8)), true).unwrap();
        assert_eq!(state.navigator.pending_count(), 0);
        assert_eq!(npc(&state, enemy).path_task, None);
    }

    #[test]
    fn test_reply_for_despawned_entity_is_dropped() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(8, 8));
        update_npc(&mut state, enemy, target_at(MatrixPosition::new(2, 8)), true).unwrap();

        despawn(&mut state, enemy);
        assert_eq!(state.navigator.pending_count(), 0);

        state.navigator.process();
        drain_path_replies(&mut state);
        assert!(!state.world.contains(enemy));
    }

    #[test]
    fn test_frozen_npc_moves_slower() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(8, 8));
        let goal = to_world_position(MatrixPosition::new(8, 2));

        move_to(&mut state, enemy, goal).unwrap();
        let normal = state.world.get::<&Velocity>(enemy).unwrap().0.length();

        freeze(&mut state, enemy, 1000, false).unwrap();
        move_to(&mut state, enemy, goal).unwrap();
        let frozen = state.world.get::<&Velocity>(enemy).unwrap().0.length();

        assert!((frozen - normal * FREEZE_SPEED_FACTOR).abs() < 1e-3);
    }

    #[test]
    fn test_freeze_extends_to_later_end() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(8, 8));

        freeze(&mut state, enemy, 1000, false).unwrap();
        freeze(&mut state, enemy, 200, false).unwrap();
        assert_eq!(npc(&state, enemy).frozen_until, 1000);

        state.clock.advance(500);
        freeze(&mut state, enemy, 1000, false).unwrap();
        assert_eq!(npc(&state, enemy).frozen_until, 1500);
    }

    #[test]
    fn test_freeze_effect_is_extended_not_restarted() {
        let mut state = open_state(16, MatrixPosition::new(1, 1));
        let enemy = spawn_enemy_at(&mut state, EnemyVariant::Demon, 1, MatrixPosition::new(8, 8));

        freeze(&mut state, enemy, 1000, true).unwrap();
        let first = npc(&state, enemy).freeze_effect.unwrap();
        freeze(&mut state, enemy, 2000, true).unwrap();
        let second = npc(&state, enemy).freeze_effect.unwrap();

        assert!(!state.timers.is_scheduled(first));
        assert!(state.timers.is_scheduled(second));
        let started = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::FreezeStarted { .. }))
            .count();
        assert_eq!(started, 1);

        end_freeze_effect(&mut state, enemy, second);
        assert_eq!(npc(&state, enemy).freeze_effect, None);
        assert!(state
            .events
            .iter()
            .any(|e| *e == GameEvent::FreezeEnded { entity: enemy }));
    }
}
