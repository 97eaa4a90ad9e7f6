//! Collision probing and velocity integration.

use glam::Vec2;
use hecs::World;

use crate::components::{Collider, Decaying, Position, Velocity};
use crate::constants::*;
use crate::coords::to_matrix_position;
use crate::level::{Level, OBJECT_LAYER};
use crate::tile::{Tile, TilePosition};

/// What a probe ran into
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collision {
    /// A tile of one of the collider's kinds
    Tile(Tile),
    /// Ground nobody can stand on
    Ground,
    /// A cell marked in the collide grid
    Grid,
}

/// Probe the point `COLLIDE_LOOKAHEAD` px ahead of `position` along
/// `direction`. A zero direction never collides.
pub fn handle_collide(
    level: &Level,
    position: Vec2,
    direction: Vec2,
    collider: &Collider,
) -> Option<Collision> {
    let direction = direction.normalize_or_zero();
    if direction == Vec2::ZERO {
        return None;
    }
    let ahead = to_matrix_position(position + direction * COLLIDE_LOOKAHEAD);

    if let Some(tile) = level.get_tile_with_type(
        TilePosition::new(ahead.x, ahead.y, OBJECT_LAYER),
        collider.tiles,
    ) {
        return Some(Collision::Tile(*tile));
    }
    if collider.ground && !level.is_solid(ahead) {
        return Some(Collision::Ground);
    }
    if level.is_blocked(ahead) {
        return Some(Collision::Grid);
    }
    None
}

/// Move every living sprite by its velocity
pub fn integrate(world: &mut World, delta_ms: u64) {
    puffin::profile_function!();

    let dt = delta_ms as f32 / 1000.0;
    for (_, (position, velocity, decaying)) in
        world.query_mut::<(&mut Position, &Velocity, Option<&Decaying>)>()
    {
        if decaying.is_some() || velocity.0 == Vec2::ZERO {
            continue;
        }
        position.set_world(position.world + velocity.0 * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{to_world_position, MatrixPosition};
    use crate::level::tests::open_level;
    use crate::mapgen::BiomeMap;
    use crate::tile::TileKind;

    #[test]
    fn test_open_ground_does_not_collide() {
        let level = open_level(8);
        let at = to_world_position(MatrixPosition::new(4, 4));
        assert_eq!(
            handle_collide(&level, at, Vec2::X, &Collider::WALKER),
            None
        );
    }

    #[test]
    fn test_water_blocks_walkers() {
        // water column at x = 3
        let level = Level::new(BiomeMap::from_rows(&["...~.", "...~.", "...~.", "...~."]));
        let center = to_world_position(MatrixPosition::new(2, 1));
        let towards = to_world_position(MatrixPosition::new(3, 1)) - center;
        // close to the shore, so the probe lands in the water
        let at = center + towards * 0.4;
        assert_eq!(
            handle_collide(&level, center, towards, &Collider::WALKER),
            None
        );
        assert_eq!(
            handle_collide(&level, at, towards, &Collider::WALKER),
            Some(Collision::Ground)
        );
    }

    #[test]
    fn test_tile_kinds_are_per_collider() {
        let mut level = open_level(8);
        let coin = hecs::World::new().spawn(());
        level
            .put_tile(Tile::coin(coin), TilePosition::new(4, 3, OBJECT_LAYER))
            .unwrap();

        let center = to_world_position(MatrixPosition::new(4, 4));
        let towards = to_world_position(MatrixPosition::new(4, 3)) - center;
        let at = center + towards * 0.4;

        let hit = handle_collide(&level, at, towards, &Collider::PLAYER);
        assert!(matches!(hit, Some(Collision::Tile(tile)) if tile.kind == TileKind::Coin));
        assert_eq!(handle_collide(&level, at, towards, &Collider::WALKER), None);
    }

    #[test]
    fn test_integrate_moves_and_updates_matrix() {
        let mut world = World::new();
        let entity = world.spawn((
            Position::at_matrix(MatrixPosition::new(0, 0)),
            Velocity(Vec2::new(21.0, 12.0)),
        ));
        integrate(&mut world, 1000);

        let position = world.get::<&Position>(entity).unwrap();
        assert_eq!(position.world, Vec2::new(21.0, 12.0));
        assert_eq!(position.matrix, MatrixPosition::new(1, 0));
    }

    #[test]
    fn test_decaying_sprites_stay_put() {
        let mut world = World::new();
        let entity = world.spawn((
            Position::at_matrix(MatrixPosition::new(2, 2)),
            Velocity(Vec2::new(50.0, 0.0)),
            Decaying,
        ));
        integrate(&mut world, 100);
        assert_eq!(
            world.get::<&Position>(entity).unwrap().matrix,
            MatrixPosition::new(2, 2)
        );
    }
}
