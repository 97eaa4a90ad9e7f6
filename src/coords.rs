//! Isometric coordinate model.
//!
//! Tiles live on an integer matrix grid; sprites move in floating world
//! (pixel) space. The projection rotates the grid 45 degrees and squashes
//! it vertically by `PERSPECTIVE`.

use crate::constants::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Integer tile coordinate on the level matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MatrixPosition {
    pub x: i32,
    pub y: i32,
}

impl MatrixPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Project a tile coordinate to the world position of its diamond center
pub fn to_world_position(position: MatrixPosition) -> Vec2 {
    Vec2::new(
        (position.x - position.y) as f32 * TILE_WIDTH * 0.5,
        (position.x + position.y) as f32 * TILE_HEIGHT_VISIBLE * 0.5,
    )
}

/// Find the tile whose diamond contains a world position
pub fn to_matrix_position(position: Vec2) -> MatrixPosition {
    let n = position.x / (TILE_WIDTH * 0.5);
    let m = position.y / (TILE_HEIGHT_VISIBLE * 0.5);

    MatrixPosition::new(((n + m) * 0.5).round() as i32, ((m - n) * 0.5).round() as i32)
}

/// Euclidean distance between two tiles
pub fn matrix_distance(a: MatrixPosition, b: MatrixPosition) -> f32 {
    let dx = (a.x - b.x) as f32;
    let dy = (a.y - b.y) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Distance between two world points with the vertical squash undone,
/// so a circle on the ground has the same radius in every direction.
pub fn isometric_distance(a: Vec2, b: Vec2) -> f32 {
    let dx = b.x - a.x;
    let dy = (b.y - a.y) / PERSPECTIVE;
    (dx * dx + dy * dy).sqrt()
}

/// Ground-plane angle from `a` to `b`, in radians
pub fn isometric_angle(a: Vec2, b: Vec2) -> f32 {
    ((b.y - a.y) / PERSPECTIVE).atan2(b.x - a.x)
}

/// Snap an angle in degrees to the nearest of the eight compass directions
/// (0, 45, ..., 315).
pub fn direction_8(angle_degrees: f32) -> u16 {
    let normalized = angle_degrees.rem_euclid(360.0);
    ((normalized / 45.0).round() as u16 % 8) * 45
}

/// Velocity for moving along a ground-plane angle at `speed` px/s.
/// The vertical component is squashed back into screen space.
pub fn velocity_from_angle(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos() * speed, angle.sin() * speed * PERSPECTIVE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_matrix_world() {
        for x in -30..30 {
            for y in -30..30 {
                let p = MatrixPosition::new(x, y);
                assert_eq!(to_matrix_position(to_world_position(p)), p);
            }
        }
    }

    #[test]
    fn test_origin_maps_to_origin() {
        assert_eq!(to_world_position(MatrixPosition::new(0, 0)), Vec2::ZERO);
        assert_eq!(to_world_position(MatrixPosition::new(1, 0)), Vec2::new(21.0, 12.0));
        assert_eq!(to_world_position(MatrixPosition::new(0, 1)), Vec2::new(-21.0, 12.0));
    }

    #[test]
    fn test_small_offsets_stay_in_tile() {
        let center = to_world_position(MatrixPosition::new(5, 7));
        let p = to_matrix_position(center + Vec2::new(4.0, -3.0));
        assert_eq!(p, MatrixPosition::new(5, 7));
    }

    #[test]
    fn test_isometric_distance_unsquashes_vertical() {
        let a = Vec2::ZERO;
        assert!((isometric_distance(a, Vec2::new(30.0, 0.0)) - 30.0).abs() < 1e-4);
        let b = Vec2::new(0.0, 30.0 * PERSPECTIVE);
        assert!((isometric_distance(a, b) - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_direction_8() {
        assert_eq!(direction_8(0.0), 0);
        assert_eq!(direction_8(44.0), 45);
        assert_eq!(direction_8(-90.0), 270);
        assert_eq!(direction_8(350.0), 0);
        assert_eq!(direction_8(200.0), 180);
    }

    #[test]
    fn test_matrix_distance() {
        let d = matrix_distance(MatrixPosition::new(0, 0), MatrixPosition::new(3, 4));
        assert!((d - 5.0).abs() < 1e-6);
    }
}
