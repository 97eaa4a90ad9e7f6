//! Camera visibility seam.
//!
//! The renderer owns the real camera; the simulation only needs to know
//! whether a world point is on screen (the spawner never spawns in view).

use glam::Vec2;

pub trait Viewport {
    fn is_visible(&self, position: Vec2) -> bool;

    /// Called every tick with the player's world position
    fn follow(&mut self, _focus: Vec2) {}
}

/// Axis-aligned screen rectangle centered on the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub center: Vec2,
    pub half_extent: Vec2,
}

impl CameraView {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            half_extent: Vec2::new(width, height) * 0.5,
        }
    }
}

impl Viewport for CameraView {
    fn is_visible(&self, position: Vec2) -> bool {
        let d = (position - self.center).abs();
        d.x <= self.half_extent.x && d.y <= self.half_extent.y
    }

    fn follow(&mut self, focus: Vec2) {
        self.center = focus;
    }
}

/// Any predicate works as a fixed viewport
impl<F: Fn(Vec2) -> bool> Viewport for F {
    fn is_visible(&self, position: Vec2) -> bool {
        self(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_follows_focus() {
        let mut view = CameraView::new(200.0, 100.0);
        assert!(view.is_visible(Vec2::new(90.0, 40.0)));
        assert!(!view.is_visible(Vec2::new(110.0, 0.0)));

        view.follow(Vec2::new(500.0, 0.0));
        assert!(view.is_visible(Vec2::new(590.0, 0.0)));
        assert!(!view.is_visible(Vec2::ZERO));
    }

    #[test]
    fn test_closure_viewport() {
        let left_half = |p: Vec2| p.x < 0.0;
        assert!(left_half.is_visible(Vec2::new(-1.0, 0.0)));
        assert!(!left_half.is_visible(Vec2::new(1.0, 0.0)));
    }
}
