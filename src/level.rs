//! Level spatial index.
//!
//! Owns the biome map, the layered tile matrix and the two collision grids
//! derived from them. Everything that asks "what is at this tile" goes
//! through here.

use std::rc::Rc;

use glam::Vec2;
use rand::Rng;

use crate::biome::{Biome, SpawnTarget};
use crate::constants::*;
use crate::coords::{to_matrix_position, MatrixPosition};
use crate::error::TileError;
use crate::grid::CollisionGrid;
use crate::mapgen::BiomeMap;
use crate::tile::{Tile, TileKind, TileMatrix, TilePosition};

/// Neighbor offsets, clockwise from north
const NEIGHBORS_8: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Layer that holds pickups and scenery
pub const OBJECT_LAYER: usize = 1;

pub struct Level {
    map: BiomeMap,
    tiles: TileMatrix,
    /// Cells walkers and searches may not enter. Shared with in-flight
    /// path searches; writes go through `Rc::make_mut`.
    grid_collide: Rc<CollisionGrid>,
    /// Cells with standable ground
    grid_solid: CollisionGrid,
}

impl Level {
    pub fn new(map: BiomeMap) -> Self {
        puffin::profile_function!();

        let width = map.width;
        let height = map.height;
        let mut tiles = TileMatrix::new(width, height, LEVEL_MAP_LAYERS);
        let mut grid_collide = CollisionGrid::new(width, height);
        let mut grid_solid = CollisionGrid::new(width, height);

        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let Some(biome_type) = map.get(MatrixPosition::new(x, y)) else {
                    continue;
                };
                let biome = biome_type.biome();
                tiles.set(TilePosition::new(x, y, 0), Tile::ground(biome_type));
                grid_collide.set(x, y, biome.collide);
                grid_solid.set(x, y, biome.solid);
            }
        }

        Self {
            map,
            tiles,
            grid_collide: Rc::new(grid_collide),
            grid_solid,
        }
    }

    pub fn width(&self) -> usize {
        self.map.width
    }

    pub fn height(&self) -> usize {
        self.map.height
    }

    pub fn in_bounds(&self, position: MatrixPosition) -> bool {
        self.grid_solid.in_bounds(position)
    }

    pub fn get_biome_at(&self, position: MatrixPosition) -> Option<&'static Biome> {
        self.map.get(position).map(|b| b.biome())
    }

    /// Snapshot of the collision grid for path searches
    pub fn grid_collide(&self) -> Rc<CollisionGrid> {
        Rc::clone(&self.grid_collide)
    }

    pub fn grid_solid(&self) -> &CollisionGrid {
        &self.grid_solid
    }

    /// Whether walkers may not enter the cell
    pub fn is_blocked(&self, position: MatrixPosition) -> bool {
        self.grid_collide.is_blocked(position)
    }

    /// Whether the cell has ground a sprite can stand on
    pub fn is_solid(&self, position: MatrixPosition) -> bool {
        self.in_bounds(position) && self.grid_solid.get(position.x, position.y)
    }

    /// Place a tile. Ground (layer 0) is replaced; any other layer must be
    /// empty.
    pub fn put_tile(&mut self, tile: Tile, position: TilePosition) -> Result<(), TileError> {
        if !self.tiles.contains(position) {
            return Err(TileError::OutOfBounds {
                x: position.x,
                y: position.y,
                z: position.z,
            });
        }
        if position.z != 0 && self.tiles.is_occupied(position) {
            return Err(TileError::Occupied {
                x: position.x,
                y: position.y,
                z: position.z,
            });
        }

        let matrix = MatrixPosition::new(position.x, position.y);
        if position.z == 0 {
            if let Some(biome) = tile.biome {
                self.map.set(matrix, biome);
                self.grid_solid.set(position.x, position.y, biome.biome().solid);
            }
        }

        self.tiles.set(position, tile);
        self.refresh_collision(matrix);
        Ok(())
    }

    /// Remove whatever occupies a cell and return it
    pub fn remove_tile(&mut self, position: TilePosition) -> Option<Tile> {
        let removed = self.tiles.take(position)?;
        self.refresh_collision(MatrixPosition::new(position.x, position.y));
        Some(removed)
    }

    fn refresh_collision(&mut self, position: MatrixPosition) {
        let biome_collides = self.get_biome_at(position).map_or(true, |b| b.collide);
        let scenery = (OBJECT_LAYER..self.tiles.depth()).any(|z| {
            self.tiles
                .get(TilePosition::new(position.x, position.y, z))
                .is_some_and(|t| t.kind == TileKind::Scenery)
        });
        let collide = biome_collides || scenery;

        if self.grid_collide.get(position.x, position.y) != collide {
            Rc::make_mut(&mut self.grid_collide).set(position.x, position.y, collide);
        }
    }

    pub fn get_tile(&self, position: TilePosition) -> Option<&Tile> {
        self.tiles.get(position)
    }

    /// The tile at `position` if its kind is one of `kinds`
    pub fn get_tile_with_type(&self, position: TilePosition, kinds: &[TileKind]) -> Option<&Tile> {
        self.tiles
            .get(position)
            .filter(|tile| kinds.contains(&tile.kind))
    }

    fn is_obstruction(&self, position: MatrixPosition) -> bool {
        if self.get_biome_at(position).is_some_and(|b| b.is_elevated()) {
            return true;
        }
        self.get_tile_with_type(
            TilePosition::new(position.x, position.y, OBJECT_LAYER),
            &[TileKind::Scenery],
        )
        .is_some()
    }

    /// Whether anything blocks the straight line between two world points.
    /// The segment is sampled every `LOS_SAMPLE_STEP` pixels; the endpoints
    /// themselves are not tested.
    pub fn has_tiles_between_positions(&self, a: Vec2, b: Vec2) -> bool {
        let distance = a.distance(b);
        let steps = (distance / LOS_SAMPLE_STEP).ceil() as usize;

        (1..steps).any(|i| {
            let point = a.lerp(b, i as f32 / steps as f32);
            self.is_obstruction(to_matrix_position(point))
        })
    }

    /// Every tile whose biome permits `target`, keeping every
    /// `grid_step`-th row and column
    pub fn read_spawn_positions(&self, target: SpawnTarget, grid_step: usize) -> Vec<MatrixPosition> {
        let step = grid_step.max(1);
        let mut positions = Vec::new();

        for y in (0..self.height() as i32).step_by(step) {
            for x in (0..self.width() as i32).step_by(step) {
                let position = MatrixPosition::new(x, y);
                if self.get_biome_at(position).is_some_and(|b| b.allows(target)) {
                    positions.push(position);
                }
            }
        }

        positions
    }

    /// Standable, non-colliding tile with an empty object layer
    pub fn is_free_point(&self, position: MatrixPosition) -> bool {
        self.in_bounds(position)
            && self.grid_solid.get(position.x, position.y)
            && !self.grid_collide.is_blocked(position)
            && !self
                .tiles
                .is_occupied(TilePosition::new(position.x, position.y, OBJECT_LAYER))
    }

    pub fn get_free_adjacent_tiles(&self, position: MatrixPosition) -> Vec<MatrixPosition> {
        NEIGHBORS_8
            .iter()
            .map(|(dx, dy)| position.offset(*dx, *dy))
            .filter(|p| self.is_free_point(*p))
            .collect()
    }

    /// Decorate scenery-eligible free tiles. `density` is a percentage.
    /// Returns the number of tiles placed.
    pub fn scatter_scenery(&mut self, rng: &mut impl Rng, density: f32) -> usize {
        puffin::profile_function!();

        let mut placed = 0;
        for position in self.read_spawn_positions(SpawnTarget::Scenery, 1) {
            if rng.gen::<f32>() * 100.0 >= density || !self.is_free_point(position) {
                continue;
            }
            let tile = Tile::scenery(rng.gen_range(0..4));
            if self
                .put_tile(tile, TilePosition::new(position.x, position.y, OBJECT_LAYER))
                .is_ok()
            {
                placed += 1;
            }
        }
        placed
    }
}
