//! Layered tile storage.
//!
//! Each `(x, y)` cell has `LEVEL_MAP_LAYERS` slots; layer 0 is ground,
//! layer 1 holds pickups and scenery that stand on the ground.

use crate::biome::BiomeType;
use hecs::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Ground tile of a biome
    Map,
    /// Coin pickup
    Coin,
    /// Decoration (trees, rocks); blocks movement and sight
    Scenery,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub kind: TileKind,
    /// Tileset frame used by the renderer
    pub frame: u32,
    pub biome: Option<BiomeType>,
    /// Entity backing this tile, if any (coins)
    pub entity: Option<Entity>,
}

impl Tile {
    pub fn ground(biome: BiomeType) -> Self {
        Self {
            kind: TileKind::Map,
            frame: biome.biome().tile_index.0,
            biome: Some(biome),
            entity: None,
        }
    }

    pub fn scenery(frame: u32) -> Self {
        Self {
            kind: TileKind::Scenery,
            frame,
            biome: None,
            entity: None,
        }
    }

    pub fn coin(entity: Entity) -> Self {
        Self {
            kind: TileKind::Coin,
            frame: 0,
            biome: None,
            entity: Some(entity),
        }
    }
}

/// A 3D cell address in the tile matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilePosition {
    pub x: i32,
    pub y: i32,
    pub z: usize,
}

impl TilePosition {
    pub const fn new(x: i32, y: i32, z: usize) -> Self {
        Self { x, y, z }
    }
}

/// Fixed-size layered grid of optional tiles
#[derive(Debug, Clone)]
pub struct TileMatrix {
    width: usize,
    height: usize,
    depth: usize,
    cells: Vec<Option<Tile>>,
}

impl TileMatrix {
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
            cells: vec![None; width * height * depth],
        }
    }

    fn index(&self, position: TilePosition) -> Option<usize> {
        if position.x < 0
            || position.y < 0
            || position.x as usize >= self.width
            || position.y as usize >= self.height
            || position.z >= self.depth
        {
            return None;
        }
        Some((position.z * self.height + position.y as usize) * self.width + position.x as usize)
    }

    pub fn contains(&self, position: TilePosition) -> bool {
        self.index(position).is_some()
    }

    pub fn get(&self, position: TilePosition) -> Option<&Tile> {
        self.index(position).and_then(|i| self.cells[i].as_ref())
    }

    pub fn is_occupied(&self, position: TilePosition) -> bool {
        self.get(position).is_some()
    }

    /// Store a tile, returning whatever was there before.
    /// Returns `None` without storing when the position is out of range.
    pub fn set(&mut self, position: TilePosition, tile: Tile) -> Option<Option<Tile>> {
        let i = self.index(position)?;
        Some(self.cells[i].replace(tile))
    }

    pub fn take(&mut self, position: TilePosition) -> Option<Tile> {
        let i = self.index(position)?;
        self.cells[i].take()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_take() {
        let mut matrix = TileMatrix::new(4, 4, 2);
        let pos = TilePosition::new(1, 2, 1);
        assert!(!matrix.is_occupied(pos));
        assert_eq!(matrix.set(pos, Tile::scenery(3)), Some(None));
        assert_eq!(matrix.get(pos).map(|t| t.kind), Some(TileKind::Scenery));
        assert!(matrix.take(pos).is_some());
        assert!(!matrix.is_occupied(pos));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut matrix = TileMatrix::new(4, 4, 2);
        assert_eq!(matrix.set(TilePosition::new(4, 0, 0), Tile::scenery(0)), None);
        assert_eq!(matrix.set(TilePosition::new(0, 0, 2), Tile::scenery(0)), None);
        assert!(matrix.get(TilePosition::new(-1, 0, 0)).is_none());
    }

    #[test]
    fn test_layers_are_independent() {
        let mut matrix = TileMatrix::new(2, 2, 2);
        matrix.set(TilePosition::new(0, 0, 0), Tile::ground(BiomeType::Grass));
        assert!(!matrix.is_occupied(TilePosition::new(0, 0, 1)));
    }
}
