//! Seeded biome map generation.
//!
//! A two-octave Perlin height field with an edge falloff is cut into biome
//! bands, lowest to highest. The level only ever sees the resulting
//! `BiomeMap`, so hand-authored maps work the same way.

use crate::biome::BiomeType;
use crate::constants::*;
use crate::coords::MatrixPosition;
use noise::{NoiseFn, Perlin};

/// Height thresholds (upper bound, biome) from the sea up
const BANDS: [(f64, BiomeType); 5] = [
    (0.18, BiomeType::Water),
    (0.26, BiomeType::Sand),
    (0.58, BiomeType::Grass),
    (0.70, BiomeType::Rubble),
    (0.82, BiomeType::Mount),
];

/// Strength of the pull towards water at the map edges
const EDGE_FALLOFF: f64 = 0.3;

/// One biome per tile, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeMap {
    pub width: usize,
    pub height: usize,
    cells: Vec<BiomeType>,
}

impl BiomeMap {
    pub fn filled(width: usize, height: usize, biome: BiomeType) -> Self {
        Self {
            width,
            height,
            cells: vec![biome; width * height],
        }
    }

    /// Build from rows of biome codes (see `BiomeType::from_char`).
    /// Unknown characters become water.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut map = Self::filled(width, height, BiomeType::Water);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                map.cells[y * width + x] = BiomeType::from_char(c).unwrap_or(BiomeType::Water);
            }
        }
        map
    }

    pub fn get(&self, position: MatrixPosition) -> Option<BiomeType> {
        if position.x < 0
            || position.y < 0
            || position.x as usize >= self.width
            || position.y as usize >= self.height
        {
            return None;
        }
        Some(self.cells[position.y as usize * self.width + position.x as usize])
    }

    pub fn set(&mut self, position: MatrixPosition, biome: BiomeType) {
        if position.x >= 0
            && position.y >= 0
            && (position.x as usize) < self.width
            && (position.y as usize) < self.height
        {
            self.cells[position.y as usize * self.width + position.x as usize] = biome;
        }
    }
}

fn biome_for_height(height: f64) -> BiomeType {
    BANDS
        .iter()
        .find(|(limit, _)| height < *limit)
        .map_or(BiomeType::Snow, |(_, biome)| *biome)
}

/// Generate a square biome map of `size` tiles from `seed`
pub fn generate(size: usize, seed: u32) -> BiomeMap {
    puffin::profile_function!();

    let noise = Perlin::new(seed);
    let mut map = BiomeMap::filled(size, size, BiomeType::Water);

    for y in 0..size {
        for x in 0..size {
            let fx = x as f64 * MAPGEN_FREQUENCY;
            let fy = y as f64 * MAPGEN_FREQUENCY;

            let e = (noise.get([fx, fy]) + MAPGEN_DETAIL_WEIGHT * noise.get([fx * 2.0, fy * 2.0]))
                / (1.0 + MAPGEN_DETAIL_WEIGHT);
            let e = (e + 1.0) * 0.5;

            let nx = (x as f64 / size as f64 - 0.5) * 2.0;
            let ny = (y as f64 / size as f64 - 0.5) * 2.0;
            let edge = 1.0 - (1.0 - nx * nx) * (1.0 - ny * ny);
            let e = (e - EDGE_FALLOFF * edge).clamp(0.0, 1.0);

            map.cells[y * size + x] = biome_for_height(e);
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_seeded() {
        assert_eq!(generate(40, 7), generate(40, 7));
    }

    #[test]
    fn test_generated_map_has_land() {
        let map = generate(60, 3);
        let land = (0..60)
            .flat_map(|y| (0..60).map(move |x| MatrixPosition::new(x, y)))
            .filter(|p| map.get(*p).is_some_and(|b| b.biome().solid))
            .count();
        assert!(land > 0);
    }

    #[test]
    fn test_from_rows() {
        let map = BiomeMap::from_rows(&["~..", "s^*"]);
        assert_eq!(map.width, 3);
        assert_eq!(map.get(MatrixPosition::new(0, 0)), Some(BiomeType::Water));
        assert_eq!(map.get(MatrixPosition::new(1, 1)), Some(BiomeType::Mount));
        assert_eq!(map.get(MatrixPosition::new(3, 0)), None);
    }

    #[test]
    fn test_height_bands_are_ordered() {
        assert_eq!(biome_for_height(0.0), BiomeType::Water);
        assert_eq!(biome_for_height(0.4), BiomeType::Grass);
        assert_eq!(biome_for_height(0.99), BiomeType::Snow);
    }
}
