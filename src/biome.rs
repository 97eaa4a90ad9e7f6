//! Static biome descriptors.
//!
//! The map generator assigns one `BiomeType` per tile; everything the
//! simulation needs to know about the terrain is looked up here.

use serde::{Deserialize, Serialize};

/// What may be spawned on a biome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnTarget {
    Enemy,
    Player,
    Coin,
    Scenery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeType {
    Water,
    Sand,
    Grass,
    Rubble,
    Mount,
    Snow,
}

/// Immutable terrain descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Biome {
    pub biome_type: BiomeType,
    /// Inclusive range of tileset frames used for this biome
    pub tile_index: (u32, u32),
    /// Elevation; anything above 1 is a raised block
    pub z: u8,
    /// Walkers cannot enter this tile
    pub collide: bool,
    /// Standable ground. Walking onto a non-solid tile is a ground collision.
    pub solid: bool,
    /// Movement speed is divided by this while standing here
    pub friction: Option<f32>,
    pub spawn: &'static [SpawnTarget],
}

impl Biome {
    /// Speed divisor for this ground, 1.0 when the biome has no friction
    pub fn friction(&self) -> f32 {
        self.friction.unwrap_or(1.0)
    }

    pub fn allows(&self, target: SpawnTarget) -> bool {
        self.spawn.contains(&target)
    }

    /// Raised blocks hide whatever is behind them
    pub fn is_elevated(&self) -> bool {
        self.z > 1
    }
}

static BIOMES: [Biome; 6] = [
    Biome {
        biome_type: BiomeType::Water,
        tile_index: (0, 3),
        z: 0,
        collide: true,
        solid: false,
        friction: None,
        spawn: &[],
    },
    Biome {
        biome_type: BiomeType::Sand,
        tile_index: (4, 7),
        z: 1,
        collide: false,
        solid: true,
        friction: Some(1.2),
        spawn: &[SpawnTarget::Enemy, SpawnTarget::Coin],
    },
    Biome {
        biome_type: BiomeType::Grass,
        tile_index: (8, 11),
        z: 1,
        collide: false,
        solid: true,
        friction: None,
        spawn: &[
            SpawnTarget::Enemy,
            SpawnTarget::Player,
            SpawnTarget::Coin,
            SpawnTarget::Scenery,
        ],
    },
    Biome {
        biome_type: BiomeType::Rubble,
        tile_index: (12, 15),
        z: 1,
        collide: false,
        solid: true,
        friction: Some(1.4),
        spawn: &[SpawnTarget::Enemy, SpawnTarget::Scenery],
    },
    Biome {
        biome_type: BiomeType::Mount,
        tile_index: (16, 19),
        z: 2,
        collide: true,
        solid: true,
        friction: None,
        spawn: &[],
    },
    Biome {
        biome_type: BiomeType::Snow,
        tile_index: (20, 23),
        z: 3,
        collide: true,
        solid: true,
        friction: None,
        spawn: &[],
    },
];

impl BiomeType {
    pub const ALL: [BiomeType; 6] = [
        BiomeType::Water,
        BiomeType::Sand,
        BiomeType::Grass,
        BiomeType::Rubble,
        BiomeType::Mount,
        BiomeType::Snow,
    ];

    pub fn biome(self) -> &'static Biome {
        match self {
            BiomeType::Water => &BIOMES[0],
            BiomeType::Sand => &BIOMES[1],
            BiomeType::Grass => &BIOMES[2],
            BiomeType::Rubble => &BIOMES[3],
            BiomeType::Mount => &BIOMES[4],
            BiomeType::Snow => &BIOMES[5],
        }
    }

    /// Single-character code used by hand-authored maps
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '~' => Some(BiomeType::Water),
            's' => Some(BiomeType::Sand),
            '.' => Some(BiomeType::Grass),
            ',' => Some(BiomeType::Rubble),
            '^' => Some(BiomeType::Mount),
            '*' => Some(BiomeType::Snow),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_types() {
        for biome_type in BiomeType::ALL {
            assert_eq!(biome_type.biome().biome_type, biome_type);
        }
    }

    #[test]
    fn test_water_is_not_standable() {
        let water = BiomeType::Water.biome();
        assert!(water.collide);
        assert!(!water.solid);
        assert!(!water.allows(SpawnTarget::Enemy));
    }

    #[test]
    fn test_friction_defaults_to_one() {
        assert_eq!(BiomeType::Grass.biome().friction(), 1.0);
        assert!(BiomeType::Sand.biome().friction() > 1.0);
    }

    #[test]
    fn test_raised_blocks_are_elevated() {
        assert!(BiomeType::Mount.biome().is_elevated());
        assert!(BiomeType::Snow.biome().is_elevated());
        assert!(!BiomeType::Grass.biome().is_elevated());
    }
}
