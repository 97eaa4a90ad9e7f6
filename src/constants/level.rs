//! Level geometry and map generation constants.

/// Width of a ground tile sprite in pixels
pub const TILE_WIDTH: f32 = 42.0;
/// Full height of a ground tile sprite in pixels (diamond plus side faces)
pub const TILE_HEIGHT: f32 = 48.0;
/// Height of the visible diamond top of a tile
pub const TILE_HEIGHT_VISIBLE: f32 = TILE_HEIGHT / 2.0;
/// Vertical squash of the isometric projection
pub const PERSPECTIVE: f32 = TILE_HEIGHT_VISIBLE / TILE_WIDTH;

/// Default side length of the square level map, in tiles
pub const LEVEL_MAP_SIZE: usize = 200;
/// Number of tile layers per cell (0 = ground, 1 = objects, 2 = overlays)
pub const LEVEL_MAP_LAYERS: usize = 3;

/// Sampling step in pixels when tracing a line of sight
pub const LOS_SAMPLE_STEP: f32 = 6.0;

/// Perlin frequency for the height field
pub const MAPGEN_FREQUENCY: f64 = 0.035;
/// Weight of the detail octave relative to the base octave
pub const MAPGEN_DETAIL_WEIGHT: f64 = 0.35;
/// Chance (percent) that a scenery-eligible tile receives a decoration
pub const SCENERY_DENSITY: f32 = 2.0;

/// How far ahead of a moving sprite collisions are probed (px)
pub const COLLIDE_LOOKAHEAD: f32 = 6.0;
