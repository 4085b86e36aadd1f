//! # Map Configuration
//!
//! Every tunable consumed by a generation run: map and room-grid dimensions,
//! tile ID ranges, loop injection and prop spacing settings.
//!
//! Nothing here enforces defaults internally. Presets are provided for
//! convenience, and [`MapConfig::validate`] must pass before a run starts.

use crate::{defaults, MazeError, MazeResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An inclusive range of tile IDs.
///
/// # Examples
///
/// ```
/// use roomweave::TileRange;
///
/// let walls = TileRange::new(11, 18);
/// assert!(walls.contains(11));
/// assert!(walls.contains(18));
/// assert!(!walls.contains(19));
/// assert_eq!(walls.len(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRange {
    pub first: u32,
    pub last: u32,
}

impl TileRange {
    pub fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    pub fn contains(&self, id: u32) -> bool {
        id >= self.first && id <= self.last
    }

    /// Number of IDs in the range, zero when `first > last`.
    pub fn len(&self) -> u32 {
        if self.first > self.last {
            0
        } else {
            self.last - self.first + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks whether two ranges share any ID.
    pub fn overlaps(&self, other: &TileRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.first <= other.last && other.first <= self.last
    }

    /// Returns the range shifted up by `offset`, or `None` on overflow.
    pub fn shifted(&self, offset: u32) -> Option<TileRange> {
        Some(TileRange::new(
            self.first.checked_add(offset)?,
            self.last.checked_add(offset)?,
        ))
    }

    /// Picks a uniformly random ID from the range.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.first..=self.last)
    }
}

/// Configuration for a single map generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Map width in tiles
    pub map_width: usize,
    /// Map height in tiles
    pub map_height: usize,
    /// Number of room columns in the grid
    pub columns: usize,
    /// Number of room rows in the grid
    pub rows: usize,
    /// Width of one room fragment in tiles
    pub room_width: usize,
    /// Height of one room fragment in tiles
    pub room_height: usize,
    /// Walkable floor tile IDs
    pub floor_tiles: TileRange,
    /// Structural wall tile IDs
    pub wall_tiles: TileRange,
    /// Decorative prop tile IDs
    pub prop_tiles: TileRange,
    /// Added to a wall tile ID to obtain its shadow tile ID
    pub shadow_offset: u32,
    /// Whether the loop-injection pass runs after repair
    pub loops_enabled: bool,
    /// Number of loop-injection attempts
    pub loop_iterations: u32,
    /// Stride of the prop sampling grid
    pub prop_stride: usize,
    /// Radius searched for existing props before placing one
    pub prop_min_distance: usize,
    /// Safety ceiling on traversal steps
    pub iteration_ceiling: u32,
}

impl MapConfig {
    /// Creates the default configuration: a 5×5 grid of 12×12 rooms.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomweave::MapConfig;
    ///
    /// let config = MapConfig::new();
    /// assert!(config.validate().is_ok());
    /// assert_eq!(config.columns * config.room_width, config.map_width);
    /// ```
    pub fn new() -> Self {
        Self {
            map_width: 60,
            map_height: 60,
            columns: 5,
            rows: 5,
            room_width: 12,
            room_height: 12,
            floor_tiles: TileRange::new(1, 4),
            wall_tiles: TileRange::new(11, 18),
            prop_tiles: TileRange::new(51, 58),
            shadow_offset: defaults::SHADOW_OFFSET,
            loops_enabled: true,
            loop_iterations: defaults::LOOP_ITERATIONS,
            prop_stride: defaults::DISTANCE_BETWEEN_PROPS,
            prop_min_distance: defaults::DISTANCE_BETWEEN_POOPS,
            iteration_ceiling: defaults::ITERATION_CEILING,
        }
    }

    /// Creates a configuration for testing with a small grid and no loops.
    pub fn for_testing() -> Self {
        Self {
            map_width: 24,
            map_height: 24,
            columns: 3,
            rows: 3,
            room_width: 8,
            room_height: 8,
            loops_enabled: false,
            ..Self::new()
        }
    }

    /// Loads a configuration from a JSON string and validates it.
    pub fn from_json_str(json: &str) -> MazeResult<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file and validates it.
    pub fn from_path(path: impl AsRef<Path>) -> MazeResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Total number of rooms in the grid.
    pub fn room_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Range of shadow tile IDs derived from the wall range.
    pub fn shadow_tiles(&self) -> Option<TileRange> {
        self.wall_tiles.shifted(self.shadow_offset)
    }

    /// Rejects inconsistent configurations before any generation starts.
    pub fn validate(&self) -> MazeResult<()> {
        let invalid = |msg: String| Err(MazeError::InvalidConfig(msg));

        if self.map_width == 0 || self.map_height == 0 {
            return invalid(format!(
                "map dimensions must be non-zero, got {}x{}",
                self.map_width, self.map_height
            ));
        }
        if self.columns == 0 || self.rows == 0 {
            return invalid(format!(
                "room grid must be non-empty, got {}x{}",
                self.columns, self.rows
            ));
        }
        if self.room_width == 0 || self.room_height == 0 {
            return invalid(format!(
                "room dimensions must be non-zero, got {}x{}",
                self.room_width, self.room_height
            ));
        }
        if self.map_width.checked_mul(self.map_height).is_none() {
            return invalid(format!(
                "map of {}x{} tiles is too large",
                self.map_width, self.map_height
            ));
        }
        match self.columns.checked_mul(self.room_width) {
            Some(width) if width <= self.map_width => {}
            _ => {
                return invalid(format!(
                    "{} columns of width {} do not fit in map width {}",
                    self.columns, self.room_width, self.map_width
                ))
            }
        }
        match self.rows.checked_mul(self.room_height) {
            Some(height) if height <= self.map_height => {}
            _ => {
                return invalid(format!(
                    "{} rows of height {} do not fit in map height {}",
                    self.rows, self.room_height, self.map_height
                ))
            }
        }

        for (name, range) in [
            ("floor", self.floor_tiles),
            ("wall", self.wall_tiles),
            ("prop", self.prop_tiles),
        ] {
            if range.is_empty() {
                return invalid(format!("{name} tile range {}..={} is empty", range.first, range.last));
            }
            if range.contains(0) {
                return invalid(format!("{name} tile range must not contain the empty tile 0"));
            }
        }
        if self.floor_tiles.overlaps(&self.wall_tiles) {
            return invalid("floor and wall tile ranges overlap".to_string());
        }

        let Some(shadows) = self.shadow_tiles() else {
            return invalid(format!(
                "shadow offset {} overflows wall range {}..={}",
                self.shadow_offset, self.wall_tiles.first, self.wall_tiles.last
            ));
        };
        if shadows.overlaps(&self.floor_tiles) || shadows.overlaps(&self.wall_tiles) {
            return invalid(format!(
                "shadow range {}..={} overlaps floor or wall tiles",
                shadows.first, shadows.last
            ));
        }

        if self.prop_stride == 0 {
            return invalid("prop stride must be non-zero".to_string());
        }

        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shadow_offset, 20);
        assert_eq!(config.prop_stride, 5);
        assert_eq!(config.prop_min_distance, 7);
        assert_eq!(config.loop_iterations, 35);
        assert_eq!(config.iteration_ceiling, 5000);
    }

    #[test]
    fn test_testing_config_is_valid() {
        let config = MapConfig::for_testing();
        assert!(config.validate().is_ok());
        assert!(!config.loops_enabled);
        assert_eq!(config.room_count(), 9);
    }

    #[test]
    fn test_grid_must_fit_in_map() {
        let mut config = MapConfig::new();
        config.columns = 6;
        assert!(matches!(config.validate(), Err(MazeError::InvalidConfig(_))));

        let mut config = MapConfig::new();
        config.room_height = 13;
        assert!(matches!(config.validate(), Err(MazeError::InvalidConfig(_))));
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let config = MapConfig {
            columns: usize::MAX / 2,
            room_width: 4,
            ..MapConfig::new()
        };
        assert!(matches!(config.validate(), Err(MazeError::InvalidConfig(_))));

        let config = MapConfig {
            rows: usize::MAX / 3,
            room_height: 5,
            ..MapConfig::new()
        };
        assert!(matches!(config.validate(), Err(MazeError::InvalidConfig(_))));

        let config = MapConfig {
            map_width: usize::MAX,
            map_height: 2,
            ..MapConfig::new()
        };
        assert!(matches!(config.validate(), Err(MazeError::InvalidConfig(_))));
    }

    #[test]
    fn test_tile_ranges_rejected() {
        let mut config = MapConfig::new();
        config.floor_tiles = TileRange::new(0, 4);
        assert!(config.validate().is_err());

        let mut config = MapConfig::new();
        config.prop_tiles = TileRange::new(9, 3);
        assert!(config.validate().is_err());

        let mut config = MapConfig::new();
        config.wall_tiles = TileRange::new(3, 8);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shadow_range_checks() {
        let mut config = MapConfig::new();
        config.shadow_offset = 0;
        assert!(config.validate().is_err());

        let mut config = MapConfig::new();
        config.shadow_offset = u32::MAX;
        assert!(config.validate().is_err());

        assert_eq!(MapConfig::new().shadow_tiles(), Some(TileRange::new(31, 38)));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let mut config = MapConfig::new();
        config.rows = 0;
        assert!(config.validate().is_err());

        let mut config = MapConfig::new();
        config.prop_stride = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = MapConfig::for_testing();
        let json = serde_json::to_string(&config).unwrap();
        let loaded = MapConfig::from_json_str(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_rejects_invalid_config() {
        let mut config = MapConfig::new();
        config.map_width = 10;
        let json = serde_json::to_string(&config).unwrap();
        assert!(MapConfig::from_json_str(&json).is_err());
    }

    #[test]
    fn test_tile_range_pick_stays_in_range() {
        use rand::{rngs::StdRng, SeedableRng};

        let range = TileRange::new(51, 58);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(range.contains(range.pick(&mut rng)));
        }
    }
}
