//! # Shadow Derivation
//!
//! Writes a shadow into the background beside walls. Each walkable tile looks
//! at its neighbors in a fixed priority order and takes its shadow from the
//! first wall it finds.

use crate::compositor::TileCompositor;
use crate::{Direction, TileRange};
use log::debug;

/// Neighbor priority: west, north, then east and south.
pub const SHADOW_PRIORITY: [Direction; 4] = [
    Direction::West,
    Direction::North,
    Direction::East,
    Direction::South,
];

impl TileCompositor {
    /// Derives shadows from the walls layer into the background.
    ///
    /// A walkable tile next to a wall gets `wall_id + offset`. At most one
    /// shadow is written per tile. Returns the number of shadows written.
    pub fn derive_shadows(&mut self, floor: TileRange, walls: TileRange, offset: u32) -> usize {
        let (width, height) = (self.width() as i64, self.height() as i64);
        let mut written = 0;

        for y in 0..height {
            for x in 0..width {
                if !self.is_walkable(x, y, floor) {
                    continue;
                }
                let Some(shadow) = self.shadow_for(x, y, walls, offset) else {
                    continue;
                };
                if self.background.set(x, y, shadow).is_ok() {
                    written += 1;
                }
            }
        }

        debug!("Derived {} shadow tiles", written);
        written
    }

    /// Shadow tile for `(x, y)` from the highest priority adjacent wall.
    fn shadow_for(&self, x: i64, y: i64, walls: TileRange, offset: u32) -> Option<u32> {
        SHADOW_PRIORITY.into_iter().find_map(|direction| {
            let (dx, dy) = direction.delta();
            let wall = self.walls.try_get(x + dx as i64, y + dy as i64)?;
            if walls.contains(wall) {
                wall.checked_add(offset)
            } else {
                None
            }
        })
    }
}
