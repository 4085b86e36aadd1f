//! # Compositor Module
//!
//! Turns a finished room graph into three flat tile layers:
//! background (floor and shadows), walls (room art) and props.
//!
//! Tile ID `0` is empty. Injection never writes it over existing content, so
//! irregular room art can leave its neighbors' edges intact.
//!
//! Passes must run in order: injection completes before shadow derivation and
//! prop distribution, which both read the finished walls layer.

pub mod props;
pub mod shadows;

pub use props::*;
pub use shadows::*;

use crate::{MazeError, MazeResult, RoomGraph, TileRange};
use log::{debug, warn};
use rand::Rng;

/// The empty/transparent tile.
pub const EMPTY_TILE: u32 = 0;

/// A flat, row-major grid of tile IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    width: usize,
    height: usize,
    tiles: Vec<u32>,
}

impl TileLayer {
    /// Creates a layer of empty tiles.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![EMPTY_TILE; width * height],
        }
    }

    /// Wraps existing tile data. Fails if the length does not match.
    pub fn from_tiles(width: usize, height: usize, tiles: Vec<u32>) -> MazeResult<Self> {
        if tiles.len() != width * height {
            return Err(MazeError::InvalidConfig(format!(
                "{} tiles cannot fill a {width}x{height} layer",
                tiles.len()
            )));
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    fn out_of_bounds(&self, x: i64, y: i64) -> MazeError {
        MazeError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Row-major index of `(x, y)`, rejecting anything outside the layer.
    pub fn index(&self, x: i64, y: i64) -> MazeResult<usize> {
        let inside = (0..self.width as i64).contains(&x) && (0..self.height as i64).contains(&y);
        if inside {
            Ok(y as usize * self.width + x as usize)
        } else {
            Err(self.out_of_bounds(x, y))
        }
    }

    pub fn get(&self, x: i64, y: i64) -> MazeResult<u32> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    pub fn set(&mut self, x: i64, y: i64, id: u32) -> MazeResult<()> {
        let i = self.index(x, y)?;
        self.tiles[i] = id;
        Ok(())
    }

    /// Like [`get`](Self::get), but treats outside coordinates as absent.
    pub fn try_get(&self, x: i64, y: i64) -> Option<u32> {
        self.get(x, y).ok()
    }

    /// Copies a fragment into the layer with its top-left at `(origin_x, origin_y)`.
    ///
    /// Only non-zero fragment tiles are written. The whole fragment rectangle
    /// is bounds-checked before anything is written.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomweave::TileLayer;
    ///
    /// let mut layer = TileLayer::from_tiles(2, 2, vec![9, 9, 9, 9]).unwrap();
    /// layer.inject(&[0, 5, 0, 7], 0, 0, 2, 2).unwrap();
    /// assert_eq!(layer.tiles(), &[9, 5, 9, 7]);
    /// ```
    pub fn inject(
        &mut self,
        fragment: &[u32],
        origin_x: usize,
        origin_y: usize,
        frag_width: usize,
        frag_height: usize,
    ) -> MazeResult<()> {
        if fragment.len() != frag_width * frag_height {
            return Err(MazeError::InvalidCatalog(format!(
                "fragment of {} tiles is not {frag_width}x{frag_height}",
                fragment.len()
            )));
        }
        if frag_width == 0 || frag_height == 0 {
            return Ok(());
        }

        // Checking both corners covers the whole rectangle.
        let far_x = origin_x.checked_add(frag_width - 1);
        let far_y = origin_y.checked_add(frag_height - 1);
        let (Some(far_x), Some(far_y)) = (far_x, far_y) else {
            return Err(self.out_of_bounds(i64::MAX, i64::MAX));
        };
        self.index(to_coord(origin_x), to_coord(origin_y))?;
        self.index(to_coord(far_x), to_coord(far_y))?;

        for (row, line) in fragment.chunks_exact(frag_width).enumerate() {
            let start = (origin_y + row) * self.width + origin_x;
            for (dest, &tile) in self.tiles[start..start + frag_width].iter_mut().zip(line) {
                if tile != EMPTY_TILE {
                    *dest = tile;
                }
            }
        }
        Ok(())
    }
}

/// Saturates coordinates that do not fit in `i64`; they are out of bounds either way.
fn to_coord(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Owner of the background, walls and props layers for one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileCompositor {
    pub(crate) background: TileLayer,
    pub(crate) walls: TileLayer,
    pub(crate) props: TileLayer,
}

impl TileCompositor {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            background: TileLayer::new(width, height),
            walls: TileLayer::new(width, height),
            props: TileLayer::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.walls.width()
    }

    pub fn height(&self) -> usize {
        self.walls.height()
    }

    pub fn background(&self) -> &TileLayer {
        &self.background
    }

    pub fn walls(&self) -> &TileLayer {
        &self.walls
    }

    pub fn props(&self) -> &TileLayer {
        &self.props
    }

    pub fn background_mut(&mut self) -> &mut TileLayer {
        &mut self.background
    }

    pub fn walls_mut(&mut self) -> &mut TileLayer {
        &mut self.walls
    }

    pub fn props_mut(&mut self) -> &mut TileLayer {
        &mut self.props
    }

    /// Covers the background with uniformly chosen floor tiles.
    pub fn fill_background<R: Rng + ?Sized>(&mut self, floor: TileRange, rng: &mut R) {
        for tile in self.background.tiles.iter_mut() {
            *tile = floor.pick(rng);
        }
    }

    /// Injects every room's resolved piece into the walls layer at its grid offset.
    ///
    /// Returns the number of rooms injected.
    pub fn inject_rooms(
        &mut self,
        graph: &RoomGraph,
        room_width: usize,
        room_height: usize,
    ) -> MazeResult<usize> {
        let mut injected = 0;
        for room in graph.rooms() {
            let Some(piece) = &room.resolved_piece else {
                warn!("Room ({}, {}) has no resolved piece; leaving it empty", room.column, room.row);
                continue;
            };
            self.walls.inject(
                &piece.tiles,
                room.column * room_width,
                room.row * room_height,
                room_width,
                room_height,
            )?;
            injected += 1;
        }
        debug!("Injected {} rooms into the walls layer", injected);
        Ok(injected)
    }

    /// A tile is walkable when the background holds floor and no wall covers it.
    pub fn is_walkable(&self, x: i64, y: i64, floor: TileRange) -> bool {
        let background = self.background.try_get(x, y);
        let wall = self.walls.try_get(x, y);
        matches!((background, wall), (Some(id), Some(EMPTY_TILE)) if floor.contains(id))
    }
}
