//! # Procedural Catalog
//!
//! A catalog that draws its own room art: a bordered box per piece type with a
//! two-tile gap on every open side. Used when no catalog file is supplied.

use crate::pieces::{CatalogData, PieceType, PieceVariation};
use crate::{Direction, MazeError, MazeResult, TileRange};
use std::collections::HashMap;

/// Wall tile roles used by procedural pieces, as offsets into the wall range.
const TOP_WALL: u32 = 0;
const RIGHT_WALL: u32 = 1;
const BOTTOM_WALL: u32 = 2;
const LEFT_WALL: u32 = 3;
const CORNER_WALL: u32 = 4;

const PILLAR_WEIGHT: f64 = 0.25;

impl CatalogData {
    /// Builds a complete catalog from the wall tile range alone.
    ///
    /// Every piece type gets a plain variation. Rooms at least 6×6 also get a
    /// rarer variation with a 2×2 pillar in the middle.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomweave::{CatalogData, PieceCatalog, PieceType, TileRange};
    ///
    /// let catalog = CatalogData::procedural(8, 8, TileRange::new(11, 18)).unwrap();
    /// assert_eq!(catalog.room_width(), 8);
    /// assert_eq!(catalog.variations(PieceType::Intersection).unwrap().len(), 2);
    /// ```
    pub fn procedural(room_width: usize, room_height: usize, walls: TileRange) -> MazeResult<Self> {
        if room_width < 4 || room_height < 4 {
            return Err(MazeError::InvalidCatalog(format!(
                "procedural rooms must be at least 4x4, got {room_width}x{room_height}"
            )));
        }
        if walls.len() <= CORNER_WALL {
            return Err(MazeError::InvalidCatalog(format!(
                "procedural rooms need {} wall tiles, range has {}",
                CORNER_WALL + 1,
                walls.len()
            )));
        }

        let with_pillar = room_width >= 6 && room_height >= 6;
        let pieces = PieceType::ALL
            .into_iter()
            .map(|piece| {
                let plain = draw_piece(piece, room_width, room_height, walls);
                let mut variations = Vec::new();
                if with_pillar {
                    let mut pillar = plain.clone();
                    add_pillar(&mut pillar, room_width, room_height, walls.first + CORNER_WALL);
                    variations.push(PieceVariation::new(plain, 1.0));
                    variations.push(PieceVariation::new(pillar, PILLAR_WEIGHT));
                } else {
                    variations.push(PieceVariation::new(plain, 1.0));
                }
                (piece, variations)
            })
            .collect::<HashMap<_, _>>();

        CatalogData::new(room_width, room_height, pieces)
    }
}

fn draw_piece(piece: PieceType, width: usize, height: usize, walls: TileRange) -> Vec<u32> {
    let doors = piece.doors();
    let mut tiles = vec![0; width * height];

    for y in 0..height {
        for x in 0..width {
            let left = x == 0;
            let right = x == width - 1;
            let top = y == 0;
            let bottom = y == height - 1;

            let role = match (top || bottom, left || right) {
                (true, true) => Some(CORNER_WALL),
                (true, false) if top => Some(TOP_WALL),
                (true, false) => Some(BOTTOM_WALL),
                (false, true) if left => Some(LEFT_WALL),
                (false, true) => Some(RIGHT_WALL),
                (false, false) => None,
            };
            let Some(role) = role else { continue };

            let side = match role {
                TOP_WALL => Some((Direction::North, x, width)),
                BOTTOM_WALL => Some((Direction::South, x, width)),
                LEFT_WALL => Some((Direction::West, y, height)),
                RIGHT_WALL => Some((Direction::East, y, height)),
                _ => None,
            };
            let in_doorway = side.is_some_and(|(direction, along, span)| {
                doors.is_open(direction) && is_door_gap(along, span)
            });

            if !in_doorway {
                tiles[y * width + x] = walls.first + role;
            }
        }
    }
    tiles
}

/// The two middle tiles of a wall of length `span`.
fn is_door_gap(along: usize, span: usize) -> bool {
    let mid = span / 2;
    along == mid || along + 1 == mid
}

fn add_pillar(tiles: &mut [u32], width: usize, height: usize, tile: u32) {
    let (cx, cy) = (width / 2, height / 2);
    for y in cy - 1..=cy {
        for x in cx - 1..=cx {
            tiles[y * width + x] = tile;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::PieceCatalog;

    const WALLS: TileRange = TileRange { first: 11, last: 18 };

    #[test]
    fn test_procedural_catalog_is_complete() {
        let catalog = CatalogData::procedural(12, 12, WALLS).unwrap();
        assert!(catalog.validate().is_ok());
        for piece in PieceType::ALL {
            let variations = catalog.variations(piece).unwrap();
            assert_eq!(variations.len(), 2);
            assert!(variations.iter().all(|v| v.tiles.len() == 144));
        }
    }

    #[test]
    fn test_door_gaps_follow_pattern() {
        let catalog = CatalogData::procedural(8, 8, WALLS).unwrap();
        let tiles = &catalog.variations(PieceType::EndUp).unwrap()[0].tiles;

        // North gap at columns 3 and 4 of the top row.
        assert_eq!(tiles[3], 0);
        assert_eq!(tiles[4], 0);
        assert_eq!(tiles[2], 11);
        // South wall stays closed.
        assert_eq!(tiles[7 * 8 + 3], 13);
        // East and west walls stay closed.
        assert_eq!(tiles[3 * 8], 14);
        assert_eq!(tiles[3 * 8 + 7], 12);
        // Corners and interior.
        assert_eq!(tiles[0], 15);
        assert_eq!(tiles[2 * 8 + 2], 0);
    }

    #[test]
    fn test_small_rooms_skip_pillar() {
        let catalog = CatalogData::procedural(4, 5, WALLS).unwrap();
        assert_eq!(catalog.variations(PieceType::TUp).unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_tiny_rooms_and_short_wall_ranges() {
        assert!(CatalogData::procedural(3, 8, WALLS).is_err());
        assert!(CatalogData::procedural(8, 8, TileRange::new(11, 14)).is_err());
    }
}
