//! # Pieces Module
//!
//! Room art: the fixed door-pattern to piece-type table, weighted tile-data
//! variations, and the catalog contract that supplies them.

pub mod builtin;
pub mod selector;

pub use selector::*;

use crate::{DoorSet, MazeError, MazeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The fifteen kinds of room piece, one per non-empty door pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceType {
    Intersection,
    TDown,
    TUp,
    TLeft,
    TRight,
    VerticalHallway,
    HorizontalHallway,
    CornerBottomLeft,
    CornerBottomRight,
    CornerUpperLeft,
    CornerUpperRight,
    EndUp,
    EndRight,
    EndDown,
    EndLeft,
}

impl PieceType {
    pub const ALL: [PieceType; 15] = [
        PieceType::Intersection,
        PieceType::TDown,
        PieceType::TUp,
        PieceType::TLeft,
        PieceType::TRight,
        PieceType::VerticalHallway,
        PieceType::HorizontalHallway,
        PieceType::CornerBottomLeft,
        PieceType::CornerBottomRight,
        PieceType::CornerUpperLeft,
        PieceType::CornerUpperRight,
        PieceType::EndUp,
        PieceType::EndRight,
        PieceType::EndDown,
        PieceType::EndLeft,
    ];

    /// Looks up the piece type for a packed `NESW` door key.
    ///
    /// Returns `None` for `0b0000` and anything above four bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomweave::PieceType;
    ///
    /// assert_eq!(PieceType::from_bits(0b1100), Some(PieceType::CornerBottomLeft));
    /// assert_eq!(PieceType::from_bits(0b0000), None);
    /// ```
    pub fn from_bits(bits: u8) -> Option<PieceType> {
        let piece = match bits {
            0b1111 => PieceType::Intersection,
            0b1110 => PieceType::TDown,
            0b1101 => PieceType::TUp,
            0b1100 => PieceType::CornerBottomLeft,
            0b1011 => PieceType::TLeft,
            0b1010 => PieceType::VerticalHallway,
            0b1001 => PieceType::CornerBottomRight,
            0b1000 => PieceType::EndUp,
            0b0111 => PieceType::TRight,
            0b0110 => PieceType::CornerUpperLeft,
            0b0101 => PieceType::HorizontalHallway,
            0b0100 => PieceType::EndRight,
            0b0011 => PieceType::CornerUpperRight,
            0b0010 => PieceType::EndDown,
            0b0001 => PieceType::EndLeft,
            _ => return None,
        };
        Some(piece)
    }

    pub fn from_doors(doors: DoorSet) -> Option<PieceType> {
        Self::from_bits(doors.bits())
    }

    /// The packed door key this piece type is selected for.
    pub fn bits(self) -> u8 {
        match self {
            PieceType::Intersection => 0b1111,
            PieceType::TDown => 0b1110,
            PieceType::TUp => 0b1101,
            PieceType::CornerBottomLeft => 0b1100,
            PieceType::TLeft => 0b1011,
            PieceType::VerticalHallway => 0b1010,
            PieceType::CornerBottomRight => 0b1001,
            PieceType::EndUp => 0b1000,
            PieceType::TRight => 0b0111,
            PieceType::CornerUpperLeft => 0b0110,
            PieceType::HorizontalHallway => 0b0101,
            PieceType::EndRight => 0b0100,
            PieceType::CornerUpperRight => 0b0011,
            PieceType::EndDown => 0b0010,
            PieceType::EndLeft => 0b0001,
        }
    }

    pub fn doors(self) -> DoorSet {
        DoorSet::from_bits(self.bits())
    }

    /// Catalog key, e.g. `corner_bottom_left`.
    pub fn key(self) -> &'static str {
        match self {
            PieceType::Intersection => "intersection",
            PieceType::TDown => "t_down",
            PieceType::TUp => "t_up",
            PieceType::TLeft => "t_left",
            PieceType::TRight => "t_right",
            PieceType::VerticalHallway => "vertical_hallway",
            PieceType::HorizontalHallway => "horizontal_hallway",
            PieceType::CornerBottomLeft => "corner_bottom_left",
            PieceType::CornerBottomRight => "corner_bottom_right",
            PieceType::CornerUpperLeft => "corner_upper_left",
            PieceType::CornerUpperRight => "corner_upper_right",
            PieceType::EndUp => "end_up",
            PieceType::EndRight => "end_right",
            PieceType::EndDown => "end_down",
            PieceType::EndLeft => "end_left",
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One piece of room art and its sampling weight.
///
/// Tile data is shared between every room resolving to the same variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceVariation {
    pub tiles: Arc<[u32]>,
    pub weight: f64,
}

impl PieceVariation {
    pub fn new(tiles: impl Into<Arc<[u32]>>, weight: f64) -> Self {
        Self {
            tiles: tiles.into(),
            weight,
        }
    }
}

/// The piece a room was resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPiece {
    pub piece_type: PieceType,
    pub tiles: Arc<[u32]>,
}

/// Source of room art.
pub trait PieceCatalog {
    /// Width of every fragment in tiles.
    fn room_width(&self) -> usize;

    /// Height of every fragment in tiles.
    fn room_height(&self) -> usize;

    /// All variations for a piece type, if the catalog has any.
    fn variations(&self, piece: PieceType) -> Option<&[PieceVariation]>;

    /// Variations for a door configuration.
    fn lookup(&self, doors: DoorSet) -> MazeResult<&[PieceVariation]> {
        let piece = PieceType::from_doors(doors).ok_or_else(|| {
            MazeError::InvalidCatalog(format!("door pattern {:04b} has no piece type", doors.bits()))
        })?;
        match self.variations(piece) {
            Some(list) if !list.is_empty() => Ok(list),
            _ => Err(MazeError::MissingPiece(piece)),
        }
    }
}

/// An owned piece catalog, typically loaded from JSON.
///
/// ```json
/// { "room_width": 2, "room_height": 2,
///   "pieces": { "intersection": [ { "tiles": [11, 0, 0, 11], "weight": 1.0 } ], ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    pub room_width: usize,
    pub room_height: usize,
    pub pieces: HashMap<PieceType, Vec<PieceVariation>>,
}

impl CatalogData {
    /// Builds a catalog and checks it is complete and well-formed.
    pub fn new(
        room_width: usize,
        room_height: usize,
        pieces: HashMap<PieceType, Vec<PieceVariation>>,
    ) -> MazeResult<Self> {
        let catalog = Self {
            room_width,
            room_height,
            pieces,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> MazeResult<Self> {
        let catalog: CatalogData = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> MazeResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks every piece type has at least one correctly sized, positively
    /// weighted variation.
    pub fn validate(&self) -> MazeResult<()> {
        let expected = self.room_width * self.room_height;
        if expected == 0 {
            return Err(MazeError::InvalidCatalog(format!(
                "room dimensions must be non-zero, got {}x{}",
                self.room_width, self.room_height
            )));
        }

        for piece in PieceType::ALL {
            let variations = match self.pieces.get(&piece) {
                Some(list) if !list.is_empty() => list,
                _ => return Err(MazeError::MissingPiece(piece)),
            };
            for (i, variation) in variations.iter().enumerate() {
                if variation.tiles.len() != expected {
                    return Err(MazeError::InvalidCatalog(format!(
                        "{piece} variation {i} has {} tiles, expected {expected}",
                        variation.tiles.len()
                    )));
                }
                if !(variation.weight.is_finite() && variation.weight > 0.0) {
                    return Err(MazeError::InvalidCatalog(format!(
                        "{piece} variation {i} has non-positive weight {}",
                        variation.weight
                    )));
                }
            }
        }
        Ok(())
    }
}

impl PieceCatalog for CatalogData {
    fn room_width(&self) -> usize {
        self.room_width
    }

    fn room_height(&self) -> usize {
        self.room_height
    }

    fn variations(&self, piece: PieceType) -> Option<&[PieceVariation]> {
        self.pieces.get(&piece).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn flat_catalog(width: usize, height: usize) -> HashMap<PieceType, Vec<PieceVariation>> {
        PieceType::ALL
            .into_iter()
            .map(|piece| {
                let tiles = vec![u32::from(piece.bits()) + 10; width * height];
                (piece, vec![PieceVariation::new(tiles, 1.0)])
            })
            .collect()
    }

    #[test]
    fn test_table_is_total_over_non_empty_patterns() {
        let mut seen = HashSet::new();
        for bits in 1..16u8 {
            let piece = PieceType::from_bits(bits).expect("every non-empty pattern has a piece");
            assert_eq!(piece.bits(), bits);
            assert!(seen.insert(piece));
        }
        assert_eq!(seen.len(), PieceType::ALL.len());
        assert_eq!(PieceType::from_bits(0), None);
        assert_eq!(PieceType::from_bits(16), None);
    }

    #[test]
    fn test_table_entries() {
        let cases = [
            ([true, true, true, true], "intersection"),
            ([true, true, true, false], "t_down"),
            ([true, true, false, true], "t_up"),
            ([true, true, false, false], "corner_bottom_left"),
            ([true, false, true, true], "t_left"),
            ([true, false, true, false], "vertical_hallway"),
            ([true, false, false, true], "corner_bottom_right"),
            ([true, false, false, false], "end_up"),
            ([false, true, true, true], "t_right"),
            ([false, true, true, false], "corner_upper_left"),
            ([false, true, false, true], "horizontal_hallway"),
            ([false, true, false, false], "end_right"),
            ([false, false, true, true], "corner_upper_right"),
            ([false, false, true, false], "end_down"),
            ([false, false, false, true], "end_left"),
        ];
        for (doors, key) in cases {
            let piece = PieceType::from_doors(DoorSet::from(doors)).unwrap();
            assert_eq!(piece.key(), key);
            assert_eq!(piece.doors(), DoorSet::from(doors));
        }
    }

    #[test]
    fn test_serde_names_match_keys() {
        for piece in PieceType::ALL {
            let json = serde_json::to_string(&piece).unwrap();
            assert_eq!(json, format!("\"{}\"", piece.key()));
        }
    }

    #[test]
    fn test_lookup() {
        let catalog = CatalogData::new(2, 2, flat_catalog(2, 2)).unwrap();

        let list = catalog.lookup(DoorSet::from([false, true, false, true])).unwrap();
        assert_eq!(list[0].tiles[0], 15);

        assert!(catalog.lookup(DoorSet::closed()).is_err());
    }

    #[test]
    fn test_validation_rejects_missing_piece() {
        let mut pieces = flat_catalog(2, 2);
        pieces.remove(&PieceType::EndLeft);
        assert!(matches!(
            CatalogData::new(2, 2, pieces),
            Err(MazeError::MissingPiece(PieceType::EndLeft))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_variations() {
        let mut pieces = flat_catalog(2, 2);
        pieces.insert(PieceType::TUp, vec![PieceVariation::new(vec![1, 2, 3], 1.0)]);
        assert!(CatalogData::new(2, 2, pieces).is_err());

        let mut pieces = flat_catalog(2, 2);
        pieces.insert(PieceType::TUp, vec![PieceVariation::new(vec![1; 4], 0.0)]);
        assert!(CatalogData::new(2, 2, pieces).is_err());

        let mut pieces = flat_catalog(2, 2);
        pieces.insert(PieceType::TUp, Vec::new());
        assert!(CatalogData::new(2, 2, pieces).is_err());
    }

    #[test]
    fn test_json_loading() {
        let catalog = CatalogData::new(1, 1, flat_catalog(1, 1)).unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.contains("\"corner_upper_left\""));

        let loaded = CatalogData::from_json_str(&json).unwrap();
        assert_eq!(loaded, catalog);
    }
}
