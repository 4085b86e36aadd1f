//! # Piece Selection
//!
//! Resolves a room's door configuration to a piece type, then draws one of
//! that type's variations by weight.

use crate::pieces::{PieceCatalog, PieceType, PieceVariation, ResolvedPiece};
use crate::{MazeError, MazeResult, Room};
use rand::Rng;

/// Picks tile data for rooms from a catalog.
#[derive(Debug)]
pub struct PieceSelector<'a, C: PieceCatalog + ?Sized> {
    catalog: &'a C,
}

impl<'a, C: PieceCatalog + ?Sized> PieceSelector<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Resolves the piece type for a room's doors.
    ///
    /// An all-closed pattern means the generator left the room unconnected,
    /// so it is reported as an error rather than mapped to any piece.
    pub fn piece_type(&self, room: &Room) -> MazeResult<PieceType> {
        PieceType::from_doors(room.doors).ok_or(MazeError::InvalidDoorPattern {
            column: room.column,
            row: room.row,
            pattern: room.doors.bits(),
        })
    }

    /// Resolves a room's piece type and draws a variation for it.
    pub fn select<R: Rng + ?Sized>(&self, room: &Room, rng: &mut R) -> MazeResult<ResolvedPiece> {
        let piece_type = self.piece_type(room)?;
        let variations = self.catalog.lookup(room.doors)?;
        let variation = choose_weighted(variations, rng)?;
        Ok(ResolvedPiece {
            piece_type,
            tiles: variation.tiles.clone(),
        })
    }
}

/// Cumulative-weight sampling over a list of variations.
///
/// Draws a value in `[0, total)` and returns the first variation whose running
/// weight exceeds it. A single variation is returned without drawing.
pub fn choose_weighted<'v, R: Rng + ?Sized>(
    variations: &'v [PieceVariation],
    rng: &mut R,
) -> MazeResult<&'v PieceVariation> {
    match variations {
        [] => Err(MazeError::InvalidCatalog("empty variation list".to_string())),
        [only] => Ok(only),
        _ => {
            let total: f64 = variations.iter().map(|v| v.weight).sum();
            if !(total.is_finite() && total > 0.0) {
                return Err(MazeError::InvalidCatalog(format!(
                    "variation weights sum to {total}"
                )));
            }

            let draw = rng.gen_range(0.0..total);
            let mut cumulative = 0.0;
            for variation in variations {
                cumulative += variation.weight;
                if cumulative > draw {
                    return Ok(variation);
                }
            }
            // Rounding can leave the draw just past the final running total.
            Ok(&variations[variations.len() - 1])
        }
    }
}
