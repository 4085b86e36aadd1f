//! # Prop Distribution
//!
//! Greedy single-pass scatter of props over the floor. Candidate positions lie
//! on a fixed-stride grid, and a candidate is skipped when any prop already
//! sits within the minimum distance (Chebyshev) of it.

use crate::compositor::{TileCompositor, EMPTY_TILE};
use crate::{defaults, TileRange};
use log::debug;
use rand::Rng;

/// Spacing rules for prop distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropSpacing {
    /// Distance between sampled candidate positions on both axes
    pub stride: usize,
    /// Radius of the square searched for an existing prop
    pub min_distance: usize,
}

impl Default for PropSpacing {
    fn default() -> Self {
        Self {
            stride: defaults::DISTANCE_BETWEEN_PROPS,
            min_distance: defaults::DISTANCE_BETWEEN_POOPS,
        }
    }
}

impl TileCompositor {
    /// Places props on walkable floor. Returns the positions placed, in order.
    pub fn distribute_props<R: Rng + ?Sized>(
        &mut self,
        floor: TileRange,
        props: TileRange,
        spacing: PropSpacing,
        rng: &mut R,
    ) -> Vec<(usize, usize)> {
        let mut placed = Vec::new();
        if spacing.stride == 0 {
            return placed;
        }

        for y in (0..self.height()).step_by(spacing.stride) {
            for x in (0..self.width()).step_by(spacing.stride) {
                if !self.is_walkable(x as i64, y as i64, floor) {
                    continue;
                }
                if self.prop_within(x, y, spacing.min_distance) {
                    continue;
                }
                if self.props.set(x as i64, y as i64, props.pick(rng)).is_ok() {
                    placed.push((x, y));
                }
            }
        }

        debug!("Placed {} props", placed.len());
        placed
    }

    /// Checks the in-bounds part of the square of `radius` around `(x, y)`.
    fn prop_within(&self, x: usize, y: usize, radius: usize) -> bool {
        let x_range = x.saturating_sub(radius)..=(x + radius).min(self.width() - 1);
        let y_range = y.saturating_sub(radius)..=(y + radius).min(self.height() - 1);

        y_range.into_iter().any(|ny| {
            x_range.clone().any(|nx| {
                self.props
                    .try_get(nx as i64, ny as i64)
                    .is_some_and(|id| id != EMPTY_TILE)
            })
        })
    }
}
