//! # Layer Export
//!
//! Read-only hand-off of the finished layers to whatever serializes them.

use crate::compositor::TileCompositor;
use crate::MazeResult;
use serde::{Deserialize, Serialize};

/// The three finished layers plus the dimensions needed to interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerExport {
    /// Map width in tiles
    pub width: usize,
    /// Map height in tiles
    pub height: usize,
    /// Room fragment width in tiles
    pub room_width: usize,
    /// Room fragment height in tiles
    pub room_height: usize,
    pub background: Vec<u32>,
    pub walls: Vec<u32>,
    pub props: Vec<u32>,
}

impl LayerExport {
    pub fn from_compositor(compositor: &TileCompositor, room_width: usize, room_height: usize) -> Self {
        Self {
            width: compositor.width(),
            height: compositor.height(),
            room_width,
            room_height,
            background: compositor.background().tiles().to_vec(),
            walls: compositor.walls().tiles().to_vec(),
            props: compositor.props().tiles().to_vec(),
        }
    }

    pub fn to_json_string(&self) -> MazeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> MazeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
