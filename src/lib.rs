//! # Roomweave
//!
//! Procedural grid-of-rooms maze generation for tile-based games.
//!
//! ## Architecture Overview
//!
//! A run flows through a handful of small systems, leaves first:
//!
//! - **Room graph**: the `columns × rows` matrix of rooms and their doors
//! - **Maze generator**: randomized depth-first traversal, repair and optional loop injection
//! - **Piece selection**: maps a door configuration to a piece type and picks a weighted variation
//! - **Tile compositor**: injects room art into the walls layer, derives shadows, scatters props
//!
//! The finished background, walls and props layers are handed to the export
//! stage as plain flat arrays. File formats, compression and viewers are the
//! concern of whoever consumes [`LayerExport`].

pub mod compositor;
pub mod config;
pub mod export;
pub mod maze;
pub mod pieces;
pub mod pipeline;

pub use compositor::*;
pub use config::*;
pub use export::*;
pub use maze::*;
pub use pieces::*;
pub use pipeline::*;

/// Core error type for roomweave.
#[derive(thiserror::Error, Debug)]
pub enum MazeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration values are inconsistent with each other
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Piece catalog is malformed or incomplete
    #[error("Invalid piece catalog: {0}")]
    InvalidCatalog(String),

    /// A room reached piece selection with a door pattern that has no piece
    #[error("Room ({column}, {row}) has invalid door pattern {pattern:04b}")]
    InvalidDoorPattern { column: usize, row: usize, pattern: u8 },

    /// The catalog has no variations for a piece type
    #[error("No variations for piece type {0}")]
    MissingPiece(PieceType),

    /// A layer access fell outside the layer extents
    #[error("Tile ({x}, {y}) is outside the {width}x{height} layer")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },
}

/// Result type used throughout the roomweave codebase.
pub type MazeResult<T> = Result<T, MazeError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default generation constants.
pub mod defaults {
    /// Upper bound on traversal steps before the generator moves on to repair
    pub const ITERATION_CEILING: u32 = 5000;

    /// Number of loop-injection attempts
    pub const LOOP_ITERATIONS: u32 = 35;

    /// Stride of the prop sampling grid, in tiles
    pub const DISTANCE_BETWEEN_PROPS: usize = 5;

    /// Radius searched for an existing prop before placing a new one
    pub const DISTANCE_BETWEEN_POOPS: usize = 7;

    /// Offset from a wall tile ID to its shadow tile ID
    pub const SHADOW_OFFSET: u32 = 20;
}
