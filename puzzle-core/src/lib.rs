//! Placement engine for a geographic jigsaw puzzle.
//!
//! Regions of a map are projected to screen space, cut into pieces, scattered
//! along the inside of a frame and dragged back to their centroids by the
//! player. Everything here is platform free; the browser crate only forwards
//! pointer events and renders what the engine reports.

pub mod animation;
pub mod celebration;
pub mod config;
pub mod constants;
pub mod drag;
pub mod error;
pub mod geojson;
pub mod layout;
pub mod models;
pub mod piece;
pub mod projection;
pub mod puzzle;
pub mod session;

pub use celebration::{Burst, Celebration};
pub use config::{FrameRect, ProjectionConfig, PuzzleConfig};
pub use drag::{DragController, DropOutcome};
pub use error::PuzzleError;
pub use models::{Extent, Point, ProjectedRegion, Region};
pub use piece::{Display, Piece};
pub use puzzle::{Puzzle, PuzzleEvent};
pub use session::{Completion, SessionState};

/// Fill colors used for piece states. Stable across the whole session.
pub fn piece_fill(fixed: bool, hovered: bool) -> &'static str {
    if fixed {
        constants::FILL_CORRECT
    } else if hovered {
        constants::FILL_HOVER
    } else {
        constants::FILL_DEFAULT
    }
}
