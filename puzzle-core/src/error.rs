use thiserror::Error;

/// Setup failures. Interactive operations never fail; they ignore input that
/// does not apply (fixed pieces, no active drag).
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("feature {index} has no string property `{field}`")]
    MissingName { index: usize, field: String },

    #[error("feature {index} has a position with fewer than two coordinates")]
    InvalidPosition { index: usize },

    #[error("region `{name}` has no projectable area")]
    EmptyGeometry { name: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
