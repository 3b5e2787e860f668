use thiserror::Error;

/// Fatal engine errors.
///
/// Per-record failures while building a catalog are logged and skipped
/// instead of surfacing here; these variants mean the run itself is
/// misconfigured and must stop.
#[derive(Error, Debug)]
pub enum MatchError {
    /// Query and catalog embeddings come from incompatible extraction models
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Tolerance must be a finite, non-negative distance
    #[error("invalid match tolerance: {0}")]
    InvalidTolerance(f32),
}
