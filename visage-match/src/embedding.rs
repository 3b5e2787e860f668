use ndarray::Array1;

use crate::error::MatchError;

/// Face embedding produced by the external extraction capability.
///
/// A fixed-length vector with no identity beyond its values; the
/// dimensionality is whatever the extraction model emits (typically 128).
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub vector: Array1<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            vector: Array1::from_vec(values),
        }
    }

    pub fn dim(&self) -> usize {
        self.vector.len()
    }

    /// Euclidean distance to another embedding.
    ///
    /// A dimension mismatch means the two embeddings came from incompatible
    /// extraction models and must stop the run rather than be skipped.
    pub fn distance(&self, other: &Embedding) -> Result<f32, MatchError> {
        if self.dim() != other.dim() {
            return Err(MatchError::DimensionMismatch {
                expected: self.dim(),
                got: other.dim(),
            });
        }
        let diff = &self.vector - &other.vector;
        Ok(diff.mapv(|d| d * d).sum().sqrt())
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}
