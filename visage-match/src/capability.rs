//! Narrow interfaces to the external collaborators. The engine consumes
//! these; it never looks behind them.

use std::time::Duration;

use anyhow::Result;
use image::RgbImage;

use crate::catalog::RawRecord;
use crate::embedding::Embedding;
use crate::matcher::Verdict;

/// Obtains the query embedding from the outside world (camera, file, ...).
///
/// At most one embedding per invocation; `None` means no face was found
/// before the deadline.
pub trait QueryCapture {
    fn capture(&mut self, timeout: Duration) -> Result<Option<Embedding>>;
}

/// The opaque face-embedding model: one embedding per detected face,
/// possibly none. Used identically for query and stored images.
pub trait EmbeddingExtractor {
    fn extract(&self, image: &RgbImage) -> Result<Vec<Embedding>>;
}

/// Read-only access to the stored face records.
pub trait RecordStore {
    fn fetch_all(&self, timeout: Duration) -> Result<Vec<RawRecord>>;
}

/// Renders one verdict to the operator.
pub trait ReportSink {
    fn report(&mut self, verdict: &Verdict) -> Result<()>;
}
