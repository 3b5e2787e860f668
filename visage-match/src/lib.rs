pub mod capability;
pub mod catalog;
pub mod embedding;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod session;

// Re-export commonly used types
pub use capability::{EmbeddingExtractor, QueryCapture, RecordStore, ReportSink};
pub use catalog::{Catalog, CatalogEntry, RawRecord};
pub use embedding::Embedding;
pub use error::MatchError;
pub use loader::{FacePolicy, Loader};
pub use matcher::Verdict;
pub use session::{Session, SessionConfig, State};
