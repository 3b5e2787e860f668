pub mod capture;
pub mod config;
pub mod extract;
pub mod report;
pub mod store;

// Re-export engine types for convenience
pub use visage_match::{
    Catalog, CatalogEntry, Embedding, EmbeddingExtractor, FacePolicy, Loader, MatchError,
    QueryCapture, RawRecord, RecordStore, ReportSink, Session, SessionConfig, State, Verdict,
};
