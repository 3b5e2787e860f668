use log::warn;

use crate::capability::EmbeddingExtractor;
use crate::catalog::{Catalog, CatalogEntry, RawRecord};

/// What to do with an image containing more than one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacePolicy {
    /// Keep the first detected face, ignore the rest
    FirstDetected,
    /// Skip the image entirely
    Reject,
}

/// Builds a catalog out of raw stored records: decode each image payload,
/// run it through the extraction capability, keep the result in record
/// order.
///
/// Bad records (undecodable payload, extraction failure, no face) are
/// skipped with a diagnostic naming the record; they never fail the load.
pub struct Loader<E> {
    extractor: E,
    policy: FacePolicy,
}

impl<E: EmbeddingExtractor> Loader<E> {
    pub fn new(extractor: E, policy: FacePolicy) -> Self {
        Self { extractor, policy }
    }

    pub fn load(&self, records: &[RawRecord]) -> Catalog {
        let mut catalog = Catalog::new();
        for record in records {
            let label = record
                .label
                .clone()
                .unwrap_or_else(|| "Unknown".to_string());

            let image = match image::load_from_memory(&record.payload) {
                Ok(img) => img.to_rgb8(),
                Err(e) => {
                    warn!("skipping {}: undecodable image: {}", label, e);
                    continue;
                }
            };

            let mut embeddings = match self.extractor.extract(&image) {
                Ok(embeddings) => embeddings,
                Err(e) => {
                    warn!("skipping {}: extraction failed: {:#}", label, e);
                    continue;
                }
            };

            let embedding = match embeddings.len() {
                0 => {
                    warn!("no face found in {}'s image, skipping", label);
                    continue;
                }
                1 => embeddings.remove(0),
                n => match self.policy {
                    FacePolicy::FirstDetected => embeddings.remove(0),
                    FacePolicy::Reject => {
                        warn!("{} faces found in {}'s image, skipping", n, label);
                        continue;
                    }
                },
            };

            catalog.push(CatalogEntry { label, embedding });
        }
        catalog
    }
}
