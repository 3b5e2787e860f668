use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use visage_match::{Embedding, EmbeddingExtractor, FacePolicy, QueryCapture};

use crate::extract::ExecExtractor;

/// Query capture from a photograph on disk.
///
/// Decodes the file, runs the extractor on a worker thread bounded by the
/// capture timeout, and yields at most one embedding per the multi-face
/// policy.
pub struct ImageFileCapture {
    path: PathBuf,
    extractor: ExecExtractor,
    policy: FacePolicy,
}

impl ImageFileCapture {
    pub fn new(path: impl Into<PathBuf>, extractor: ExecExtractor, policy: FacePolicy) -> Self {
        Self {
            path: path.into(),
            extractor,
            policy,
        }
    }
}

impl QueryCapture for ImageFileCapture {
    fn capture(&mut self, timeout: Duration) -> Result<Option<Embedding>> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let image = image::load_from_memory(&bytes)
            .with_context(|| format!("decoding {}", self.path.display()))?
            .to_rgb8();

        let extractor = self.extractor.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(extractor.extract(&image));
        });

        let mut embeddings = match rx.recv_timeout(timeout) {
            Ok(result) => result?,
            Err(_) => anyhow::bail!("capture timed out after {:?}", timeout),
        };

        match embeddings.len() {
            0 => Ok(None),
            1 => Ok(Some(embeddings.remove(0))),
            n => match self.policy {
                FacePolicy::FirstDetected => {
                    info!("{} faces in query image, using the first", n);
                    Ok(Some(embeddings.remove(0)))
                }
                FacePolicy::Reject => anyhow::bail!("{} faces in query image", n),
            },
        }
    }
}
