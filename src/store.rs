use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::warn;
use serde::{Deserialize, Serialize};
use visage_match::{RawRecord, RecordStore};

/// One enrolled face as kept on disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredFace {
    pub id: String,
    pub label: Option<String>,
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

/// Manifest document as exported from the selfie database: the image travels
/// base64-encoded under the `image` key.
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    name: Option<String>,
    image: String,
}

/// Postcard-on-disk record store: all faces live in one `faces.bin` under
/// the configured directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file(&self) -> PathBuf {
        self.root.join("faces.bin")
    }

    pub fn entries(&self) -> Result<Vec<StoredFace>> {
        let file = self.file();

        if !file.exists() {
            return Ok(vec![]);
        }

        let data = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
        Ok(postcard::from_bytes(&data)?)
    }

    fn write(&self, faces: &[StoredFace]) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let data = postcard::to_allocvec(faces)?;
        std::fs::write(self.file(), data)?;
        Ok(())
    }

    pub fn append(&self, label: Option<String>, payload: Vec<u8>) -> Result<()> {
        let mut faces = self.entries()?;
        faces.push(StoredFace {
            id: uuid::Uuid::new_v4().to_string(),
            label,
            payload,
        });
        self.write(&faces)
    }

    /// Ingest a JSON array of `{ "name": ..., "image": "<base64>" }`
    /// documents. Entries with unusable image data are skipped with a
    /// diagnostic; returns how many were imported.
    pub fn import_manifest(&self, path: &Path) -> Result<usize> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let entries: Vec<ManifestEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing manifest {}", path.display()))?;

        let mut faces = self.entries()?;
        let mut imported = 0;
        for entry in entries {
            match BASE64.decode(entry.image.as_bytes()) {
                Ok(payload) => {
                    faces.push(StoredFace {
                        id: uuid::Uuid::new_v4().to_string(),
                        label: entry.name,
                        payload,
                    });
                    imported += 1;
                }
                Err(e) => {
                    warn!(
                        "skipping {}: bad base64 image data: {}",
                        entry.name.as_deref().unwrap_or("Unknown"),
                        e
                    );
                }
            }
        }
        self.write(&faces)?;
        Ok(imported)
    }

    pub fn purge(&self) -> Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)
                .with_context(|| format!("removing {}", self.root.display()))?;
        }
        Ok(())
    }
}

impl RecordStore for FileStore {
    // Local disk reads; the timeout only matters for remote stores.
    fn fetch_all(&self, _timeout: Duration) -> Result<Vec<RawRecord>> {
        Ok(self
            .entries()?
            .into_iter()
            .map(|face| RawRecord {
                label: face.label,
                payload: face.payload,
            })
            .collect())
    }
}
