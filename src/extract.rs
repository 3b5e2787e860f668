use std::process::Command;

use anyhow::{Context, Result};
use image::{DynamicImage, RgbImage};
use visage_match::{Embedding, EmbeddingExtractor};

/// Embedding extraction through an external command.
///
/// The pixel buffer is handed over as a temporary PNG path; the command
/// prints a JSON array of float vectors to stdout, one per detected face.
#[derive(Debug, Clone)]
pub struct ExecExtractor {
    program: String,
}

impl ExecExtractor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl EmbeddingExtractor for ExecExtractor {
    fn extract(&self, image: &RgbImage) -> Result<Vec<Embedding>> {
        let path = std::env::temp_dir().join(format!("visage-{}.png", uuid::Uuid::new_v4()));
        DynamicImage::ImageRgb8(image.clone())
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;

        let output = Command::new(&self.program)
            .arg(&path)
            .output()
            .with_context(|| format!("running extractor {}", self.program));
        let _ = std::fs::remove_file(&path);
        let output = output?;

        if !output.status.success() {
            anyhow::bail!(
                "extractor {} failed ({}): {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let vectors: Vec<Vec<f32>> =
            serde_json::from_slice(&output.stdout).context("parsing extractor output")?;
        Ok(vectors.into_iter().map(Embedding::new).collect())
    }
}
