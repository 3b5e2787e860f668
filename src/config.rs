use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use visage_match::{FacePolicy, SessionConfig};

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| {
    if let Some(path) = option_env!("VISAGE_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    match ProjectDirs::from("", "", "visage") {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from("/usr/local/etc/visage/config.toml"),
    }
});

pub static DEFAULT_STORE: Lazy<PathBuf> = Lazy::new(|| {
    if let Some(path) = option_env!("VISAGE_STORE_PREFIX") {
        return PathBuf::from(path);
    }
    match ProjectDirs::from("", "", "visage") {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => PathBuf::from("/usr/local/etc/visage"),
    }
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the face record store
    pub store: PathBuf,
    /// Exclusive upper bound on the match distance
    pub tolerance: f32,
    /// External command turning an image path into embeddings
    pub extractor: String,
    /// Skip images with more than one face instead of taking the first
    pub reject_multi_face: bool,
    pub capture_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: DEFAULT_STORE.clone(),
            tolerance: 0.6,
            extractor: "face-embed".to_string(),
            reject_multi_face: false,
            capture_timeout_secs: 10,
            fetch_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            anyhow::bail!(
                "tolerance must be a finite non-negative distance, got {}",
                self.tolerance
            );
        }
        Ok(())
    }

    pub fn face_policy(&self) -> FacePolicy {
        if self.reject_multi_face {
            FacePolicy::Reject
        } else {
            FacePolicy::FirstDetected
        }
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            tolerance: self.tolerance,
            capture_timeout: Duration::from_secs(self.capture_timeout_secs),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.unwrap_or(&CONFIG_PATH);
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config at {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let path = path.unwrap_or(&CONFIG_PATH);
    let data = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let cfg = Config {
            tolerance: -0.1,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_finite_tolerance_is_rejected() {
        let cfg = Config {
            tolerance: f32::NAN,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let cfg = Config {
            tolerance: 0.45,
            reject_multi_face: true,
            ..Config::default()
        };
        let raw = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&raw).unwrap();
        assert_eq!(back.tolerance, 0.45);
        assert!(back.reject_multi_face);
        assert_eq!(back.store, cfg.store);
    }

    #[test]
    fn multi_face_flag_selects_policy() {
        let mut cfg = Config::default();
        assert_eq!(cfg.face_policy(), FacePolicy::FirstDetected);
        cfg.reject_multi_face = true;
        assert_eq!(cfg.face_policy(), FacePolicy::Reject);
    }
}
