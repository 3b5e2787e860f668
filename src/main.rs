use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use visage::capture::ImageFileCapture;
use visage::config;
use visage::extract::ExecExtractor;
use visage::report::LogReport;
use visage::store::FileStore;
use visage::{EmbeddingExtractor, Loader, Session};

#[derive(Parser)]
#[command(name = "visage")]
#[command(version, about = "Identify a face against a catalog of enrolled faces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the face in an image against the enrolled catalog
    Identify {
        /// Query photograph
        #[arg(short, long)]
        image: PathBuf,
        /// Override the configured match tolerance
        #[arg(short, long)]
        tolerance: Option<f32>,
    },
    /// Enroll a face image under a label
    Enroll {
        #[arg(short, long)]
        image: PathBuf,
        /// Person's name
        #[arg(short, long)]
        label: String,
    },
    /// Import a JSON manifest of {name, image} documents
    Import {
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// List enrolled faces
    List,
    /// Remove all enrolled faces
    Purge,
    /// Open config file in editor
    Config,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load_config(None)?;

    match cli.command {
        Commands::Identify { image, tolerance } => {
            if let Some(tolerance) = tolerance {
                cfg.tolerance = tolerance;
            }
            cfg.validate()?;
            identify(&cfg, &image)
        }
        Commands::Enroll { image, label } => enroll(&cfg, &image, label),
        Commands::Import { manifest } => import(&cfg, &manifest),
        Commands::List => list(&cfg),
        Commands::Purge => purge(&cfg),
        Commands::Config => open_config(),
    }
}

fn identify(cfg: &config::Config, image: &Path) -> Result<()> {
    let extractor = ExecExtractor::new(&cfg.extractor);
    let capture = ImageFileCapture::new(image, extractor.clone(), cfg.face_policy());
    let store = FileStore::new(&cfg.store);
    let loader = Loader::new(extractor, cfg.face_policy());

    let mut session = Session::new(capture, store, loader, LogReport, cfg.session());
    session.run()?;
    Ok(())
}

fn enroll(cfg: &config::Config, image: &Path, label: String) -> Result<()> {
    info!("Enrolling {}", label);

    let payload =
        std::fs::read(image).with_context(|| format!("reading {}", image.display()))?;
    let decoded = image::load_from_memory(&payload)
        .with_context(|| format!("decoding {}", image.display()))?
        .to_rgb8();

    // Refuse to store an image the extractor cannot use later
    let extractor = ExecExtractor::new(&cfg.extractor);
    let faces = extractor.extract(&decoded).context("extracting face")?;
    match faces.len() {
        0 => anyhow::bail!("no face found in {}", image.display()),
        1 => {}
        n => {
            if cfg.reject_multi_face {
                anyhow::bail!("{} faces found in {}", n, image.display());
            }
            warn!("{} faces found in {}, storing anyway", n, image.display());
        }
    }

    let store = FileStore::new(&cfg.store);
    store
        .append(Some(label.clone()), payload)
        .context("saving face record")?;

    info!("✓ Face enrolled for {}", label);
    Ok(())
}

fn import(cfg: &config::Config, manifest: &Path) -> Result<()> {
    let store = FileStore::new(&cfg.store);
    let imported = store
        .import_manifest(manifest)
        .context("importing manifest")?;
    info!("✓ Imported {} face record(s)", imported);
    Ok(())
}

fn list(cfg: &config::Config) -> Result<()> {
    let store = FileStore::new(&cfg.store);
    let faces = store.entries().context("reading face records")?;

    if faces.is_empty() {
        info!("No enrolled faces");
        return Ok(());
    }
    for face in faces {
        info!("{}  {}", face.id, face.label.as_deref().unwrap_or("Unknown"));
    }
    Ok(())
}

fn purge(cfg: &config::Config) -> Result<()> {
    let store = FileStore::new(&cfg.store);
    store.purge().context("purging face records")?;
    info!("✓ All enrolled faces removed");
    Ok(())
}

fn open_config() -> Result<()> {
    let config_path = config::CONFIG_PATH.as_os_str();
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    info!("Opening config file: {:?}", config_path);

    let status = std::process::Command::new(editor)
        .arg(config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        anyhow::bail!("Editor exited with non-zero status");
    }

    Ok(())
}
