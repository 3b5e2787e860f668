use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{debug, info};

use crate::capability::{EmbeddingExtractor, QueryCapture, RecordStore, ReportSink};
use crate::loader::Loader;
use crate::matcher::{self, Verdict};

/// Per-session settings, passed in explicitly at construction.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Exclusive upper bound on the match distance
    pub tolerance: f32,
    pub capture_timeout: Duration,
    pub fetch_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.6,
            capture_timeout: Duration::from_secs(10),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// Where a session currently is. `Aborted` is terminal, reached when capture
/// yields no face or the record store is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Capturing,
    Loading,
    Matching,
    Reported,
    Aborted,
}

/// One identification run: capture the query embedding, build the catalog,
/// decide, report.
///
/// A session runs exactly once end-to-end; retrying means constructing a new
/// session with fresh capture and load steps. Nothing is cached across runs.
pub struct Session<C, S, E, R> {
    capture: C,
    store: S,
    loader: Loader<E>,
    sink: R,
    config: SessionConfig,
    state: State,
}

impl<C, S, E, R> Session<C, S, E, R>
where
    C: QueryCapture,
    S: RecordStore,
    E: EmbeddingExtractor,
    R: ReportSink,
{
    pub fn new(capture: C, store: S, loader: Loader<E>, sink: R, config: SessionConfig) -> Self {
        Self {
            capture,
            store,
            loader,
            sink,
            config,
            state: State::Idle,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn run(&mut self) -> Result<Verdict> {
        if self.state != State::Idle {
            bail!("session already ran; start a new one");
        }

        self.state = State::Capturing;
        debug!("capturing query embedding");
        let query = match self.capture.capture(self.config.capture_timeout) {
            Ok(Some(embedding)) => embedding,
            Ok(None) => {
                self.state = State::Aborted;
                bail!("no face detected");
            }
            Err(e) => {
                self.state = State::Aborted;
                return Err(e.context("capture failed"));
            }
        };

        self.state = State::Loading;
        debug!("loading stored faces");
        let records = match self.store.fetch_all(self.config.fetch_timeout) {
            Ok(records) => records,
            Err(e) => {
                self.state = State::Aborted;
                return Err(e.context("record store unreachable"));
            }
        };
        let catalog = self.loader.load(&records);
        info!("catalog holds {} face(s)", catalog.len());

        self.state = State::Matching;
        let verdict = matcher::identify(&catalog, &query, self.config.tolerance)?;

        self.sink.report(&verdict).context("reporting verdict")?;
        self.state = State::Reported;
        Ok(verdict)
    }
}
