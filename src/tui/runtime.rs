//! Run dispatch and TUI application state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{info, warn};

use crate::analysis::AnalysisResult;
use crate::client::{AepBackend, RunError};
use crate::io::export::export_csv;
use crate::view::AnalysisView;

/// Spinner frames shown on the busy trigger label.
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

type Outcome = Result<AnalysisResult, RunError>;

/// TUI application state.
pub struct App<B: AepBackend> {
    /// Run state and render model.
    pub view: AnalysisView,
    backend: Arc<B>,
    runtime: Handle,
    /// Receiver for the in-flight run, if any.
    pending: Option<oneshot::Receiver<Outcome>>,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the last tick was processed.
    pub last_tick: Instant,
    /// Ticks elapsed while loading, drives the spinner.
    spinner_idx: usize,
    /// CSV destination for the save key.
    export_path: Option<PathBuf>,
    /// One-line feedback from the last export attempt.
    pub notice: Option<String>,
}

impl<B: AepBackend> App<B> {
    /// Creates an idle app that spawns runs on `runtime`.
    pub fn new(backend: Arc<B>, runtime: Handle, export_path: Option<PathBuf>) -> Self {
        Self {
            view: AnalysisView::new(),
            backend,
            runtime,
            pending: None,
            quit: false,
            last_tick: Instant::now(),
            spinner_idx: 0,
            export_path,
            notice: None,
        }
    }

    /// Starts a run unless one is already in flight.
    pub fn trigger(&mut self) {
        if !self.view.begin_run() {
            return;
        }
        self.notice = None;
        self.spinner_idx = 0;

        let (tx, rx) = oneshot::channel();
        let backend = Arc::clone(&self.backend);
        self.runtime.spawn(async move {
            let outcome = backend.run_aep().await;
            // The receiver is gone if the app quit mid-run.
            let _ = tx.send(outcome);
        });
        self.pending = Some(rx);
    }

    /// Applies the outcome of the in-flight run once it has arrived.
    pub fn poll(&mut self) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => Err(RunError::Transport(
                "run task ended without a response".to_string(),
            )),
        };
        self.pending = None;
        self.view.complete(outcome);
    }

    /// Advances per-tick animation.
    pub fn tick(&mut self) {
        if self.view.is_loading() {
            self.spinner_idx = (self.spinner_idx + 1) % SPINNER.len();
        }
    }

    /// Current spinner frame.
    pub fn spinner(&self) -> &'static str {
        SPINNER[self.spinner_idx]
    }

    /// Whether a run is awaiting its outcome.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Writes the current distribution to the configured export path.
    pub fn save(&mut self) {
        let Some(path) = self.export_path.clone() else {
            self.notice = Some("no export path configured".to_string());
            return;
        };
        let Some(result) = self.view.result() else {
            self.notice = Some("nothing to export yet".to_string());
            return;
        };
        self.notice = Some(match export_csv(result, &path) {
            Ok(()) => {
                info!(path = %path.display(), "distribution exported");
                format!("saved {}", path.display())
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                e.to_string()
            }
        });
    }
}
