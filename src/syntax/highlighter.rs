//! Highlight orchestration
//!
//! The editor shell calls into this module every time its text changes.
//! `Highlighter` is the synchronous entry point and remembers its last
//! pass; `BackgroundHighlighter` moves passes onto a worker thread and
//! drops passes for snapshots that have already been superseded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::matcher::{match_spans, match_spans_until, resolve_runs, run_pass, HighlightConfig, DEFAULT_FONT_SIZE};
use super::style::{Span, StyleRun};
use super::theme::Theme;
use crate::error::Result;

/// Highlight `text` with `theme` at the default font size
pub fn highlight(text: &str, theme: &Theme) -> Vec<Span> {
    run_pass(text, theme, DEFAULT_FONT_SIZE, || false).unwrap_or_default()
}

/// Result of the last pass, reused while text and config are unchanged
struct LastPass {
    text: String,
    spans: Vec<Span>,
}

/// Synchronous highlighter owned by an editor shell
pub struct Highlighter {
    config: HighlightConfig,
    last: Option<LastPass>,
}

impl Highlighter {
    /// Create a highlighter with the given config
    pub fn new(config: HighlightConfig) -> Self {
        Self { config, last: None }
    }

    /// Current config
    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Switch theme
    pub fn set_theme(&mut self, theme: Theme) {
        if self.config.theme != theme {
            self.config.theme = theme;
            self.invalidate();
        }
    }

    /// Change the base font size
    pub fn set_font_size(&mut self, font_size: u16) {
        if self.config.font_size != font_size {
            self.config.font_size = font_size;
            self.invalidate();
        }
    }

    /// Forget the remembered pass
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Highlight a snapshot of the document
    pub fn highlight(&mut self, text: &str) -> Vec<Span> {
        if let Some(last) = self.last.as_ref().filter(|last| last.text == text) {
            return last.spans.clone();
        }
        let spans = match_spans(text, &self.config);
        self.last = Some(LastPass {
            text: text.to_string(),
            spans: spans.clone(),
        });
        spans
    }

    /// Highlight a snapshot and resolve it into style runs
    pub fn highlight_runs(&mut self, text: &str) -> Vec<StyleRun> {
        let spans = self.highlight(text);
        resolve_runs(text.len(), &spans)
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(HighlightConfig::default())
    }
}

/// Spans computed for one submitted snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightResult {
    /// Generation returned by `BackgroundHighlighter::submit`
    pub generation: u64,
    pub spans: Vec<Span>,
}

enum Request {
    Configure(HighlightConfig),
    Highlight { generation: u64, text: String },
}

/// Highlighter running passes on a worker thread
///
/// Every submission gets a new generation number. Queued snapshots are
/// coalesced so only the newest is highlighted, and a pass still running
/// when a newer snapshot arrives is abandoned between rules. The newest
/// snapshot is always highlighted eventually.
pub struct BackgroundHighlighter {
    requests: Option<Sender<Request>>,
    results: Receiver<HighlightResult>,
    latest: Arc<AtomicU64>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundHighlighter {
    /// Start the worker thread
    pub fn spawn(config: HighlightConfig) -> Result<Self> {
        let (request_tx, request_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let latest = Arc::new(AtomicU64::new(0));

        let worker_latest = Arc::clone(&latest);
        let worker = thread::Builder::new()
            .name("mdtint-highlight".into())
            .spawn(move || worker_loop(config, request_rx, result_tx, worker_latest))?;

        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            latest,
            worker: Some(worker),
        })
    }

    /// Queue a snapshot for highlighting, returning its generation
    pub fn submit(&self, text: impl Into<String>) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        self.send(Request::Highlight {
            generation,
            text: text.into(),
        });
        generation
    }

    /// Replace the config used for passes that start after this call
    pub fn configure(&self, config: HighlightConfig) {
        self.send(Request::Configure(config));
    }

    /// Generation of the newest submission (0 before the first)
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Take the result for the newest submission if it is ready
    pub fn try_recv(&self) -> Option<HighlightResult> {
        let mut found = None;
        while let Ok(result) = self.results.try_recv() {
            if self.is_current(&result) {
                found = Some(result);
            }
        }
        found
    }

    /// Wait up to `timeout` for the result of the newest submission
    pub fn recv_latest(&self, timeout: Duration) -> Option<HighlightResult> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.results.recv_timeout(remaining) {
                Ok(result) if self.is_current(&result) => return Some(result),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    fn is_current(&self, result: &HighlightResult) -> bool {
        result.generation == self.latest_generation()
    }

    fn send(&self, request: Request) {
        let Some(requests) = &self.requests else {
            return;
        };
        if requests.send(request).is_err() {
            tracing::warn!("highlight worker has stopped");
        }
    }
}

impl Drop for BackgroundHighlighter {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(
    mut config: HighlightConfig,
    requests: Receiver<Request>,
    results: Sender<HighlightResult>,
    latest: Arc<AtomicU64>,
) {
    while let Ok(first) = requests.recv() {
        // Drain the queue: apply every config change, keep only the newest text
        let mut pending = None;
        for request in std::iter::once(first).chain(requests.try_iter()) {
            match request {
                Request::Configure(new_config) => config = new_config,
                Request::Highlight { generation, text } => pending = Some((generation, text)),
            }
        }
        let Some((generation, text)) = pending else {
            continue;
        };

        let is_stale = || latest.load(Ordering::Acquire) != generation;
        if is_stale() {
            continue;
        }
        match match_spans_until(&text, &config, is_stale) {
            Some(spans) => {
                if results.send(HighlightResult { generation, spans }).is_err() {
                    break;
                }
            }
            None => tracing::trace!(generation, "superseded pass dropped"),
        }
    }
}
