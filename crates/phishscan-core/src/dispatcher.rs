//! Submission dispatcher: three submit paths funnelling into one send routine.
//!
//! `submit_url`, `submit_text` and `submit_file` check their local
//! precondition and hand an explicit `ScanRequest` to `send`, which owns the
//! request/response/render cycle:
//!
//! 1. reset the panel to heading-only, show loading
//! 2. one POST to `/predict` (no retry)
//! 3. decode JSON, hide loading, show results
//! 4. backend error text, or classification and one of six messages
//!
//! Transport, decode and classification failures all end in the generic
//! failure message; the cause is only logged.
//!
//! Panel state lives in a `watch` channel so every transition is applied
//! under one lock and front ends can observe it. Each submission is stamped
//! with a sequence number; a completion that is no longer the newest
//! submission leaves the panel alone.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::client::{HttpReply, Transport};
use crate::control::InFlight;
use crate::error::ScanError;
use crate::panel::{Entry, ResultsPanel};
use crate::request::{ScanKind, ScanRequest};
use crate::response::{self, PredictResponse};
use crate::verdict::{self, Verdict};

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rejected locally; no request was sent.
    Alert(&'static str),
    /// A submission of the same kind is still in flight.
    Busy(ScanKind),
    /// Verdict rendered.
    Verdict {
        kind: ScanKind,
        verdict: Verdict,
        panel: ResultsPanel,
    },
    /// Backend returned `{error}`; its text was rendered.
    BackendError { message: String, panel: ResultsPanel },
    /// Generic failure rendered.
    Failed { panel: ResultsPanel },
    /// A newer submission owns the panel; nothing was rendered.
    Superseded,
}

impl Outcome {
    pub fn panel(&self) -> Option<&ResultsPanel> {
        match self {
            Outcome::Verdict { panel, .. }
            | Outcome::BackendError { panel, .. }
            | Outcome::Failed { panel } => Some(panel),
            _ => None,
        }
    }
}

/// What a decoded reply asks the panel to show.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Interpretation {
    BackendError(String),
    Verdict(Verdict),
}

fn interpret(reply: HttpReply) -> Result<Interpretation, ScanError> {
    let decoded = response::decode(&reply.body);
    if !reply.is_success() {
        // Only non-empty `{error}` text survives a non-2xx status.
        return match decoded.as_ref().ok().and_then(PredictResponse::error) {
            Some(error) => Ok(Interpretation::BackendError(error.to_string())),
            None => Err(ScanError::Http(reply.status)),
        };
    }
    let decoded = decoded?;
    if let Some(error) = decoded.error() {
        return Ok(Interpretation::BackendError(error.to_string()));
    }
    match decoded {
        PredictResponse::Results(items) => {
            tracing::debug!(items = items.len(), "classifying predict results");
            Ok(Interpretation::Verdict(verdict::classify(&items)?))
        }
        PredictResponse::Object(_) => {
            tracing::debug!("object reply without error text; no findings");
            Ok(Interpretation::Verdict(Verdict::Safe))
        }
    }
}

pub struct Dispatcher<T: Transport> {
    transport: Arc<T>,
    panel: watch::Sender<ResultsPanel>,
    in_flight: InFlight,
    request_timeout: Option<Duration>,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        let (panel, _) = watch::channel(ResultsPanel::new());
        Self {
            transport: Arc::new(transport),
            panel,
            in_flight: InFlight::new(),
            request_timeout: None,
        }
    }

    /// Bound each exchange; None waits for the backend indefinitely.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Observe every panel transition (loading shown, result rendered, ...).
    pub fn subscribe(&self) -> watch::Receiver<ResultsPanel> {
        self.panel.subscribe()
    }

    /// Current panel state.
    pub fn panel(&self) -> ResultsPanel {
        self.panel.borrow().clone()
    }

    pub fn is_busy(&self, kind: ScanKind) -> bool {
        self.in_flight.is_busy(kind)
    }

    /// Abort the in-flight submission of `kind`, if any.
    pub fn cancel(&self, kind: ScanKind) -> bool {
        let cancelled = self.in_flight.cancel(kind);
        if cancelled {
            tracing::info!(%kind, "cancel requested");
        }
        cancelled
    }

    /// URL form: no local emptiness guard.
    pub async fn submit_url(&self, url: &str) -> Outcome {
        self.send(ScanRequest::url(url)).await
    }

    /// Text form: blank text raises an alert and sends nothing.
    pub async fn submit_text(&self, text: &str) -> Outcome {
        match ScanRequest::text(text) {
            Ok(request) => self.send(request).await,
            Err(e) => self.reject(ScanKind::Text, e),
        }
    }

    /// File form: no selection raises an alert and sends nothing.
    pub async fn submit_file(&self, path: Option<&Path>) -> Outcome {
        match ScanRequest::file_from_path(path) {
            Ok(request) => self.send(request).await,
            Err(e) => self.reject(ScanKind::File, e),
        }
    }

    fn reject(&self, kind: ScanKind, e: crate::error::InputError) -> Outcome {
        match e.alert() {
            Some(alert) => {
                tracing::debug!(%kind, "submission rejected locally: {}", alert);
                Outcome::Alert(alert)
            }
            None => {
                // Unreadable file: there is a selection, so this is a failed analysis, not an alert.
                tracing::error!(%kind, "submission failed before send: {}", e);
                let seq = self.begin();
                self.finish(seq, |p| p.fail())
                    .map(|panel| Outcome::Failed { panel })
                    .unwrap_or(Outcome::Superseded)
            }
        }
    }

    /// Shared send routine.
    pub async fn send(&self, request: ScanRequest) -> Outcome {
        let kind = request.kind();
        let Some(guard) = self.in_flight.try_begin(kind) else {
            tracing::warn!(%kind, "submission refused: previous request still in flight");
            return Outcome::Busy(kind);
        };

        let seq = self.begin();
        let _unsettled = Unsettled {
            panel: &self.panel,
            seq,
        };
        tracing::info!(%kind, seq, bytes = request.payload_len(), "sending to /predict");

        let transport = Arc::clone(&self.transport);
        let token = guard.token();
        let task = tokio::task::spawn_blocking(move || transport.post(&request, &token));
        let reply = match self.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined.map_err(ScanError::from).and_then(|r| r),
                Err(_) => {
                    guard.abort();
                    Err(ScanError::TimedOut)
                }
            },
            None => task.await.map_err(ScanError::from).and_then(|r| r),
        };
        drop(guard);

        match reply.and_then(interpret) {
            Ok(Interpretation::BackendError(message)) => {
                tracing::info!(%kind, seq, "backend reported error: {}", message);
                self.finish(seq, |p| p.show_backend_error(&message))
                    .map(|panel| Outcome::BackendError { message, panel })
                    .unwrap_or(Outcome::Superseded)
            }
            Ok(Interpretation::Verdict(verdict)) => {
                tracing::info!(%kind, seq, ?verdict, "verdict");
                self.finish(seq, |p| p.show_verdict(kind, verdict))
                    .map(|panel| Outcome::Verdict {
                        kind,
                        verdict,
                        panel,
                    })
                    .unwrap_or(Outcome::Superseded)
            }
            Err(e) => {
                tracing::error!(%kind, seq, "analysis failed: {}", e);
                self.finish(seq, |p| p.fail())
                    .map(|panel| Outcome::Failed { panel })
                    .unwrap_or(Outcome::Superseded)
            }
        }
    }

    /// Start a submission: assign the next sequence number and reset the panel.
    fn begin(&self) -> u64 {
        let mut seq = 0;
        self.panel.send_modify(|p| {
            seq = p.submission() + 1;
            p.begin(seq);
        });
        seq
    }

    /// Apply the final transition if `seq` is still the newest submission.
    fn finish(&self, seq: u64, apply: impl FnOnce(&mut ResultsPanel)) -> Option<ResultsPanel> {
        let mut snapshot = None;
        self.panel.send_if_modified(|p| {
            if p.submission() != seq {
                return false;
            }
            apply(p);
            snapshot = Some(p.clone());
            true
        });
        if snapshot.is_none() {
            tracing::debug!(seq, "completion superseded by a newer submission");
        }
        snapshot
    }
}

/// Fails the panel for `seq` if `send` is dropped before it rendered anything.
struct Unsettled<'a> {
    panel: &'a watch::Sender<ResultsPanel>,
    seq: u64,
}

impl Drop for Unsettled<'_> {
    fn drop(&mut self) {
        let seq = self.seq;
        let failed = self.panel.send_if_modified(|p| {
            if p.submission() != seq || !p.is_loading() {
                return false;
            }
            p.fail();
            true
        });
        if failed {
            tracing::warn!(seq, "submission dropped before completion");
        }
    }
}

/// Text of the single entry in a finished panel, for callers that only need the message.
pub fn rendered_message(panel: &ResultsPanel) -> Option<&str> {
    panel.entries().last().map(Entry::text)
}
