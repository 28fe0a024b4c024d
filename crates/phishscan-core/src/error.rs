//! Error types for submissions.
//!
//! `InputError` is raised locally before any request is sent. `ScanError`
//! covers everything after that; all of its variants collapse into the same
//! generic user-facing message, the detail only goes to the log.

use std::path::PathBuf;

/// Submission rejected before any request was sent.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Please paste text to analyze.")]
    EmptyText,
    #[error("Please select a file to analyze.")]
    NoFileSelected,
    #[error("could not read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    /// Blocking alert text for the user. Read errors are not alerts, they are reported as failures.
    pub fn alert(&self) -> Option<&'static str> {
        match self {
            InputError::EmptyText => Some("Please paste text to analyze."),
            InputError::NoFileSelected => Some("Please select a file to analyze."),
            InputError::ReadFile { .. } => None,
        }
    }
}

/// Failure of the request/response cycle.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Curl reported an error (connection refused, DNS, timeout, etc.).
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
    /// Multipart body could not be built.
    #[error("multipart form: {0}")]
    Form(#[from] curl::FormError),
    /// Non-2xx status whose body was not a backend error object.
    #[error("HTTP {0}")]
    Http(u32),
    /// Body was not JSON or not a predict response.
    #[error("decode response: {0}")]
    Decode(#[from] serde_json::Error),
    /// A result item lacked a field needed for classification.
    #[error("result item {index}: missing {field}")]
    MalformedItem { index: usize, field: &'static str },
    /// Request aborted through `Dispatcher::cancel`.
    #[error("request cancelled")]
    Cancelled,
    /// Exchange exceeded the configured request timeout.
    #[error("request timed out")]
    TimedOut,
    /// Blocking transfer task panicked or was dropped.
    #[error("transfer task: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ScanError {
    /// Classify a curl error raised while the abort token was set or the timeout hit.
    pub(crate) fn from_curl(e: curl::Error) -> Self {
        if e.is_aborted_by_callback() {
            ScanError::Cancelled
        } else if e.is_operation_timedout() {
            ScanError::TimedOut
        } else {
            ScanError::Transport(e)
        }
    }
}
