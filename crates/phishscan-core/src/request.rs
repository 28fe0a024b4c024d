//! Submission payloads for `/predict`.
//!
//! A `ScanRequest` carries exactly one of the three form fields and its
//! `ScanKind` tag, so the verdict message is chosen from the tag rather than
//! from which field happens to be present.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::InputError;

/// Which submit path produced a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanKind {
    Url,
    Text,
    File,
}

impl ScanKind {
    /// Multipart field name the backend reads for this kind.
    pub fn field_name(self) -> &'static str {
        match self {
            ScanKind::Url => "url",
            ScanKind::Text => "text_input",
            ScanKind::File => "file",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScanKind::Url => "url",
            ScanKind::Text => "text",
            ScanKind::File => "file",
        };
        f.write_str(s)
    }
}

/// One submission. Exactly one field shape per request, never mixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRequest {
    Url(String),
    Text(String),
    File { filename: String, contents: Vec<u8> },
}

impl ScanRequest {
    /// URL submissions have no local emptiness guard.
    pub fn url(value: impl Into<String>) -> Self {
        ScanRequest::Url(value.into())
    }

    /// Rejects empty or whitespace-only text. The text itself is sent untrimmed.
    pub fn text(value: impl Into<String>) -> Result<Self, InputError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(InputError::EmptyText);
        }
        Ok(ScanRequest::Text(value))
    }

    /// Builds a file submission from in-memory contents. `None` means no file was selected.
    pub fn file(selected: Option<(String, Vec<u8>)>) -> Result<Self, InputError> {
        match selected {
            Some((filename, contents)) => Ok(ScanRequest::File { filename, contents }),
            None => Err(InputError::NoFileSelected),
        }
    }

    /// Reads the selected file from disk. `None` means no file was selected.
    pub fn file_from_path(path: Option<&Path>) -> Result<Self, InputError> {
        let path = path.ok_or(InputError::NoFileSelected)?;
        let contents = std::fs::read(path).map_err(|source| InputError::ReadFile {
            path: PathBuf::from(path),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());
        tracing::debug!(file = %path.display(), bytes = contents.len(), "file selected for scan");
        Ok(ScanRequest::File { filename, contents })
    }

    pub fn kind(&self) -> ScanKind {
        match self {
            ScanRequest::Url(_) => ScanKind::Url,
            ScanRequest::Text(_) => ScanKind::Text,
            ScanRequest::File { .. } => ScanKind::File,
        }
    }

    /// Size of the payload body in bytes (for logging).
    pub fn payload_len(&self) -> usize {
        match self {
            ScanRequest::Url(s) | ScanRequest::Text(s) => s.len(),
            ScanRequest::File { contents, .. } => contents.len(),
        }
    }
}
