//! Results panel: the only owner of loading/results visibility and content.
//!
//! Every transition of a submission goes through one of `begin`,
//! `show_backend_error`, `show_verdict` or `fail`. The panel can be rendered
//! as terminal text or as the HTML fragment a web front end would insert.

use std::fmt::Write as _;

use crate::request::ScanKind;
use crate::verdict::{self, Verdict};

pub const RESULTS_HEADING: &str = "Analysis Results";

/// Shown for transport, decode and classification failures.
pub const GENERIC_FAILURE: &str = "An error occurred while analyzing the data.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Backend-reported error text, verbatim.
    BackendError(String),
    Verdict { kind: ScanKind, verdict: Verdict },
    /// Replaces the whole panel, heading included.
    Failure,
}

impl Entry {
    pub fn text(&self) -> &str {
        match self {
            Entry::BackendError(msg) => msg,
            Entry::Verdict { kind, verdict } => verdict::message(*kind, *verdict),
            Entry::Failure => GENERIC_FAILURE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsPanel {
    loading_visible: bool,
    results_visible: bool,
    heading: bool,
    entries: Vec<Entry>,
    /// Sequence number of the submission the panel currently reflects (0 = none yet).
    submission: u64,
}

impl ResultsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading_visible
    }

    pub fn is_results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn submission(&self) -> u64 {
        self.submission
    }

    /// Reset to heading-only, hide results, show loading.
    pub fn begin(&mut self, submission: u64) {
        self.submission = submission;
        self.heading = true;
        self.entries.clear();
        self.results_visible = false;
        self.loading_visible = true;
    }

    pub fn show_backend_error(&mut self, message: &str) {
        self.reveal();
        self.entries.push(Entry::BackendError(message.to_string()));
    }

    pub fn show_verdict(&mut self, kind: ScanKind, verdict: Verdict) {
        self.reveal();
        self.entries.push(Entry::Verdict { kind, verdict });
    }

    /// Replace the panel with the generic failure message.
    pub fn fail(&mut self) {
        self.reveal();
        self.heading = false;
        self.entries.clear();
        self.entries.push(Entry::Failure);
    }

    fn reveal(&mut self) {
        self.loading_visible = false;
        self.results_visible = true;
    }

    /// Plain-text rendering for terminals. Empty while results are hidden.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if !self.results_visible {
            return out;
        }
        if self.heading {
            out.push_str(RESULTS_HEADING);
            out.push('\n');
        }
        for entry in &self.entries {
            out.push_str(entry.text());
            out.push('\n');
        }
        out
    }

    /// HTML fragment equivalent to the results container's inner markup.
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        if self.heading {
            let _ = write!(out, "<h2>{}</h2>", RESULTS_HEADING);
        }
        for entry in &self.entries {
            match entry {
                Entry::BackendError(msg) => {
                    let _ = write!(out, "<p class=\"error\">{}</p>", escape_html(msg));
                }
                Entry::Verdict { kind, verdict } => {
                    let _ = write!(
                        out,
                        "<div class=\"result-item\"><p class=\"{}\">{}</p></div>",
                        verdict.css_class(),
                        verdict::message(*kind, *verdict)
                    );
                }
                Entry::Failure => {
                    let _ = write!(out, "<p class=\"error\">{}</p>", GENERIC_FAILURE);
                }
            }
        }
        out
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
