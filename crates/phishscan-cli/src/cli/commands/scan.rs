//! `phishscan url|text|file` – submit to `/predict` and print the results panel.

use anyhow::{Context, Result};
use phishscan_core::config::ScanConfig;
use phishscan_core::{CurlTransport, Dispatcher, Outcome, ScanKind};
use std::io::Read;
use std::path::PathBuf;

/// Raw form values as given on the command line, before local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Url(String),
    Text(String),
    File(Option<PathBuf>),
}

impl Submission {
    fn kind(&self) -> ScanKind {
        match self {
            Submission::Url(_) => ScanKind::Url,
            Submission::Text(_) => ScanKind::Text,
            Submission::File(_) => ScanKind::File,
        }
    }
}

pub fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("read text from stdin")?;
    Ok(text)
}

/// What to print for an outcome, and the exit code.
#[derive(Debug, Default, PartialEq, Eq)]
struct Report {
    stdout: Option<String>,
    stderr: Option<String>,
    code: i32,
}

fn report(outcome: &Outcome, html: bool) -> Report {
    let panel_text = |panel: &phishscan_core::panel::ResultsPanel| {
        if html {
            format!("{}\n", panel.render_html())
        } else {
            panel.render_text()
        }
    };
    match outcome {
        Outcome::Alert(alert) => Report {
            stderr: Some(alert.to_string()),
            code: 1,
            ..Report::default()
        },
        Outcome::Busy(kind) => Report {
            stderr: Some(format!("a {} scan is already in progress", kind)),
            code: 1,
            ..Report::default()
        },
        Outcome::Verdict { panel, .. } => Report {
            stdout: Some(panel_text(panel)),
            code: 0,
            ..Report::default()
        },
        Outcome::BackendError { panel, .. } | Outcome::Failed { panel } => Report {
            stdout: Some(panel_text(panel)),
            code: 1,
            ..Report::default()
        },
        Outcome::Superseded => Report {
            code: 1,
            ..Report::default()
        },
    }
}

pub async fn run_scan(cfg: &ScanConfig, submission: Submission, html: bool) -> Result<i32> {
    let transport = CurlTransport::new(cfg)?;
    tracing::info!(endpoint = %transport.endpoint(), "using analysis backend");
    let dispatcher = Dispatcher::new(transport).with_request_timeout(cfg.request_timeout());

    let mut panel_rx = dispatcher.subscribe();
    let loading = tokio::spawn(async move {
        while panel_rx.changed().await.is_ok() {
            if panel_rx.borrow_and_update().is_loading() {
                eprintln!("Analyzing...");
            }
        }
    });

    let kind = submission.kind();
    let submit = async {
        match submission {
            Submission::Url(url) => dispatcher.submit_url(&url).await,
            Submission::Text(text) => dispatcher.submit_text(&text).await,
            Submission::File(path) => dispatcher.submit_file(path.as_deref()).await,
        }
    };
    tokio::pin!(submit);
    let outcome = tokio::select! {
        outcome = &mut submit => outcome,
        _ = tokio::signal::ctrl_c() => {
            if dispatcher.cancel(kind) {
                eprintln!("Cancelling...");
            }
            submit.await
        }
    };
    loading.abort();

    let report = report(&outcome, html);
    if let Some(out) = &report.stdout {
        print!("{}", out);
    }
    if let Some(err) = &report.stderr {
        eprintln!("{}", err);
    }
    Ok(report.code)
}
