//! CLI for the phishscan analysis client.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use phishscan_core::config::{self, ScanConfig};
use std::path::PathBuf;

use commands::{run_completions, run_man, run_scan, Submission};

/// Top-level CLI for phishscan.
#[derive(Debug, Parser)]
#[command(name = "phishscan")]
#[command(about = "phishscan: check URLs, text and files against a phishing analysis backend", long_about = None)]
pub struct Cli {
    /// Base URL of the analysis backend (overrides `server_url` in config.toml).
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Give up on the backend after SECS seconds (default: wait indefinitely).
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print the results as an HTML fragment instead of plain text.
    #[arg(long, global = true)]
    pub html: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Check a single URL.
    Url {
        /// URL to analyze (sent as is).
        url: String,
    },

    /// Check pasted text (e.g. an email or SMS body) for spam and phishing links.
    Text {
        /// Text to analyze.
        text: Option<String>,

        /// Read the text from standard input.
        #[arg(long, conflicts_with = "text")]
        stdin: bool,
    },

    /// Check the contents of a file.
    File {
        /// Path of the file to upload.
        path: Option<PathBuf>,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    fn apply_overrides(&self, mut cfg: ScanConfig) -> ScanConfig {
        if let Some(server) = &self.server {
            cfg.server_url = server.clone();
        }
        if let Some(secs) = self.timeout {
            cfg.request_timeout_secs = Some(secs);
        }
        cfg
    }
}

impl CliCommand {
    /// Parse arguments and run. Returns the process exit code.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();

        let submission = match &cli.command {
            CliCommand::Completions { shell } => {
                run_completions(*shell);
                return Ok(0);
            }
            CliCommand::Man => {
                run_man()?;
                return Ok(0);
            }
            CliCommand::Url { url } => Submission::Url(url.clone()),
            CliCommand::Text { text, stdin } => {
                let text = if *stdin {
                    commands::read_stdin()?
                } else {
                    text.clone().unwrap_or_default()
                };
                Submission::Text(text)
            }
            CliCommand::File { path } => Submission::File(path.clone()),
        };

        let cfg = cli.apply_overrides(config::load_or_init()?);
        tracing::debug!("loaded config: {:?}", cfg);

        run_scan(&cfg, submission, cli.html).await
    }
}

#[cfg(test)]
mod tests;
