//! CLI command handlers. Each command is in its own file.

mod completions;
mod scan;

pub use completions::{run_completions, run_man};
pub use scan::{read_stdin, run_scan, Submission};
