pub mod config;
pub mod logging;

pub mod client;
pub mod control;
pub mod dispatcher;
pub mod error;
pub mod panel;
pub mod request;
pub mod response;
pub mod verdict;

pub use client::{CurlTransport, HttpReply, Transport};
pub use dispatcher::{Dispatcher, Outcome};
pub use error::{InputError, ScanError};
pub use request::{ScanKind, ScanRequest};
pub use verdict::Verdict;
