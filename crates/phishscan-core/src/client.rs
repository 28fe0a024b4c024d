//! HTTP transport for `/predict`.
//!
//! Uses the curl crate (libcurl) to send one multipart POST per submission.
//! No retries and no redirects. The transfer polls an abort token from the
//! progress callback so an in-flight request can be cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::request::ScanRequest;

/// Raw reply: status code and body bytes, undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a submission and returns the reply. Blocking; the dispatcher runs it under `spawn_blocking`.
pub trait Transport: Send + Sync + 'static {
    fn post(&self, request: &ScanRequest, abort: &AtomicBool) -> Result<HttpReply, ScanError>;
}

/// libcurl-backed transport.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    endpoint: url::Url,
    connect_timeout: Duration,
    user_agent: Option<String>,
}

impl CurlTransport {
    pub fn new(cfg: &ScanConfig) -> Result<Self> {
        Ok(Self {
            endpoint: cfg.predict_url()?,
            connect_timeout: cfg.connect_timeout(),
            user_agent: cfg.user_agent.clone(),
        })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

fn build_form(request: &ScanRequest) -> Result<curl::easy::Form, ScanError> {
    let mut form = curl::easy::Form::new();
    let field = request.kind().field_name();
    match request {
        ScanRequest::Url(value) | ScanRequest::Text(value) => {
            form.part(field).contents(value.as_bytes()).add()?;
        }
        ScanRequest::File { filename, contents } => {
            form.part(field)
                .buffer(filename.as_str(), contents.clone())
                .content_type("application/octet-stream")
                .add()?;
        }
    }
    Ok(form)
}

impl Transport for CurlTransport {
    fn post(&self, request: &ScanRequest, abort: &AtomicBool) -> Result<HttpReply, ScanError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(self.endpoint.as_str())?;
        easy.connect_timeout(self.connect_timeout)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }

        // Suppress `Expect: 100-continue` so larger uploads go out in one round trip.
        let mut list = curl::easy::List::new();
        list.append("Expect:")?;
        easy.http_headers(list)?;

        easy.httppost(build_form(request)?)?;
        easy.progress(true)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.progress_function(|_, _, _, _| !abort.load(Ordering::Relaxed))?;
            transfer.perform().map_err(ScanError::from_curl)?;
        }

        let status = easy.response_code()?;
        tracing::debug!(
            endpoint = %self.endpoint,
            status,
            bytes = body.len(),
            "predict reply received"
        );
        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_from_config() {
        let t = CurlTransport::new(&ScanConfig::default()).unwrap();
        assert_eq!(t.endpoint().as_str(), "http://127.0.0.1:5000/predict");
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        let mut cfg = ScanConfig::default();
        cfg.server_url = "::not-a-url".to_string();
        assert!(CurlTransport::new(&cfg).is_err());
    }

    #[test]
    fn reply_success_range() {
        let ok = HttpReply {
            status: 200,
            body: Vec::new(),
        };
        let bad = HttpReply {
            status: 500,
            body: Vec::new(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }

    #[test]
    fn forms_build_for_every_kind() {
        assert!(build_form(&ScanRequest::url("http://example.com")).is_ok());
        assert!(build_form(&ScanRequest::text("hello").unwrap()).is_ok());
        let file = ScanRequest::file(Some(("mail.eml".to_string(), b"body".to_vec()))).unwrap();
        assert!(build_form(&file).is_ok());
    }
}
