//! JSON bodies returned by `/predict`.
//!
//! Item fields are decoded leniently: a missing or mistyped field becomes
//! `None` instead of failing the whole body, because a sentinel-only reply is
//! rendered safe no matter what its nested fields hold. Whether a missing
//! field matters is decided later, during classification.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// `url` value the backend uses when no URL could be extracted.
pub const NO_URLS_FOUND: &str = "No URLs found";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicCheck {
    #[serde(default, deserialize_with = "lenient")]
    pub result: Option<String>,
}

/// One per-URL finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisItem {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    /// `None` only when the key is absent or null; any other non-object value
    /// is kept as a check with no result.
    #[serde(default, deserialize_with = "heuristic")]
    pub heuristic_check: Option<HeuristicCheck>,
    /// Older backends spell the key `safe_Browse_check`.
    #[serde(default, alias = "safe_Browse_check", deserialize_with = "lenient")]
    pub safe_browsing_check: Option<String>,
}

impl AnalysisItem {
    pub fn is_no_urls_sentinel(&self) -> bool {
        self.url.as_deref() == Some(NO_URLS_FOUND)
    }
}

/// Decoded `/predict` body: the result sequence, or any JSON object.
///
/// An object carries a backend error only when `error` is a non-empty string;
/// objects without one (including the `{result, is_phishing}` shape) hold no
/// findings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Results(Vec<AnalysisItem>),
    Object(serde_json::Map<String, serde_json::Value>),
}

impl PredictResponse {
    /// Backend-reported error text, if the body is an object with a non-empty `error`.
    pub fn error(&self) -> Option<&str> {
        match self {
            PredictResponse::Object(fields) => fields
                .get("error")
                .and_then(serde_json::Value::as_str)
                .filter(|e| !e.is_empty()),
            PredictResponse::Results(_) => None,
        }
    }
}

/// Decode a response body. Anything that is neither an object nor an array of objects is an error.
pub fn decode(body: &[u8]) -> Result<PredictResponse, serde_json::Error> {
    serde_json::from_slice(body)
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn heuristic<'de, D>(deserializer: D) -> Result<Option<HeuristicCheck>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        other => Some(serde_json::from_value(other).unwrap_or_default()),
    })
}
