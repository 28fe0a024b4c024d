//! Safe/suspicious classification and the fixed verdict messages.

use crate::error::ScanError;
use crate::request::ScanKind;
use crate::response::AnalysisItem;

const SUSPICIOUS_HEURISTIC: &str = "Suspicious";
const UNSAFE_PREFIX: &str = "Unsafe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Suspicious,
}

impl Verdict {
    pub fn is_suspicious(self) -> bool {
        self == Verdict::Suspicious
    }

    /// CSS class of the rendered paragraph.
    pub fn css_class(self) -> &'static str {
        match self {
            Verdict::Safe => "safe",
            Verdict::Suspicious => "phishing",
        }
    }
}

/// Classify a result sequence.
///
/// Empty sequences and sequences whose first item carries the no-URLs
/// sentinel are safe without looking further. Otherwise every item is
/// visited: an item is suspicious if its heuristic result is exactly
/// `"Suspicious"` or its safe-browsing check starts with `"Unsafe"`. The
/// safe-browsing field is only required when the heuristic did not already
/// flag the item. A missing or null `heuristic_check` is always an error; a
/// non-object one just never matches.
pub fn classify(items: &[AnalysisItem]) -> Result<Verdict, ScanError> {
    let Some(first) = items.first() else {
        return Ok(Verdict::Safe);
    };
    if first.is_no_urls_sentinel() {
        return Ok(Verdict::Safe);
    }

    let mut suspicious = false;
    for (index, item) in items.iter().enumerate() {
        let heuristic = item
            .heuristic_check
            .as_ref()
            .ok_or(ScanError::MalformedItem {
                index,
                field: "heuristic_check",
            })?;
        let flagged = heuristic.result.as_deref() == Some(SUSPICIOUS_HEURISTIC)
            || item
                .safe_browsing_check
                .as_deref()
                .ok_or(ScanError::MalformedItem {
                    index,
                    field: "safe_browsing_check",
                })?
                .starts_with(UNSAFE_PREFIX);
        suspicious |= flagged;
    }

    Ok(if suspicious {
        Verdict::Suspicious
    } else {
        Verdict::Safe
    })
}

/// The message shown for a submission kind and verdict.
pub fn message(kind: ScanKind, verdict: Verdict) -> &'static str {
    match (kind, verdict) {
        (ScanKind::Url, Verdict::Suspicious) => "🔴 Phishing link found with red alerts",
        (ScanKind::Url, Verdict::Safe) => "🟢 Safe link found with green safe sign",
        (ScanKind::Text, Verdict::Suspicious) => "🔴 Spam text with red alerts",
        (ScanKind::Text, Verdict::Safe) => "🟢 Not spam with green safe sign",
        (ScanKind::File, Verdict::Suspicious) => "🔴 File is injected or suspicious links found",
        (ScanKind::File, Verdict::Safe) => "🟢 File is clean",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{HeuristicCheck, NO_URLS_FOUND};

    fn item(url: &str, heuristic: &str, safe_browsing: &str) -> AnalysisItem {
        AnalysisItem {
            url: Some(url.to_string()),
            heuristic_check: Some(HeuristicCheck {
                result: Some(heuristic.to_string()),
            }),
            safe_browsing_check: Some(safe_browsing.to_string()),
        }
    }

    #[test]
    fn empty_sequence_is_safe() {
        assert_eq!(classify(&[]).unwrap(), Verdict::Safe);
    }

    #[test]
    fn sentinel_first_is_safe_regardless_of_fields() {
        let flagged = item(NO_URLS_FOUND, "Suspicious", "Unsafe");
        assert_eq!(classify(&[flagged]).unwrap(), Verdict::Safe);

        let bare = AnalysisItem {
            url: Some(NO_URLS_FOUND.to_string()),
            ..AnalysisItem::default()
        };
        assert_eq!(classify(&[bare]).unwrap(), Verdict::Safe);
    }

    #[test]
    fn heuristic_flag_is_suspicious() {
        let items = [item("http://example.com", "Suspicious", "Safe")];
        assert_eq!(classify(&items).unwrap(), Verdict::Suspicious);
    }

    #[test]
    fn safe_browsing_prefix_is_suspicious() {
        let items = [
            item("http://a.example", "Clean", "Safe"),
            item("http://b.example", "Clean", "Unsafe - SOCIAL_ENGINEERING"),
        ];
        assert_eq!(classify(&items).unwrap(), Verdict::Suspicious);
    }

    #[test]
    fn heuristic_match_is_exact() {
        let items = [item("http://a.example", "suspicious", "Safe, not Unsafe")];
        assert_eq!(classify(&items).unwrap(), Verdict::Safe);
    }

    #[test]
    fn all_clean_is_safe() {
        let items = [
            item("http://a.example", "Clean", "Safe"),
            item("http://b.example", "Not Suspicious", "Safe"),
        ];
        assert_eq!(classify(&items).unwrap(), Verdict::Safe);
    }

    #[test]
    fn later_sentinel_is_classified_like_any_item() {
        let items = [
            item("http://a.example", "Clean", "Safe"),
            item(NO_URLS_FOUND, "Suspicious", "Safe"),
        ];
        assert_eq!(classify(&items).unwrap(), Verdict::Suspicious);
    }

    #[test]
    fn missing_heuristic_object_is_malformed() {
        let mut broken = item("http://a.example", "Clean", "Safe");
        broken.heuristic_check = None;
        let items = [item("http://ok.example", "Suspicious", "Safe"), broken];
        assert!(matches!(
            classify(&items),
            Err(ScanError::MalformedItem {
                index: 1,
                field: "heuristic_check"
            })
        ));
    }

    #[test]
    fn non_object_heuristic_falls_through_to_safe_browsing() {
        let body = br#"[{"url":"http://a.example","heuristic_check":"n/a","safe_browsing_check":"Unsafe"}]"#;
        let items = match crate::response::decode(body).unwrap() {
            crate::response::PredictResponse::Results(items) => items,
            other => panic!("expected Results, got {:?}", other),
        };
        assert_eq!(classify(&items).unwrap(), Verdict::Suspicious);

        let mut clean = items[0].clone();
        clean.safe_browsing_check = Some("Safe".to_string());
        assert_eq!(classify(&[clean]).unwrap(), Verdict::Safe);
    }

    #[test]
    fn missing_safe_browsing_only_matters_when_heuristic_is_clean() {
        let mut flagged = item("http://a.example", "Suspicious", "");
        flagged.safe_browsing_check = None;
        assert_eq!(classify(&[flagged]).unwrap(), Verdict::Suspicious);

        let mut clean = item("http://a.example", "Clean", "");
        clean.safe_browsing_check = None;
        assert!(matches!(
            classify(&[clean]),
            Err(ScanError::MalformedItem {
                field: "safe_browsing_check",
                ..
            })
        ));
    }

    #[test]
    fn six_fixed_messages() {
        assert_eq!(
            message(ScanKind::Url, Verdict::Suspicious),
            "🔴 Phishing link found with red alerts"
        );
        assert_eq!(
            message(ScanKind::Url, Verdict::Safe),
            "🟢 Safe link found with green safe sign"
        );
        assert_eq!(
            message(ScanKind::Text, Verdict::Suspicious),
            "🔴 Spam text with red alerts"
        );
        assert_eq!(
            message(ScanKind::Text, Verdict::Safe),
            "🟢 Not spam with green safe sign"
        );
        assert_eq!(
            message(ScanKind::File, Verdict::Suspicious),
            "🔴 File is injected or suspicious links found"
        );
        assert_eq!(message(ScanKind::File, Verdict::Safe), "🟢 File is clean");
    }

    #[test]
    fn css_classes() {
        assert_eq!(Verdict::Safe.css_class(), "safe");
        assert_eq!(Verdict::Suspicious.css_class(), "phishing");
    }
}
