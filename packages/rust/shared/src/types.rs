//! Core domain types for the daily-paper pipeline.

use serde::{Deserialize, Serialize};

/// Topic label for entries the curator could not attribute any signal to.
pub const UNCLASSIFIED_TOPIC: &str = "未分类";

// ---------------------------------------------------------------------------
// CuratedEntry
// ---------------------------------------------------------------------------

/// The validated, public-facing record persisted to the day's snapshot.
///
/// Raw collector and scorer items stay loosely typed
/// (`serde_json::Value`) and live only inside one run; a `CuratedEntry`
/// exists only if title, arXiv id, and a non-empty translation all
/// survived trimming. The site generator consumes the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedEntry {
    /// Paper title, trimmed, non-empty.
    pub title: String,

    /// One of the five fixed topic labels (or [`UNCLASSIFIED_TOPIC`]).
    pub topic: String,

    /// Relevance score, clamped to 0–100.
    pub score: i64,

    /// Chinese summary, capped at the configured character budget.
    pub translated_zh: String,

    /// arXiv identifier (e.g., `2502.01234` or `2502.01234v2`).
    pub arxiv_id: String,

    /// Abstract page URL (passthrough or derived from the id).
    pub abs_url: String,

    /// PDF URL (passthrough or derived from the id).
    pub pdf_url: String,

    /// Publication timestamp, normalized by the collector. Debug/UX only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    /// Publication date, normalized by the collector. Debug/UX only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serialization_roundtrip() {
        let entry = CuratedEntry {
            title: "Chiplet-aware NPU scheduling".into(),
            topic: "芯片与硬件架构".into(),
            score: 88,
            translated_zh: "摘要".into(),
            arxiv_id: "2502.01234".into(),
            abs_url: "https://arxiv.org/abs/2502.01234".into(),
            pdf_url: "https://arxiv.org/pdf/2502.01234.pdf".into(),
            published_at: None,
            published_date: Some("2026-02-19".into()),
        };

        let json = serde_json::to_string_pretty(&entry).expect("serialize");
        let parsed: CuratedEntry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, entry);
        // Absent optional fields stay out of the persisted artifact.
        assert!(!json.contains("published_at"));
    }

    #[test]
    fn entry_parses_without_optional_fields() {
        let json = r#"{
            "title": "T",
            "topic": "模型与学习算法",
            "score": 0,
            "translated_zh": "a",
            "arxiv_id": "2502.01234",
            "abs_url": "https://arxiv.org/abs/2502.01234",
            "pdf_url": "https://arxiv.org/pdf/2502.01234.pdf"
        }"#;
        let parsed: CuratedEntry = serde_json::from_str(json).expect("deserialize");
        assert_eq!(parsed.published_at, None);
        assert_eq!(parsed.published_date, None);
    }
}
