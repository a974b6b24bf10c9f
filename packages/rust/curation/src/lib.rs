//! Curation: validate and normalize raw scored items into [`CuratedEntry`].
//!
//! The collector and scorer emit loosely-typed JSON objects; this crate is
//! the gate between those and the compact schema the renderer and the site
//! generator consume. Malformed or incomplete items are dropped, never
//! defaulted, and nothing in here performs I/O or raises errors.

pub mod topic;

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use dailypaper_shared::{CurationConfig, CuratedEntry, OverflowBehavior, UNCLASSIFIED_TOPIC};

/// Marker appended to truncated translations. Counts against the cap.
const ELLIPSIS: &str = "...";

/// arXiv identifier: 4 digits, dot, 4–5 digits, optional version suffix.
static ARXIV_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}\.\d{4,5}(?:v\d+)?").expect("valid regex"));

/// Fields scanned, in order, when the explicit `arxiv_id` field is absent.
const ID_FALLBACK_FIELDS: [&str; 4] = ["id", "url", "abs_url", "pdf_url"];

// ---------------------------------------------------------------------------
// Curation policy
// ---------------------------------------------------------------------------

/// Translation-length policy applied during normalization.
///
/// The cap and the overflow behavior are an explicit configuration choice:
/// the expanded-card deployment truncates at 900 characters, the compact-card
/// deployment rejects anything over 300.
#[derive(Debug, Clone, Copy)]
pub struct CurationPolicy {
    /// Maximum translation length, in characters (not bytes).
    pub translation_cap: usize,
    /// What happens to an over-length translation.
    pub overflow: OverflowBehavior,
}

impl Default for CurationPolicy {
    fn default() -> Self {
        Self {
            translation_cap: 900,
            overflow: OverflowBehavior::Truncate,
        }
    }
}

impl From<&CurationConfig> for CurationPolicy {
    fn from(config: &CurationConfig) -> Self {
        Self {
            translation_cap: config.translation_cap as usize,
            overflow: config.overflow,
        }
    }
}

impl CurationPolicy {
    /// Apply the cap to a trimmed translation. `None` means the whole item
    /// is rejected (reject-on-overflow policy).
    fn apply(&self, translated: String) -> Option<String> {
        let len = translated.chars().count();
        if len <= self.translation_cap {
            return Some(translated);
        }
        match self.overflow {
            OverflowBehavior::Reject => None,
            OverflowBehavior::Truncate => {
                let keep = self
                    .translation_cap
                    .saturating_sub(ELLIPSIS.chars().count());
                let mut out: String = translated.chars().take(keep).collect();
                out.push_str(ELLIPSIS);
                Some(out)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Validate and normalize one raw scored item.
///
/// Returns `None` when the item is missing a title, an arXiv id, or a
/// non-empty translation after trimming (or when the translation overflows
/// a rejecting policy). Never panics, never errors; the caller drops the
/// `None`s from the output list.
pub fn normalize_entry(item: &Value, policy: &CurationPolicy) -> Option<CuratedEntry> {
    let title = trimmed_field(item, "title")?;

    let arxiv_id = extract_arxiv_id(item)?;

    let translated = trimmed_field(item, "translated_zh")
        .or_else(|| trimmed_field(item, "reasoning"))?;
    let translated = policy.apply(translated)?;

    let topic = match trimmed_field(item, "topic") {
        Some(topic) => topic,
        None => derive_topic(item).to_string(),
    };

    // A zero score counts as unset and falls through to the earlier rounds,
    // matching how the scorer itself backfills its output.
    let score = int_field(item, "score")
        .filter(|&s| s != 0)
        .or_else(|| int_field(item, "second_score").filter(|&s| s != 0))
        .or_else(|| int_field(item, "first_score"))
        .unwrap_or(0)
        .clamp(0, 100);

    let abs_url = trimmed_field(item, "abs_url")
        .unwrap_or_else(|| format!("https://arxiv.org/abs/{arxiv_id}"));
    let pdf_url = trimmed_field(item, "pdf_url")
        .unwrap_or_else(|| format!("https://arxiv.org/pdf/{arxiv_id}.pdf"));

    Some(CuratedEntry {
        title,
        topic,
        score,
        translated_zh: translated,
        arxiv_id,
        abs_url,
        pdf_url,
        // Collector-normalized publication info, for debugging / UX.
        published_at: string_field(item, "publishedAt")
            .or_else(|| string_field(item, "published_at")),
        published_date: string_field(item, "publishedDate")
            .or_else(|| string_field(item, "published_date")),
    })
}

/// Normalize a scored batch, dropping rejects. Input order is preserved —
/// the scorer's ordering is the display order.
pub fn curate_items(items: &[Value], policy: &CurationPolicy) -> Vec<CuratedEntry> {
    let curated: Vec<CuratedEntry> = items
        .iter()
        .filter_map(|raw| normalize_entry(raw, policy))
        .collect();

    debug!(
        input = items.len(),
        curated = curated.len(),
        dropped = items.len() - curated.len(),
        "curation pass complete"
    );

    curated
}

/// Extract an arXiv id: the explicit `arxiv_id` field (trimmed) wins,
/// otherwise scan the id/url fields for the identifier pattern.
pub fn extract_arxiv_id(item: &Value) -> Option<String> {
    if let Some(id) = trimmed_field(item, "arxiv_id") {
        return Some(id);
    }

    for field in ID_FALLBACK_FIELDS {
        if let Some(value) = item.get(field).and_then(Value::as_str) {
            if let Some(m) = ARXIV_ID_RE.find(value) {
                return Some(m.as_str().to_string());
            }
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Topic for an item without an explicit topic field. Items carrying no
/// mapper signal at all stay unclassified rather than being guessed.
fn derive_topic(item: &Value) -> &'static str {
    let categories: Vec<&str> = item
        .get("categories")
        .and_then(Value::as_array)
        .map(|cats| cats.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let title = item.get("title").and_then(Value::as_str).unwrap_or("");

    if categories.is_empty() && title.trim().is_empty() {
        return UNCLASSIFIED_TOPIC;
    }

    topic::map_topic(&categories, title)
}

/// A string field, trimmed; `None` if absent, non-string, or empty.
fn trimmed_field(item: &Value, field: &str) -> Option<String> {
    let s = item.get(field)?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// A string field, verbatim; `None` if absent, non-string, or empty.
fn string_field(item: &Value, field: &str) -> Option<String> {
    let s = item.get(field)?.as_str()?;
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// A numeric field truncated to an integer, matching how the original
/// pipeline coerced scorer output.
fn int_field(item: &Value, field: &str) -> Option<i64> {
    let value = item.get(field)?;
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
