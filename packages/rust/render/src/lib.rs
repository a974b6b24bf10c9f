//! Markdown digest rendering.
//!
//! Turns a day's curated entries into the `{date}.md` artifact. Pure
//! formatting: entries are assumed already curated, and input order is
//! display order — the scorer decided the ranking, not the renderer.

use dailypaper_shared::CuratedEntry;

/// Render the daily Markdown digest for a run date.
///
/// Layout: a level-1 heading with the run date, then one numbered
/// level-2 section per entry with fixed-label lines for topic, score,
/// summary, and the abs/pdf links. Each section ends with a blank
/// separator line, the last one included, so the string ends with a
/// single `\n` whenever any entry is rendered.
pub fn render_daily_markdown(run_date: &str, entries: &[CuratedEntry]) -> String {
    let mut lines = vec![format!("# Daily Paper {run_date}"), String::new()];

    for (i, entry) in entries.iter().enumerate() {
        lines.push(format!("## {}. {}", i + 1, entry.title));
        lines.push(format!("- 主题: {}", entry.topic));
        lines.push(format!("- 评分: {}", entry.score));
        lines.push(format!("- 摘要: {}", entry.translated_zh));
        lines.push(format!("- abs: {}", entry.abs_url));
        lines.push(format!("- pdf: {}", entry.pdf_url));
        lines.push(String::new());
    }

    lines.join("\n")
}
