//! Pipeline configuration.
//!
//! Config lives in a project-local `dailypaper.toml` at the pipeline root.
//! Every section and field has a default, so a missing file yields a fully
//! working configuration; `--config` on the CLI overrides the path.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DailyPaperError, Result};

/// Default configuration file name, resolved against the pipeline root.
const CONFIG_FILE_NAME: &str = "dailypaper.toml";

// ---------------------------------------------------------------------------
// Config structs (matching dailypaper.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Collector tool settings.
    #[serde(default)]
    pub collector: CollectorConfig,

    /// Scorer tool settings.
    #[serde(default)]
    pub scorer: ScorerConfig,

    /// Scoring-stage knobs forwarded in the score request.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Curation policy.
    #[serde(default)]
    pub curation: CurationConfig,

    /// Static-site generator settings.
    #[serde(default)]
    pub site: SiteConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Dated JSON/Markdown artifacts directory, relative to the root.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Scratch directory for tool request/response files.
    #[serde(default = "default_tmp_dir")]
    pub tmp_dir: String,

    /// Site branding mode passed to the generator ("paper" or "news").
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Hard timeout for each external tool invocation.
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            tmp_dir: default_tmp_dir(),
            mode: default_mode(),
            tool_timeout_secs: default_tool_timeout_secs(),
        }
    }
}

fn default_output_dir() -> String {
    "output".into()
}
fn default_tmp_dir() -> String {
    ".tmp".into()
}
fn default_mode() -> String {
    "paper".into()
}
fn default_tool_timeout_secs() -> u64 {
    600
}

/// `[collector]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Interpreter command (e.g., "node").
    #[serde(default = "default_tool_command")]
    pub command: String,

    /// Collector script path.
    #[serde(default = "default_collector_script")]
    pub script: String,

    /// Request mode identifier the collector must echo back.
    #[serde(default = "default_collector_mode")]
    pub mode: String,

    /// Cap on how many items the collector is asked for.
    #[serde(default = "default_collector_max_items")]
    pub max_items: u32,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            command: default_tool_command(),
            script: default_collector_script(),
            mode: default_collector_mode(),
            max_items: default_collector_max_items(),
        }
    }
}

fn default_tool_command() -> String {
    "node".into()
}
fn default_collector_script() -> String {
    "tools/news-collector/scripts/arxiv_collect.js".into()
}
fn default_collector_mode() -> String {
    "paper_v0".into()
}
fn default_collector_max_items() -> u32 {
    50
}

/// `[scorer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Interpreter command (e.g., "node").
    #[serde(default = "default_tool_command")]
    pub command: String,

    /// Scorer script path.
    #[serde(default = "default_scorer_script")]
    pub script: String,

    /// Request mode identifier.
    #[serde(default = "default_scorer_mode")]
    pub mode: String,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            command: default_tool_command(),
            script: default_scorer_script(),
            mode: default_scorer_mode(),
        }
    }
}

fn default_scorer_script() -> String {
    "tools/news-scorer/scripts/score.mjs".into()
}
fn default_scorer_mode() -> String {
    "score_v0".into()
}

/// `[scoring]` section — forwarded verbatim (camelCased) in the score
/// request so the scorer no longer reads ambient environment knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// How many collected items enter first-round scoring.
    #[serde(default = "default_scoring_max_items")]
    pub max_items: u32,

    /// How many first-round-scored items proceed to the second round.
    #[serde(default = "default_scoring_top_k")]
    pub top_k: u32,

    /// Minimum first-round score to qualify for the second round.
    #[serde(default = "default_score_threshold")]
    pub score_threshold: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_items: default_scoring_max_items(),
            top_k: default_scoring_top_k(),
            score_threshold: default_score_threshold(),
        }
    }
}

fn default_scoring_max_items() -> u32 {
    30
}
fn default_scoring_top_k() -> u32 {
    10
}
fn default_score_threshold() -> u32 {
    85
}

/// `[curation]` section.
///
/// Two deployments of the original pipeline diverged here: a 900-char
/// truncating cap for expanded web cards and a 300-char rejecting cap for
/// compact cards. Both are expressed through this one config instead of
/// being hardcoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationConfig {
    /// Maximum translation length in characters.
    #[serde(default = "default_translation_cap")]
    pub translation_cap: u32,

    /// What to do with an over-length translation: "truncate" or "reject".
    #[serde(default = "default_overflow")]
    pub overflow: OverflowBehavior,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            translation_cap: default_translation_cap(),
            overflow: default_overflow(),
        }
    }
}

/// Over-length translation handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowBehavior {
    /// Cut to the cap and append an ellipsis marker.
    Truncate,
    /// Drop the whole item.
    Reject,
}

fn default_translation_cap() -> u32 {
    900
}
fn default_overflow() -> OverflowBehavior {
    OverflowBehavior::Truncate
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Interpreter command (e.g., "node").
    #[serde(default = "default_tool_command")]
    pub command: String,

    /// Generator script path.
    #[serde(default = "default_site_script")]
    pub script: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            command: default_tool_command(),
            script: default_site_script(),
        }
    }
}

fn default_site_script() -> String {
    "web/generate.js".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the config from `<root>/dailypaper.toml`.
/// Returns defaults if the file does not exist.
pub fn load_config(root: &Path) -> Result<AppConfig> {
    let path = root.join(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DailyPaperError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        DailyPaperError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("score_threshold"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.collector.mode, "paper_v0");
        assert_eq!(parsed.scoring.max_items, 30);
        assert_eq!(parsed.scoring.top_k, 10);
        assert_eq!(parsed.scoring.score_threshold, 85);
    }

    #[test]
    fn defaults_match_original_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.defaults.output_dir, "output");
        assert_eq!(config.defaults.tmp_dir, ".tmp");
        assert_eq!(config.defaults.mode, "paper");
        assert_eq!(config.collector.max_items, 50);
        assert_eq!(config.curation.translation_cap, 900);
        assert_eq!(config.curation.overflow, OverflowBehavior::Truncate);
    }

    #[test]
    fn compact_card_variant_parses() {
        let toml_str = r#"
[curation]
translation_cap = 300
overflow = "reject"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.curation.translation_cap, 300);
        assert_eq!(config.curation.overflow, OverflowBehavior::Reject);
        // Untouched sections still default.
        assert_eq!(config.scorer.mode, "score_v0");
    }

    #[test]
    fn unknown_overflow_value_is_rejected() {
        let toml_str = r#"
[curation]
overflow = "discard"
"#;
        assert!(toml::from_str::<AppConfig>(toml_str).is_err());
    }
}
