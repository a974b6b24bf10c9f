//! Shared types, error model, and configuration for the daily-paper pipeline.
//!
//! This crate is the foundation depended on by all other dailypaper crates.
//! It provides:
//! - [`DailyPaperError`] — the unified error type
//! - The persisted record type ([`CuratedEntry`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CollectorConfig, CurationConfig, DefaultsConfig, OverflowBehavior, ScorerConfig,
    ScoringConfig, SiteConfig, load_config, load_config_from,
};
pub use error::{DailyPaperError, Result};
pub use types::{CuratedEntry, UNCLASSIFIED_TOPIC};
