//! Pipeline orchestration for daily-paper.
//!
//! This crate ties together the external collector and scorer, curation,
//! Markdown rendering, and the site-build trigger into the end-to-end
//! `run_daily` workflow.

pub mod adapters;
pub mod bridge;
pub mod pipeline;
