//! File adapters around collector/scorer output and pipeline artifacts.
//!
//! Thin read/parse and serialize/write wrappers. All I/O failures carry
//! the offending path via [`DailyPaperError::Io`].

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use dailypaper_shared::{DailyPaperError, Result};

use crate::bridge::{CollectResponse, ScoreResponse};

/// Read and parse the collector's captured stdout.
pub fn load_collector_output(path: &Path) -> Result<CollectResponse> {
    read_json(path)
}

/// Read and parse the scorer's captured stdout.
pub fn load_scorer_output(path: &Path) -> Result<ScoreResponse> {
    read_json(path)
}

/// Read a JSON file into a typed value.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| DailyPaperError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| DailyPaperError::json(format!("{}: {e}", path.display())))
}

/// Write a value as pretty-printed JSON with a trailing newline,
/// creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, payload: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(payload)
        .map_err(|e| DailyPaperError::json(e.to_string()))?;
    write_text(path, &format!("{json}\n"))
}

/// Write a text file, creating parent directories as needed.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DailyPaperError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| DailyPaperError::io(path, e))
}
