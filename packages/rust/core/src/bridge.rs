//! External tool bridge.
//!
//! The collector, scorer, and site generator are separately-versioned
//! tools invoked as subprocesses with an explicit call contract: a JSON
//! request file goes in via `--input`, a JSON response comes back on
//! stdout. No working-directory tricks or ambient environment knobs —
//! everything a tool needs rides in its request.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::process::Command;
use tracing::{info, warn};

use dailypaper_shared::{DailyPaperError, Result, ScoringConfig};

// ---------------------------------------------------------------------------
// Tool specification
// ---------------------------------------------------------------------------

/// How to invoke one external tool.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Name used in logs and error messages ("collector", "scorer", ...).
    pub name: String,
    /// Interpreter command (e.g., "node").
    pub command: String,
    /// Script path, resolved relative to the pipeline root.
    pub script: String,
}

impl ToolSpec {
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            script: script.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response envelopes (wire format of the original tools)
// ---------------------------------------------------------------------------

/// Request payload for the collector.
#[derive(Debug, Serialize)]
pub struct CollectRequest {
    /// Fixed mode identifier the collector must echo back.
    pub mode: String,
    /// Collector-specific config; empty today, reserved for category overrides.
    pub config: Value,
    /// Run options.
    pub run: CollectRunOptions,
}

/// `run` section of the collect request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectRunOptions {
    /// Cap on how many items the collector returns.
    pub max_items: u32,
}

/// Collector stdout envelope.
#[derive(Debug, Deserialize)]
pub struct CollectResponse {
    /// Mode identifier; must match the request mode.
    #[serde(default)]
    pub mode: String,
    /// Candidate items. A missing list is an empty batch.
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Request payload for the scorer.
#[derive(Debug, Serialize)]
pub struct ScoreRequest {
    /// Fixed mode identifier.
    pub mode: String,
    /// Collected items to score, passed through verbatim.
    pub items: Vec<Value>,
    /// Explicit scoring knobs (replaces the old env-var plumbing).
    pub config: ScoreRequestConfig,
    /// Run options; empty today.
    pub run: Value,
}

/// `config` section of the score request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequestConfig {
    /// How many collected items enter first-round scoring.
    pub max_items: u32,
    /// How many first-round-scored items proceed to the second round.
    pub top_k: u32,
    /// Minimum first-round score to qualify for the second round.
    pub score_threshold: u32,
}

impl From<&ScoringConfig> for ScoreRequestConfig {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            max_items: config.max_items,
            top_k: config.top_k,
            score_threshold: config.score_threshold,
        }
    }
}

/// Scorer stdout envelope.
#[derive(Debug, Deserialize)]
pub struct ScoreResponse {
    /// Enriched items. Absence (unlike emptiness) is a contract breach.
    pub items: Option<Vec<Value>>,
}

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// Invoke a request/response tool and return its raw stdout.
///
/// Failure semantics: nonzero exit with empty stdout is fatal. Nonzero
/// exit *with* stdout is tolerated best-effort — diagnostic noise can
/// accompany a usable result — but logged loudly so a masked failure is
/// visible in the run log.
pub async fn invoke_tool(
    spec: &ToolSpec,
    request_path: &Path,
    root: &Path,
    timeout: Duration,
) -> Result<String> {
    let mut cmd = Command::new(&spec.command);
    cmd.arg(&spec.script)
        .arg("--input")
        .arg(request_path)
        .current_dir(root);

    let output = capture(spec, cmd, timeout).await?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stdout.trim().is_empty() {
            return Err(DailyPaperError::invocation(
                &spec.name,
                format!(
                    "exit={} with no JSON output\nstderr:\n{}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            ));
        }
        warn!(
            tool = %spec.name,
            exit = output.status.code().unwrap_or(-1),
            stderr = %stderr.trim(),
            "tool exited nonzero but produced output, continuing best-effort"
        );
    }

    Ok(stdout)
}

/// Invoke the static-site generator. Unlike the JSON tools, any nonzero
/// exit is fatal: the generator has no partial-output mode.
pub async fn invoke_site_build(
    spec: &ToolSpec,
    mode: &str,
    root: &Path,
    timeout: Duration,
) -> Result<()> {
    let mut cmd = Command::new(&spec.command);
    cmd.arg(&spec.script).arg("--mode").arg(mode).current_dir(root);

    let output = capture(spec, cmd, timeout).await?;

    if !output.status.success() {
        return Err(DailyPaperError::invocation(
            &spec.name,
            format!(
                "exit={}\nstdout:\n{}\nstderr:\n{}",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stdout).trim(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    info!(tool = %spec.name, mode, "site build complete");
    Ok(())
}

/// Run a prepared command to completion under a timeout, capturing output.
async fn capture(
    spec: &ToolSpec,
    mut cmd: Command,
    timeout: Duration,
) -> Result<std::process::Output> {
    info!(tool = %spec.name, command = %spec.command, script = %spec.script, "invoking tool");

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let run = cmd.output();
    match tokio::time::timeout(timeout, run).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(DailyPaperError::invocation(
            &spec.name,
            format!(
                "failed to spawn `{} {}`: {e}. Is `{}` installed?",
                spec.command, spec.script, spec.command
            ),
        )),
        Err(_) => Err(DailyPaperError::invocation(
            &spec.name,
            format!("timed out after {}s", timeout.as_secs()),
        )),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
