//! End-to-end daily run: collect → score → curate → render → build.
//!
//! Fully sequential, no retry, no fan-out. Each stage's output feeds the
//! next; the only blocking operations are the three external tool
//! invocations. File writes are not transactional — a failed run may
//! leave scratch files behind, and a rerun for the same date regenerates
//! every artifact idempotently.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde_json::{Value, json};
use tracing::{info, instrument};

use dailypaper_curation::{CurationPolicy, curate_items};
use dailypaper_render::render_daily_markdown;
use dailypaper_shared::{
    AppConfig, DailyPaperError, DefaultsConfig, Result, ScoringConfig,
};

use crate::adapters;
use crate::bridge::{
    self, CollectRequest, CollectRunOptions, ScoreRequest, ScoreRequestConfig, ToolSpec,
};

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// The five pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Collect,
    Score,
    Curate,
    Render,
    Build,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collect => "collect",
            Self::Score => "score",
            Self::Curate => "curate",
            Self::Render => "render",
            Self::Build => "build",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The execution plan for a run. The sequence is fixed: every run date
/// gets the same five stages, in the same order.
pub fn build_plan(_run_date: &str) -> [Stage; 5] {
    [
        Stage::Collect,
        Stage::Score,
        Stage::Curate,
        Stage::Render,
        Stage::Build,
    ]
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Fixed directory layout under the pipeline root.
#[derive(Debug, Clone)]
pub struct RunPaths {
    /// Pipeline root (tool scripts resolve against this).
    pub root: PathBuf,
    /// Dated JSON/Markdown artifacts.
    pub output_dir: PathBuf,
    /// Static site output, regenerated by the site tool.
    pub site_dir: PathBuf,
    /// Scratch directory for tool request/response files. Not cleaned up.
    pub tmp_dir: PathBuf,
}

impl RunPaths {
    pub fn new(root: &Path, defaults: &DefaultsConfig) -> Self {
        let output_dir = root.join(&defaults.output_dir);
        Self {
            root: root.to_path_buf(),
            site_dir: output_dir.join("site"),
            tmp_dir: root.join(&defaults.tmp_dir),
            output_dir,
        }
    }

    /// Create the output, site, and scratch directories.
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.output_dir, &self.site_dir, &self.tmp_dir] {
            std::fs::create_dir_all(dir).map_err(|e| DailyPaperError::io(dir, e))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Run configuration and report
// ---------------------------------------------------------------------------

/// Everything one daily run needs, resolved up front from [`AppConfig`]
/// plus the CLI's date and mode.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Logical run date (ISO 8601), independent of wall-clock time.
    pub run_date: String,
    /// Site branding mode ("paper" or "news").
    pub mode: String,
    /// Directory layout.
    pub paths: RunPaths,
    /// Collector invocation.
    pub collector: ToolSpec,
    /// Mode identifier the collector must echo back.
    pub collector_mode: String,
    /// Item cap requested from the collector.
    pub collect_max_items: u32,
    /// Scorer invocation.
    pub scorer: ToolSpec,
    /// Mode identifier for the score request.
    pub scorer_mode: String,
    /// Scoring knobs forwarded in the score request.
    pub scoring: ScoringConfig,
    /// Translation cap and overflow behavior.
    pub curation: CurationPolicy,
    /// Site generator invocation.
    pub site: ToolSpec,
    /// Hard per-invocation timeout.
    pub tool_timeout: Duration,
}

impl RunConfig {
    /// Resolve a run configuration from the loaded app config.
    pub fn from_app_config(
        root: &Path,
        run_date: String,
        mode: String,
        config: &AppConfig,
    ) -> Self {
        Self {
            run_date,
            mode,
            paths: RunPaths::new(root, &config.defaults),
            collector: ToolSpec::new(
                "collector",
                &config.collector.command,
                &config.collector.script,
            ),
            collector_mode: config.collector.mode.clone(),
            collect_max_items: config.collector.max_items,
            scorer: ToolSpec::new("scorer", &config.scorer.command, &config.scorer.script),
            scorer_mode: config.scorer.mode.clone(),
            scoring: config.scoring.clone(),
            curation: CurationPolicy::from(&config.curation),
            site: ToolSpec::new("site-build", &config.site.command, &config.site.script),
            tool_timeout: Duration::from_secs(config.defaults.tool_timeout_secs),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct RunReport {
    /// Path to the dated JSON snapshot.
    pub out_json: PathBuf,
    /// Path to the dated Markdown digest.
    pub out_md: PathBuf,
    /// Items returned by the collector.
    pub collected: usize,
    /// Items returned by the scorer.
    pub scored: usize,
    /// Items that survived curation.
    pub curated: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a stage.
    fn stage(&self, stage: Stage);
    /// Called when the run completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn stage(&self, _stage: Stage) {}
    fn done(&self, _report: &RunReport) {}
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Run the full daily pipeline for one date.
#[instrument(skip_all, fields(date = %config.run_date, mode = %config.mode))]
pub async fn run_daily(
    config: &RunConfig,
    progress: &dyn ProgressReporter,
) -> Result<RunReport> {
    let start = Instant::now();
    let date = &config.run_date;
    let paths = &config.paths;

    paths.ensure()?;
    info!(root = %paths.root.display(), "starting daily run");

    let out_json = paths.output_dir.join(format!("{date}.json"));
    let out_md = paths.output_dir.join(format!("{date}.md"));

    let mut collected: Vec<Value> = Vec::new();
    let mut scored: Vec<Value> = Vec::new();
    let mut curated = Vec::new();

    for stage in build_plan(date) {
        progress.stage(stage);
        match stage {
            Stage::Collect => {
                collected = collect_stage(config).await?;
                info!(count = collected.len(), "collect complete");
            }
            Stage::Score => {
                scored = score_stage(config, collected.clone()).await?;
                info!(count = scored.len(), "score complete");
            }
            Stage::Curate => {
                curated = curate_items(&scored, &config.curation);
                adapters::write_json(&out_json, &curated)?;
                info!(count = curated.len(), path = %out_json.display(), "curate complete");
            }
            Stage::Render => {
                let md = render_daily_markdown(date, &curated);
                adapters::write_text(&out_md, &format!("{md}\n"))?;
                info!(path = %out_md.display(), "render complete");
            }
            Stage::Build => {
                bridge::invoke_site_build(
                    &config.site,
                    &config.mode,
                    &paths.root,
                    config.tool_timeout,
                )
                .await?;
            }
        }
    }

    let report = RunReport {
        out_json,
        out_md,
        collected: collected.len(),
        scored: scored.len(),
        curated: curated.len(),
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        collected = report.collected,
        scored = report.scored,
        curated = report.curated,
        elapsed_ms = report.elapsed.as_millis(),
        "daily run complete"
    );

    Ok(report)
}

/// Write the collect request, invoke the collector, persist and parse
/// its stdout, and validate the envelope.
async fn collect_stage(config: &RunConfig) -> Result<Vec<Value>> {
    let date = &config.run_date;
    let request = CollectRequest {
        mode: config.collector_mode.clone(),
        config: json!({}),
        run: CollectRunOptions {
            max_items: config.collect_max_items,
        },
    };

    let request_path = config.paths.tmp_dir.join(format!("collect-{date}.json"));
    let result_path = config
        .paths
        .tmp_dir
        .join(format!("collect-result-{date}.json"));
    adapters::write_json(&request_path, &request)?;

    let stdout = bridge::invoke_tool(
        &config.collector,
        &request_path,
        &config.paths.root,
        config.tool_timeout,
    )
    .await?;
    adapters::write_text(&result_path, &stdout)?;

    let response = adapters::load_collector_output(&result_path)?;
    if response.mode != config.collector_mode {
        return Err(DailyPaperError::validation(format!(
            "unexpected collect result mode {:?} (expected {:?})",
            response.mode, config.collector_mode
        )));
    }

    Ok(response.items)
}

/// Wrap the collected items in a score request, invoke the scorer, and
/// require an items list in the response.
async fn score_stage(config: &RunConfig, items: Vec<Value>) -> Result<Vec<Value>> {
    let date = &config.run_date;
    let request = ScoreRequest {
        mode: config.scorer_mode.clone(),
        items,
        config: ScoreRequestConfig::from(&config.scoring),
        run: json!({}),
    };

    let request_path = config.paths.tmp_dir.join(format!("score-{date}.json"));
    let result_path = config
        .paths
        .tmp_dir
        .join(format!("score-result-{date}.json"));
    adapters::write_json(&request_path, &request)?;

    let stdout = bridge::invoke_tool(
        &config.scorer,
        &request_path,
        &config.paths.root,
        config.tool_timeout,
    )
    .await?;
    adapters::write_text(&result_path, &stdout)?;

    let response = adapters::load_scorer_output(&result_path)?;
    response
        .items
        .ok_or_else(|| DailyPaperError::validation("scorer output missing items list"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dailypaper_shared::CuratedEntry;

    #[test]
    fn plan_contains_five_stages_in_fixed_order() {
        let stages: Vec<&str> = build_plan("2026-02-20")
            .iter()
            .map(Stage::as_str)
            .collect();
        assert_eq!(stages, ["collect", "score", "curate", "render", "build"]);
        // Independent of the run date.
        assert_eq!(build_plan("2026-02-20"), build_plan("1999-12-31"));
    }

    #[test]
    fn run_paths_layout() {
        let defaults = DefaultsConfig::default();
        let paths = RunPaths::new(Path::new("/pipeline"), &defaults);
        assert_eq!(paths.output_dir, Path::new("/pipeline/output"));
        assert_eq!(paths.site_dir, Path::new("/pipeline/output/site"));
        assert_eq!(paths.tmp_dir, Path::new("/pipeline/.tmp"));
    }

    #[test]
    fn ensure_creates_all_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = RunPaths::new(dir.path(), &DefaultsConfig::default());
        paths.ensure().expect("ensure");
        assert!(paths.output_dir.is_dir());
        assert!(paths.site_dir.is_dir());
        assert!(paths.tmp_dir.is_dir());
    }

    // --- End-to-end run against fake shell tools ---

    fn write_script(root: &Path, name: &str, body: &str) -> String {
        let path = root.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        path.to_string_lossy().into_owned()
    }

    fn fake_run_config(root: &Path, collector_body: &str, scorer_body: &str) -> RunConfig {
        let mut config = RunConfig::from_app_config(
            root,
            "2026-02-20".into(),
            "paper".into(),
            &AppConfig::default(),
        );
        config.collector =
            ToolSpec::new("collector", "sh", write_script(root, "collect.sh", collector_body));
        config.scorer = ToolSpec::new("scorer", "sh", write_script(root, "score.sh", scorer_body));
        config.site = ToolSpec::new("site-build", "sh", write_script(root, "site.sh", "exit 0"));
        config.tool_timeout = Duration::from_secs(5);
        config
    }

    #[tokio::test]
    async fn full_run_writes_dated_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let collector = r#"echo '{"mode":"paper_v0","items":[{"title":"T","abstract":"A"}]}'"#;
        // One valid item and one missing its translation; the latter is dropped.
        let scorer = r#"echo '{"items":[{"title":"T","arxiv_id":"2502.01234","translated_zh":"摘要","score":90},{"title":"U","arxiv_id":"2502.09999"}]}'"#;
        let config = fake_run_config(dir.path(), collector, scorer);

        let report = run_daily(&config, &SilentProgress).await.expect("run");
        assert_eq!(report.collected, 1);
        assert_eq!(report.scored, 2);
        assert_eq!(report.curated, 1);

        let snapshot: Vec<CuratedEntry> =
            crate::adapters::read_json(&report.out_json).expect("snapshot parses");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].pdf_url, "https://arxiv.org/pdf/2502.01234.pdf");

        let md = std::fs::read_to_string(&report.out_md).expect("digest");
        assert!(md.contains("# Daily Paper 2026-02-20"));
        assert!(md.contains("## 1. T"));
        // The last section's blank separator line plus the file's final newline.
        assert!(md.ends_with(".pdf\n\n"));

        // Scratch request/response files stay on disk.
        assert!(config.paths.tmp_dir.join("collect-2026-02-20.json").exists());
        assert!(config.paths.tmp_dir.join("score-result-2026-02-20.json").exists());
    }

    struct RecordingProgress(std::sync::Mutex<Vec<&'static str>>);

    impl ProgressReporter for RecordingProgress {
        fn stage(&self, stage: Stage) {
            self.0.lock().unwrap().push(stage.as_str());
        }
        fn done(&self, _report: &RunReport) {}
    }

    #[tokio::test]
    async fn runner_follows_the_plan_stage_for_stage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let collector = r#"echo '{"mode":"paper_v0","items":[]}'"#;
        let scorer = r#"echo '{"items":[]}'"#;
        let config = fake_run_config(dir.path(), collector, scorer);

        let reporter = RecordingProgress(std::sync::Mutex::new(Vec::new()));
        run_daily(&config, &reporter).await.expect("run");

        let expected: Vec<&str> = build_plan("2026-02-20").iter().map(Stage::as_str).collect();
        assert_eq!(*reporter.0.lock().unwrap(), expected);
    }

    #[tokio::test]
    async fn collector_mode_mismatch_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let collector = r#"echo '{"mode":"news_v0","items":[]}'"#;
        let scorer = r#"echo '{"items":[]}'"#;
        let config = fake_run_config(dir.path(), collector, scorer);

        let err = run_daily(&config, &SilentProgress)
            .await
            .expect_err("should fail");
        assert!(matches!(err, DailyPaperError::Validation { .. }));
        assert!(err.to_string().contains("news_v0"));
    }

    #[tokio::test]
    async fn scorer_without_items_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let collector = r#"echo '{"mode":"paper_v0","items":[]}'"#;
        let scorer = r#"echo '{"ok":true}'"#;
        let config = fake_run_config(dir.path(), collector, scorer);

        let err = run_daily(&config, &SilentProgress)
            .await
            .expect_err("should fail");
        assert!(err.to_string().contains("missing items"));
    }

    #[tokio::test]
    async fn artifacts_written_before_a_build_failure_remain() {
        let dir = tempfile::tempdir().expect("tempdir");
        let collector = r#"echo '{"mode":"paper_v0","items":[]}'"#;
        let scorer =
            r#"echo '{"items":[{"title":"T","arxiv_id":"2502.01234","translated_zh":"摘要"}]}'"#;
        let mut config = fake_run_config(dir.path(), collector, scorer);
        config.site =
            ToolSpec::new("site-build", "sh", write_script(dir.path(), "bad-site.sh", "exit 7"));

        let err = run_daily(&config, &SilentProgress)
            .await
            .expect_err("site build fails");
        assert!(matches!(err, DailyPaperError::Invocation { .. }));

        // The dated snapshot and digest survive the failed build stage.
        assert!(config.paths.output_dir.join("2026-02-20.json").exists());
        assert!(config.paths.output_dir.join("2026-02-20.md").exists());
    }
}
