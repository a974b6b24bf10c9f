//! CLI argument parsing, tracing setup, and the run entry point.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use dailypaper_core::pipeline::{
    self, ProgressReporter, RunConfig, RunReport, Stage,
};
use dailypaper_shared::{AppConfig, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// daily-paper — daily arXiv digest pipeline.
#[derive(Parser)]
#[command(
    name = "dailypaper",
    version,
    about = "Collect, score, curate, and render the daily paper digest, then rebuild the site.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Run date (ISO 8601, e.g. 2026-02-20). Defaults to today.
    #[arg(long)]
    pub date: Option<String>,

    /// Site branding mode passed to the generator ("paper" or "news").
    /// Defaults to `[defaults] mode` from the config.
    #[arg(long)]
    pub mode: Option<String>,

    /// Pipeline root directory. Defaults to the current directory.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Config file path. Defaults to <root>/dailypaper.toml.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "dailypaper=info",
        1 => "dailypaper=debug",
        _ => "dailypaper=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Run entry point
// ---------------------------------------------------------------------------

/// Execute the daily run described by the CLI flags.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let root = match cli.root {
        Some(p) => p,
        None => std::env::current_dir()
            .map_err(|e| eyre!("cannot determine working directory: {e}"))?,
    };

    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config(&root)?,
    };

    let run_date = match cli.date {
        Some(date) => validate_run_date(&date)?,
        None => default_run_date(),
    };

    let mode = resolve_mode(cli.mode, &config);

    let run_config = RunConfig::from_app_config(&root, run_date.clone(), mode.clone(), &config);

    info!(date = %run_date, mode = %mode, root = %root.display(), "starting daily-paper run");

    let reporter = CliProgress::new();
    let report = pipeline::run_daily(&run_config, &reporter).await?;

    println!("[daily-paper] OK: {}", report.out_md.display());
    Ok(())
}

/// The logical run date when none is given: today, local time.
fn default_run_date() -> String {
    Local::now().date_naive().to_string()
}

/// The CLI flag wins; otherwise the config decides the branding mode.
fn resolve_mode(flag: Option<String>, config: &AppConfig) -> String {
    flag.unwrap_or_else(|| config.defaults.mode.clone())
}

/// Require a well-formed ISO date; the date names artifacts on disk.
fn validate_run_date(date: &str) -> Result<String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| eyre!("invalid --date '{date}': {e} (expected YYYY-MM-DD)"))?;
    Ok(date.to_string())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn stage(&self, stage: Stage) {
        let msg = match stage {
            Stage::Collect => "Collecting candidate papers",
            Stage::Score => "Scoring and translating",
            Stage::Curate => "Curating scored items",
            Stage::Render => "Rendering Markdown digest",
            Stage::Build => "Rebuilding static site",
        };
        self.spinner.set_message(msg);
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_mode_reaches_run_config_when_flag_absent() {
        let mut config = AppConfig::default();
        config.defaults.mode = "news".into();

        let mode = resolve_mode(None, &config);
        let run_config = RunConfig::from_app_config(
            std::path::Path::new("/pipeline"),
            "2026-02-20".into(),
            mode,
            &config,
        );
        assert_eq!(run_config.mode, "news");
    }

    #[test]
    fn mode_flag_overrides_config() {
        let mut config = AppConfig::default();
        config.defaults.mode = "news".into();
        assert_eq!(resolve_mode(Some("paper".into()), &config), "paper");
    }

    #[test]
    fn run_date_validation() {
        assert_eq!(validate_run_date("2026-02-20").unwrap(), "2026-02-20");
        assert!(validate_run_date("02/20/2026").is_err());
        assert!(validate_run_date("2026-13-01").is_err());
        assert!(validate_run_date("today").is_err());
    }

    #[test]
    fn default_run_date_is_iso_formatted() {
        let date = default_run_date();
        assert!(validate_run_date(&date).is_ok());
    }
}
