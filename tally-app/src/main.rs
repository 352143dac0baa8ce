use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tally_common::TallyError;
use tally_common::observability::{LogConfig, LogFormat, init_logging};
use tally_config::{LogEncoding, TallyConfig, TallyConfigLoader};
use run::Run;
mod run;

const DEFAULT_CONFIG: &str = "tubetally.yaml";

/// Scrape YouTube search results for fixed topic lists and tally them per channel.
#[derive(Debug, Parser)]
#[command(name = "tubetally", version, about)]
struct Cli {
    /// Configuration file; `tubetally.yaml` is read when present if omitted.
    #[arg(short, long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the CSV reports (overrides `output.dir`).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip the browser step and search with the locale cookie only.
    #[arg(long)]
    no_browser: bool,
}

fn load_config(cli: &Cli) -> Result<TallyConfig, TallyError> {
    let loader = match &cli.config {
        Some(path) => TallyConfigLoader::new().with_file(path),
        None => TallyConfigLoader::new().with_optional_file(DEFAULT_CONFIG),
    };
    let mut cfg = loader
        .load()
        .map_err(|e| TallyError::Config(e.to_string()))?;

    if let Some(dir) = &cli.output_dir {
        cfg.output.dir = dir.clone();
    }
    if cli.no_browser {
        cfg.browser.enabled = false;
    }
    Ok(cfg)
}

fn log_config(cfg: &TallyConfig) -> LogConfig {
    LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.emit_stderr,
        format: match cfg.logging.format {
            LogEncoding::Text => LogFormat::Text,
            LogEncoding::Json => LogFormat::Json,
        },
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env beats the file, CLI flags beat both)
    let cfg = load_config(&cli)?;

    let log_file = init_logging(log_config(&cfg))?;
    tracing::info!(
        log_file = %log_file.display(),
        topic_sets = cfg.topic_sets.len(),
        browser = cfg.browser.enabled,
        "tubetally.start"
    );

    Run::from_config(cfg)?.execute().await?;
    Ok(())
}
