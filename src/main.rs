//! logsift - Entry Point

use clap::Parser;
use logsift::app::{ArtifactKind, ExportRequest, RunOptions};
use logsift::filter::{SeverityMask, ViewFilter};
use std::path::PathBuf;
use tracing::info;

/// logsift - classify, filter and export log files
#[derive(Parser, Debug)]
#[command(name = "logsift")]
#[command(version)]
#[command(about = "Highlight Error and Warning lines in a log, filter them and export incident sections")]
pub struct Args {
    /// Path to log file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Severity filter: all, errors, warnings, flagged or sections
    #[arg(short, long)]
    pub filter: Option<SeverityMask>,

    /// Case-insensitive text the shown lines must contain
    #[arg(short, long)]
    pub search: Option<String>,

    /// Context lines after each flagged line in an incident section
    #[arg(short = 'C', long)]
    pub context: Option<usize>,

    /// Scroll offset in pixels
    #[arg(long, default_value_t = 0)]
    pub scroll: usize,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600)]
    pub viewport: usize,

    /// Write the full highlighted document to PATH
    #[arg(long, value_name = "PATH")]
    pub export_full: Option<PathBuf>,

    /// Write the filtered view document to PATH
    #[arg(long, value_name = "PATH")]
    pub export_filtered: Option<PathBuf>,

    /// Write the incident sections document to PATH
    #[arg(long, value_name = "PATH")]
    pub export_sections: Option<PathBuf>,

    /// Print a JSON summary instead of text rows
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn exports(&self) -> Vec<ExportRequest> {
        [
            (ArtifactKind::Full, &self.export_full),
            (ArtifactKind::Filtered, &self.export_filtered),
            (ArtifactKind::Sections, &self.export_sections),
        ]
        .into_iter()
        .filter_map(|(kind, path)| {
            path.clone().map(|path| ExportRequest { kind, path })
        })
        .collect()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = logsift::config::load_config_with_precedence(args.config.clone())?;
        let merged = logsift::config::merge_config(config_file);
        let with_env = logsift::config::apply_env_overrides(merged)?;
        logsift::config::apply_cli_overrides(with_env, args.context, args.filter)
    };
    config.validate()?;

    logsift::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let options = RunOptions {
        file: args.file.clone(),
        filter: ViewFilter::new(config.default_filter, args.search.as_deref().unwrap_or("")),
        scroll: args.scroll,
        viewport: args.viewport,
        json: args.json,
        exports: args.exports(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    logsift::app::run(&options, &config, &mut out).await?;

    Ok(())
}
