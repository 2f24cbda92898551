//! Command-line driver: ingest one source, derive the view, print the
//! visible window and write requested exports.

use crate::config::ResolvedConfig;
use crate::export::{format_document, write_document, ExportMode};
use crate::filter::ViewFilter;
use crate::ingest::{detect_input_source, ChunkSource, LogSession};
use crate::model::{AppError, LogStore};
use crate::viewer::{VisibleRow, Viewer};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Which export artifact to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Every line, flagged lines tinted.
    Full,
    /// The current filtered view.
    Filtered,
    /// Incident sections.
    Sections,
}

/// One artifact to write at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Which document to render.
    pub kind: ArtifactKind,
    /// Destination file.
    pub path: PathBuf,
}

/// Everything the binary asks of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Log file; `None` reads piped stdin.
    pub file: Option<PathBuf>,
    /// Filter for the printed view and the filtered export.
    pub filter: ViewFilter,
    /// Scroll offset of the printed window, in pixels.
    pub scroll: usize,
    /// Height of the printed window, in pixels.
    pub viewport: usize,
    /// Print a JSON summary instead of text rows.
    pub json: bool,
    /// Artifacts to write after ingestion.
    pub exports: Vec<ExportRequest>,
}

/// Summary of a finished run, printed as text or JSON.
#[derive(Debug, Serialize)]
pub struct Report<'s> {
    /// Where the lines came from.
    pub source: String,
    /// Lines in the store.
    pub lines: usize,
    /// Lines classified as Error.
    pub errors: usize,
    /// Lines classified as Warning.
    pub warnings: usize,
    /// Incident sections.
    pub sections: usize,
    /// Severity mask name.
    pub filter: String,
    /// Search text, if any.
    pub search: Option<&'s str>,
    /// Rows in the filtered view.
    pub rows: usize,
    /// Height of the whole view, in pixels.
    pub total_height: usize,
    /// Rows inside the requested window.
    pub visible: Vec<VisibleRow<'s>>,
}

/// Open the configured input and run it to completion.
pub async fn run<W: Write>(
    options: &RunOptions,
    config: &ResolvedConfig,
    out: &mut W,
) -> Result<(), AppError> {
    let mut source = detect_input_source(options.file.as_deref(), config.chunk_size).await?;
    let description = source.describe();
    run_with_source(&mut source, &description, options, config, out).await
}

/// Ingest `source`, keeping a [`Viewer`] in step after every chunk, then
/// export and print.
pub async fn run_with_source<S: ChunkSource, W: Write>(
    source: &mut S,
    description: &str,
    options: &RunOptions,
    config: &ResolvedConfig,
    out: &mut W,
) -> Result<(), AppError> {
    let mut session = LogSession::new(config.classifier());
    let mut viewer = Viewer::new(
        options.filter.clone(),
        config.height_params(),
        config.context_length,
    );

    let store = session
        .ingest(source, |store, _| {
            viewer.sync(store);
        })
        .await?;
    viewer.sync(store);

    for request in &options.exports {
        export_artifact(store, &viewer, request)?;
    }

    let report = build_report(description, store, &viewer, options);
    info!(
        source = description,
        lines = report.lines,
        rows = report.rows,
        "Run finished"
    );
    if options.json {
        serde_json::to_writer_pretty(&mut *out, &report).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        write_text(out, &report)?;
    }
    Ok(())
}

fn export_artifact(
    store: &LogStore,
    viewer: &Viewer,
    request: &ExportRequest,
) -> Result<(), AppError> {
    let mode = match request.kind {
        ArtifactKind::Full => ExportMode::Full,
        ArtifactKind::Filtered => ExportMode::Filtered(viewer.view()),
        ArtifactKind::Sections => ExportMode::Sections(viewer.sections()),
    };
    let bytes = format_document(store, mode)?;
    write_document(&request.path, &bytes)?;
    Ok(())
}

/// Collect the counts and visible window of a finished run.
pub fn build_report<'s>(
    description: &str,
    store: &'s LogStore,
    viewer: &'s Viewer,
    options: &RunOptions,
) -> Report<'s> {
    let (errors, warnings) = store.flagged_counts();
    Report {
        source: description.to_string(),
        lines: store.len(),
        errors,
        warnings,
        sections: viewer.sections().len(),
        filter: viewer.filter().severity().to_string(),
        search: viewer.filter().search().map(|query| query.as_str()),
        rows: viewer.row_count(),
        total_height: viewer.total_height(),
        visible: viewer.visible_rows(store, options.scroll, options.viewport),
    }
}

fn write_text<W: Write>(out: &mut W, report: &Report<'_>) -> io::Result<()> {
    writeln!(
        out,
        "{}: {} lines, {} errors, {} warnings, {} sections",
        report.source, report.lines, report.errors, report.warnings, report.sections
    )?;
    match (report.visible.first(), report.visible.last()) {
        (Some(first), Some(last)) => writeln!(
            out,
            "showing rows {}-{} of {} (filter: {})",
            first.row + 1,
            last.row + 1,
            report.rows,
            report.filter
        )?,
        _ => writeln!(out, "no rows match (filter: {})", report.filter)?,
    }
    for row in &report.visible {
        let label = if row.line.is_flagged() {
            row.line.severity().label()
        } else {
            ""
        };
        writeln!(
            out,
            "{:>6} {:<7} {}",
            row.line.ordinal().display(),
            label,
            row.line.text()
        )?;
    }
    Ok(())
}
