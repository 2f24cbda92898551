//! Self-contained HTML export of classified lines.
//!
//! Documents are built in memory and handed out only once complete, so a
//! failure never leaves a partial artifact. [`write_document`] persists
//! through a sibling temporary file and a rename.

use crate::filter::FilteredView;
use crate::model::{ExportError, LineOrdinal, LogLine, LogStore};
use crate::sections::IncidentSection;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const BODY_STYLE: &str = "margin: 0; padding: 16px; font-family: monospace; white-space: pre-wrap;";

/// Which lines go into a document.
#[derive(Debug, Clone, Copy)]
pub enum ExportMode<'a> {
    /// Every line of the store, flagged lines tinted.
    Full,
    /// The rows of a filtered view, in view order.
    Filtered(&'a FilteredView),
    /// Incident sections, each in its own block, separated by a section break.
    Sections(&'a [IncidentSection]),
}

impl ExportMode<'_> {
    /// Document `<title>`.
    pub fn title(&self) -> &'static str {
        match self {
            ExportMode::Full => "Highlighted log",
            ExportMode::Filtered(_) => "Filtered log",
            ExportMode::Sections(_) => "Incident sections",
        }
    }

    /// Conventional file name for the artifact.
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportMode::Full => "highlighted_log.html",
            ExportMode::Filtered(_) => "filtered_log.html",
            ExportMode::Sections(_) => "colored_errors.html",
        }
    }
}

/// Render `mode` over `store` into a complete HTML document.
///
/// # Errors
///
/// - [`ExportError::MissingLine`] if the view or a section references a
///   line the store does not hold.
/// - [`ExportError::Unencodable`] if a line carries NUL or another C0
///   control character other than TAB and CR.
///
/// # Examples
///
/// ```
/// # use logsift::export::{format_document, ExportMode};
/// # use logsift::model::LogStore;
/// let store = LogStore::from_lines(["ok", "Error: <boom>"]);
/// let doc = String::from_utf8(format_document(&store, ExportMode::Full).unwrap()).unwrap();
/// assert!(doc.starts_with("<!DOCTYPE html>"));
/// assert!(doc.contains("Error: &lt;boom&gt;"));
/// ```
pub fn format_document(store: &LogStore, mode: ExportMode<'_>) -> Result<Vec<u8>, ExportError> {
    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{}</title>", mode.title());
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body style=\"{BODY_STYLE}\">");

    match mode {
        ExportMode::Full => {
            for line in store.lines() {
                render_line(&mut out, line)?;
            }
        }
        ExportMode::Filtered(view) => {
            for &ordinal in view.rows() {
                render_line(&mut out, lookup(store, ordinal)?)?;
            }
        }
        ExportMode::Sections(sections) => {
            for (i, section) in sections.iter().enumerate() {
                if i > 0 {
                    let _ = writeln!(out, "<hr class=\"section-break\">");
                }
                let _ = writeln!(
                    out,
                    "<section data-anchor=\"{}\" style=\"border-left: 4px solid {}; padding-left: 8px;\">",
                    section.anchor().display(),
                    section.accent_color()
                );
                for &ordinal in section.members() {
                    render_line(&mut out, lookup(store, ordinal)?)?;
                }
                let _ = writeln!(out, "</section>");
            }
        }
    }

    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    Ok(out.into_bytes())
}

/// Persist `bytes` at `path` atomically.
///
/// Writes a hidden sibling temporary file and renames it over `path`; on
/// failure the temporary file is removed and `path` is left as it was.
pub fn write_document(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let temp_path = temp_path(path);
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Err(err) = fs::write(&temp_path, bytes) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error(err));
    }
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        warn!(path = %path.display(), error = %err, "Export rename failed");
        return Err(io_error(err));
    }

    info!(path = %path.display(), bytes = bytes.len(), "Export written");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

fn lookup(store: &LogStore, ordinal: LineOrdinal) -> Result<&LogLine, ExportError> {
    store.get(ordinal).ok_or(ExportError::MissingLine {
        ordinal: ordinal.display(),
    })
}

fn render_line(out: &mut String, line: &LogLine) -> Result<(), ExportError> {
    let text = escape_html(line.ordinal(), line.text())?;
    let number = line.ordinal().display();
    match line.severity().color_tag() {
        Some(color) => {
            let _ = writeln!(
                out,
                "<div data-line=\"{number}\" style=\"background-color: {color}; padding: 5px;\">{text}</div>"
            );
        }
        None => {
            let _ = writeln!(out, "<div data-line=\"{number}\">{text}</div>");
        }
    }
    Ok(())
}

fn escape_html(ordinal: LineOrdinal, value: &str) -> Result<String, ExportError> {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\t' | '\r' => out.push(ch),
            c if c < ' ' => {
                return Err(ExportError::Unencodable {
                    ordinal: ordinal.display(),
                    code: u32::from(c),
                })
            }
            _ => out.push(ch),
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
