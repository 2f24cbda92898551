//! Tests for HTML export.

use super::*;
use crate::filter::{SeverityMask, ViewFilter};
use crate::sections::group_sections;

fn sample() -> LogStore {
    LogStore::from_lines([
        "INFO start",
        "Error: disk full",
        "retry 1",
        "retry 2",
        "INFO done",
    ])
}

fn render(store: &LogStore, mode: ExportMode<'_>) -> String {
    String::from_utf8(format_document(store, mode).unwrap()).unwrap()
}

#[test]
fn full_document_tints_flagged_lines_only() {
    let doc = render(&sample(), ExportMode::Full);
    insta::assert_snapshot!(doc.trim_end(), @r#"
    <!DOCTYPE html>
    <html lang="en">
    <head>
    <meta charset="utf-8">
    <title>Highlighted log</title>
    </head>
    <body style="margin: 0; padding: 16px; font-family: monospace; white-space: pre-wrap;">
    <div data-line="1">INFO start</div>
    <div data-line="2" style="background-color: #ffcccc; padding: 5px;">Error: disk full</div>
    <div data-line="3">retry 1</div>
    <div data-line="4">retry 2</div>
    <div data-line="5">INFO done</div>
    </body>
    </html>
    "#);
}

#[test]
fn sections_are_separated_by_breaks() {
    let store = LogStore::from_lines(["A", "Error1", "B", "C", "Warning2", "D"]);
    let sections = group_sections(&store, 1);
    let doc = render(&store, ExportMode::Sections(&sections));
    insta::assert_snapshot!(doc.trim_end(), @r#"
    <!DOCTYPE html>
    <html lang="en">
    <head>
    <meta charset="utf-8">
    <title>Incident sections</title>
    </head>
    <body style="margin: 0; padding: 16px; font-family: monospace; white-space: pre-wrap;">
    <section data-anchor="2" style="border-left: 4px solid #ffcccc; padding-left: 8px;">
    <div data-line="2" style="background-color: #ffcccc; padding: 5px;">Error1</div>
    <div data-line="3">B</div>
    </section>
    <hr class="section-break">
    <section data-anchor="5" style="border-left: 4px solid #ffeb99; padding-left: 8px;">
    <div data-line="5" style="background-color: #ffeb99; padding: 5px;">Warning2</div>
    <div data-line="6">D</div>
    </section>
    </body>
    </html>
    "#);
}

#[test]
fn overlapping_sections_repeat_shared_lines() {
    let store = LogStore::from_lines(["Error a", "Error b", "c"]);
    let sections = group_sections(&store, 2);
    let doc = render(&store, ExportMode::Sections(&sections));
    assert_eq!(doc.matches("<section ").count(), 2);
    assert_eq!(doc.matches("<hr class=\"section-break\">").count(), 1);
    assert_eq!(doc.matches(">c</div>").count(), 2);
}

#[test]
fn no_sections_yields_empty_body() {
    let store = LogStore::from_lines(["quiet"]);
    let doc = render(&store, ExportMode::Sections(&[]));
    assert!(!doc.contains("<section"));
    assert!(!doc.contains("<div"));
    assert!(doc.trim_end().ends_with("</html>"));
}

#[test]
fn filtered_document_follows_view_rows() {
    let store = sample();
    let view = FilteredView::from_store(&store, ViewFilter::new(SeverityMask::All, "retry"));
    let doc = render(&store, ExportMode::Filtered(&view));
    assert!(doc.contains("<title>Filtered log</title>"));
    let lines: Vec<_> = doc.lines().filter(|l| l.starts_with("<div")).collect();
    assert_eq!(
        lines,
        vec![
            "<div data-line=\"3\">retry 1</div>",
            "<div data-line=\"4\">retry 2</div>",
        ]
    );
}

#[test]
fn markup_in_lines_is_escaped() {
    let store = LogStore::from_lines([r#"<script>alert("x & 'y'")</script>"#]);
    let doc = render(&store, ExportMode::Full);
    assert!(doc.contains("&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"));
    assert!(!doc.contains("<script>"));
}

#[test]
fn tab_and_carriage_return_are_kept() {
    let store = LogStore::from_lines(["a\tb\r"]);
    let doc = render(&store, ExportMode::Full);
    assert!(doc.contains(">a\tb\r</div>"));
}

#[test]
fn control_character_fails_without_output() {
    let store = LogStore::from_lines(["fine", "bad\u{0}byte"]);
    let err = format_document(&store, ExportMode::Full).unwrap_err();
    match err {
        ExportError::Unencodable { ordinal, code } => {
            assert_eq!(ordinal, 2);
            assert_eq!(code, 0);
        }
        other => panic!("expected Unencodable, got {:?}", other),
    }
    assert_eq!(
        ExportError::Unencodable { ordinal: 2, code: 0x1b }.to_string(),
        "line 2 contains unencodable character U+001B"
    );
}

#[test]
fn view_from_another_store_reports_missing_line() {
    let big = LogStore::from_lines(["a", "b", "c"]);
    let small = LogStore::from_lines(["a"]);
    let view = FilteredView::from_store(&big, ViewFilter::all());
    let err = format_document(&small, ExportMode::Filtered(&view)).unwrap_err();
    assert!(matches!(err, ExportError::MissingLine { ordinal: 2 }));
}

#[test]
fn file_names_per_mode() {
    let view = FilteredView::new(ViewFilter::all());
    assert_eq!(ExportMode::Full.file_name(), "highlighted_log.html");
    assert_eq!(ExportMode::Filtered(&view).file_name(), "filtered_log.html");
    assert_eq!(ExportMode::Sections(&[]).file_name(), "colored_errors.html");
}

// ===== write_document =====

#[test]
fn write_document_persists_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.html");

    write_document(&path, b"<html></html>").unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"<html></html>");
    assert!(!dir.path().join(".out.html.tmp").exists());
}

#[test]
fn write_document_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.html");
    fs::write(&path, "old").unwrap();

    write_document(&path, b"new").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
}

#[test]
fn write_document_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.html");

    let err = write_document(&path, b"x").unwrap_err();

    match err {
        ExportError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected Io, got {:?}", other),
    }
    assert!(!path.exists());
}
