//! Error types for logsift.
//!
//! Errors are concentrated at the two fallible boundaries of the core:
//! ingestion (reading and decoding chunks) and export (producing a document).
//! Classification, filtering, grouping and layout are total functions over
//! already-valid lines and never fail.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error for the command-line wrapper
//!   - [`InputError`] - Opening the ingestion source (file not found, no input)
//!   - [`IngestFailure`] - A run stopped early; carries the partial store
//!   - [`ExportError`] - Producing or persisting an export artifact
//!   - [`ConfigError`](crate::config::ConfigError) - Loading configuration
//!
//! # Recovery Strategy
//!
//! Nothing is retried inside the core. A failed ingestion leaves the
//! previously committed store in place; retrying means starting a new run
//! on a fresh source.

use super::store::LogStore;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
///
/// All domain-specific errors convert into `AppError` via `From`, so the
/// binary can propagate with `?`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The ingestion source could not be opened.
    #[error("Failed to open input: {0}")]
    Input(#[from] InputError),

    /// Ingestion stopped before end of stream.
    #[error("Failed to ingest log: {0}")]
    Ingest(#[from] IngestFailure),

    /// An export artifact could not be produced.
    #[error("Failed to export: {0}")]
    Export(#[from] ExportError),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Writing output to the terminal failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors encountered when opening the ingestion source.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified log file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use logsift::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.log")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.log"));
    /// ```
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// The path that was attempted.
        path: PathBuf,
    },

    /// No file path was given and stdin is an interactive terminal.
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Any other I/O failure while opening the source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why an ingestion run stopped before end of stream.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The underlying byte stream errored mid-read.
    ///
    /// Lines emitted before the failure remain valid. The store is marked
    /// incomplete rather than frozen.
    #[error("ingestion failed after {lines_emitted} lines: {source}")]
    IngestionFailed {
        /// Lines appended before the failure.
        lines_emitted: usize,
        /// The I/O error reported by the source.
        #[source]
        source: std::io::Error,
    },

    /// Chunk bytes are not valid UTF-8.
    ///
    /// Fatal for the run: once a sequence is corrupt, every later decoding
    /// decision is suspect, so no further lines are emitted.
    #[error("invalid UTF-8 at byte offset {byte_offset}")]
    DecodingFailed {
        /// Absolute offset into the stream of the first offending byte.
        byte_offset: u64,
    },

    /// The run was cancelled, typically because a newer run started.
    #[error("ingestion cancelled after {lines_emitted} lines")]
    Cancelled {
        /// Lines appended before cancellation was observed.
        lines_emitted: usize,
    },
}

/// A run that did not reach end of stream, with everything it produced.
///
/// The partial store is in state `Incomplete` or `Cancelled`; its lines are
/// valid and ordered, but it must not be mistaken for a complete file.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct IngestFailure {
    /// What stopped the run.
    #[source]
    pub error: IngestError,
    /// Lines appended before the run stopped.
    pub partial: LogStore,
}

impl IngestFailure {
    /// Pair a stop reason with the lines produced before it.
    pub fn new(error: IngestError, partial: LogStore) -> Self {
        Self { error, partial }
    }

    /// True if the run stopped because it was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.error, IngestError::Cancelled { .. })
    }
}

/// Errors producing or persisting an export document.
///
/// Formatting is atomic: on error the caller receives no artifact at all.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A section or view references a line that is not in the store.
    ///
    /// Happens when derived data from one store is exported against another.
    #[error("line {ordinal} is not present in the store")]
    MissingLine {
        /// 1-based line number that could not be found.
        ordinal: usize,
    },

    /// A line contains a character the document format cannot carry.
    #[error("line {ordinal} contains unencodable character U+{code:04X}")]
    Unencodable {
        /// 1-based line number.
        ordinal: usize,
        /// Code point of the offending character.
        code: u32,
    },

    /// Persisting the document failed; the destination is untouched.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
