//! Domain model types (pure).
//!
//! Lines, severities and the append-only store they live in.

pub mod error;
pub mod line;
pub mod severity;
pub mod store;

// Re-export for convenience
pub use error::{AppError, ExportError, IngestError, IngestFailure, InputError};
pub use line::{LineOrdinal, LogLine};
pub use severity::{classify, Classifier, Severity, ERROR_MARKER, WARNING_MARKER};
pub use store::{LoadState, LogStore, StoreId};
