//! Streaming ingestion: chunk sources, line splitting, and runs.
//!
//! Raw chunks flow through the [`LineSplitter`], each completed line is
//! classified once and appended to the run's [`LogStore`](crate::model::LogStore).

pub mod pipeline;
pub mod source;
pub mod splitter;

pub use pipeline::{IngestRun, LogSession, RunId};
pub use source::{detect_input_source, ChunkList, ChunkSource, InputSource, ReaderSource};
pub use splitter::LineSplitter;
