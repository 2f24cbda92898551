//! Chunk sources for ingestion.
//!
//! This module provides the byte-chunk sources an ingestion run consumes:
//! - `ReaderSource` over any tokio `AsyncRead`
//! - `ChunkList` for in-memory, scripted chunk sequences
//! - Unified `InputSource` enum for file or piped stdin

use crate::model::error::InputError;
use std::collections::VecDeque;
use std::io;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Default chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// An ordered sequence of byte chunks ending with an end-of-stream signal.
///
/// Each call suspends until the next chunk is available. Chunks are never
/// skipped or duplicated; `Ok(None)` signals end of stream.
#[allow(async_fn_in_trait)]
pub trait ChunkSource {
    /// Read the next chunk, or `None` at end of stream.
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>>;
}

/// Chunk source reading fixed-size chunks from an async reader.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    chunk_size: usize,
}

impl<R: AsyncRead + Unpin> ReaderSource<R> {
    /// Wrap a reader. A `chunk_size` of zero is raised to one byte.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Maximum bytes per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl<R: AsyncRead + Unpin> ChunkSource for ReaderSource<R> {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut buf = vec![0u8; self.chunk_size];
        let read = self.reader.read(&mut buf).await?;
        if read == 0 {
            return Ok(None);
        }
        buf.truncate(read);
        Ok(Some(buf))
    }
}

/// Scripted chunk source: yields each queued item in order, then end of stream.
///
/// Queued errors are returned when reached, which makes mid-stream I/O
/// failures reproducible.
#[derive(Debug, Default)]
pub struct ChunkList {
    items: VecDeque<io::Result<Vec<u8>>>,
}

impl ChunkList {
    /// Source with no chunks; add them with [`chunk`](Self::chunk).
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `bytes` into chunks of `size` bytes (the last may be shorter).
    pub fn from_bytes(bytes: &[u8], size: usize) -> Self {
        let mut list = Self::new();
        for chunk in bytes.chunks(size.max(1)) {
            list = list.chunk(chunk);
        }
        list
    }

    /// Queue a chunk.
    pub fn chunk(mut self, bytes: impl AsRef<[u8]>) -> Self {
        self.items.push_back(Ok(bytes.as_ref().to_vec()));
        self
    }

    /// Queue an I/O failure.
    pub fn error(mut self, error: io::Error) -> Self {
        self.items.push_back(Err(error));
        self
    }

    /// Items not yet consumed.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl ChunkSource for ChunkList {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        self.items.pop_front().transpose()
    }
}

/// Unified ingestion source for a log file or piped stdin.
///
/// Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum InputSource {
    /// File opened for a single read-through.
    File {
        /// Path that was opened.
        path: PathBuf,
        /// Chunked reader over the open file.
        source: ReaderSource<tokio::fs::File>,
    },
    /// Piped stdin.
    Stdin(ReaderSource<tokio::io::Stdin>),
}

impl InputSource {
    /// Human-readable origin, for logging and document titles.
    pub fn describe(&self) -> String {
        match self {
            InputSource::File { path, .. } => path.display().to_string(),
            InputSource::Stdin(_) => "<stdin>".to_string(),
        }
    }
}

impl ChunkSource for InputSource {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        match self {
            InputSource::File { source, .. } => source.next_chunk().await,
            InputSource::Stdin(source) => source.next_chunk().await,
        }
    }
}

/// Detect and open the appropriate input source.
///
/// # Logic:
/// 1. If a file path is provided: open it
/// 2. If stdin is piped: read stdin
/// 3. Else: `InputError::NoInput`
///
/// # Errors
///
/// Returns `InputError::FileNotFound` if the file does not exist,
/// `InputError::NoInput` if no file is given and stdin is a terminal,
/// `InputError::Io` for other failures while opening.
pub async fn detect_input_source(
    file: Option<&Path>,
    chunk_size: usize,
) -> Result<InputSource, InputError> {
    match file {
        Some(path) => {
            if !path.exists() {
                return Err(InputError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            let handle = tokio::fs::File::open(path).await?;
            Ok(InputSource::File {
                path: path.to_path_buf(),
                source: ReaderSource::new(handle, chunk_size),
            })
        }
        None => {
            if io::stdin().is_terminal() {
                return Err(InputError::NoInput);
            }
            Ok(InputSource::Stdin(ReaderSource::new(
                tokio::io::stdin(),
                chunk_size,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reader_source_yields_chunks_then_none() {
        let data: &[u8] = b"abcdefg";
        let mut source = ReaderSource::new(data, 3);

        let mut chunks = Vec::new();
        while let Some(chunk) = source.next_chunk().await.unwrap() {
            chunks.push(chunk);
        }

        assert_eq!(chunks.concat(), b"abcdefg");
        assert!(chunks.iter().all(|c| c.len() <= 3));
        assert!(source.next_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reader_source_zero_chunk_size_is_raised() {
        let data: &[u8] = b"ab";
        let source = ReaderSource::new(data, 0);
        assert_eq!(source.chunk_size(), 1);
    }

    #[tokio::test]
    async fn chunk_list_replays_items_in_order() {
        let mut list = ChunkList::new()
            .chunk("one")
            .error(io::Error::new(io::ErrorKind::Other, "boom"))
            .chunk("two");

        assert_eq!(list.next_chunk().await.unwrap(), Some(b"one".to_vec()));
        assert!(list.next_chunk().await.is_err());
        assert_eq!(list.next_chunk().await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(list.next_chunk().await.unwrap(), None);
        assert_eq!(list.remaining(), 0);
    }

    #[test]
    fn chunk_list_from_bytes_splits_evenly() {
        let list = ChunkList::from_bytes(b"abcdefgh", 3);
        assert_eq!(list.remaining(), 3);
    }

    #[tokio::test]
    async fn detect_returns_file_source_for_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let test_file = dir.path().join("existing.log");
        std::fs::write(&test_file, "INFO hello\n").unwrap();

        let result = detect_input_source(Some(&test_file), 16).await;

        let source = result.expect("existing file should open");
        assert!(matches!(source, InputSource::File { .. }));
        assert!(source.describe().ends_with("existing.log"));
    }

    #[tokio::test]
    async fn detect_returns_file_not_found_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nonexistent.log");

        let result = detect_input_source(Some(&missing), 16).await;

        match result {
            Err(InputError::FileNotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected FileNotFound, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn detect_no_input_when_stdin_is_terminal() {
        let result = detect_input_source(None, 16).await;
        if io::stdin().is_terminal() {
            assert!(matches!(result, Err(InputError::NoInput)));
        }
    }
}
