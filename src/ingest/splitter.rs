//! Chunk-to-line splitting with incremental UTF-8 decoding.
//!
//! Chunks may end anywhere: in the middle of a line, or in the middle of a
//! multi-byte character. The splitter carries both the undecoded tail
//! (at most three bytes) and the unterminated line text across calls.

use crate::model::error::IngestError;

/// Incremental line splitter.
///
/// Lines are separated by `\n`; the separator is stripped and nothing else
/// is (a `\r` before the newline stays in the text). The text after the last
/// separator is the final line, emitted by [`LineSplitter::finish`] even
/// when empty, so `lines.join("\n")` reproduces the input exactly.
#[derive(Debug, Default)]
pub struct LineSplitter {
    /// Bytes of an incomplete UTF-8 sequence at the end of the last chunk.
    pending: Vec<u8>,
    /// Decoded text of the current, not yet terminated, line.
    partial: String,
    /// Total bytes fed so far.
    consumed: u64,
}

impl LineSplitter {
    /// Splitter with nothing carried over.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes fed so far.
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Bytes currently carried over (undecoded tail plus unterminated line).
    pub fn carried_len(&self) -> usize {
        self.pending.len() + self.partial.len()
    }

    /// Feed the next chunk, returning every line it completes.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::DecodingFailed` if the chunk contains an invalid
    /// UTF-8 sequence; lines completed before it are dropped. Use
    /// [`feed_into`](Self::feed_into) to keep them.
    ///
    /// # Examples
    ///
    /// ```
    /// # use logsift::ingest::LineSplitter;
    /// let mut splitter = LineSplitter::new();
    /// assert_eq!(splitter.feed(b"first\nsec").unwrap(), vec!["first"]);
    /// assert_eq!(splitter.feed(b"ond\n").unwrap(), vec!["second"]);
    /// assert_eq!(splitter.finish().unwrap(), "");
    /// ```
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<String>, IngestError> {
        let mut lines = Vec::new();
        self.feed_into(chunk, &mut lines)?;
        Ok(lines)
    }

    /// Feed the next chunk, pushing every line it completes onto `lines`.
    ///
    /// On an invalid UTF-8 sequence, the lines terminated before the
    /// offending byte are still pushed, so what reaches `lines` never
    /// depends on where the chunk boundaries fell.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::DecodingFailed` with the absolute offset of the
    /// first invalid byte. The splitter must not be fed again after an error.
    pub fn feed_into(&mut self, chunk: &[u8], lines: &mut Vec<String>) -> Result<(), IngestError> {
        let buffer_start = self.consumed - self.pending.len() as u64;
        self.consumed += chunk.len() as u64;

        let joined: Vec<u8>;
        let bytes: &[u8] = if self.pending.is_empty() {
            chunk
        } else {
            let mut carried = std::mem::take(&mut self.pending);
            carried.extend_from_slice(chunk);
            joined = carried;
            &joined
        };

        let (valid, failure) = match std::str::from_utf8(bytes) {
            Ok(_) => (bytes.len(), None),
            Err(err) if err.error_len().is_some() => (
                err.valid_up_to(),
                Some(IngestError::DecodingFailed {
                    byte_offset: buffer_start + err.valid_up_to() as u64,
                }),
            ),
            Err(err) => {
                // Incomplete sequence at the end: keep it for the next chunk.
                let valid = err.valid_up_to();
                self.pending = bytes[valid..].to_vec();
                (valid, None)
            }
        };
        let text = std::str::from_utf8(&bytes[..valid]).map_err(|e| IngestError::DecodingFailed {
            byte_offset: buffer_start + e.valid_up_to() as u64,
        })?;

        let mut rest = text;
        while let Some(pos) = rest.find('\n') {
            let mut line = std::mem::take(&mut self.partial);
            line.push_str(&rest[..pos]);
            lines.push(line);
            rest = &rest[pos + 1..];
        }
        self.partial.push_str(rest);

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Signal end of stream and return the final line.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::DecodingFailed` if the stream ended inside a
    /// multi-byte character.
    pub fn finish(self) -> Result<String, IngestError> {
        if !self.pending.is_empty() {
            return Err(IngestError::DecodingFailed {
                byte_offset: self.consumed - self.pending.len() as u64,
            });
        }
        Ok(self.partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn split_all(chunks: &[&[u8]]) -> Vec<String> {
        let mut splitter = LineSplitter::new();
        let mut lines = Vec::new();
        for chunk in chunks {
            lines.extend(splitter.feed(chunk).unwrap());
        }
        lines.push(splitter.finish().unwrap());
        lines
    }

    #[test]
    fn single_chunk_splits_on_newlines() {
        assert_eq!(split_all(&[b"a\nb\nc"]), vec!["a", "b", "c"]);
    }

    #[test]
    fn trailing_newline_yields_empty_last_line() {
        assert_eq!(split_all(&[b"a\nb\n"]), vec!["a", "b", ""]);
    }

    #[test]
    fn empty_input_yields_one_empty_line() {
        assert_eq!(split_all(&[]), vec![""]);
        assert_eq!(split_all(&[b""]), vec![""]);
    }

    #[test]
    fn line_spanning_many_chunks() {
        assert_eq!(
            split_all(&[b"he", b"ll", b"o w", b"orld\nnext"]),
            vec!["hello world", "next"]
        );
    }

    #[test]
    fn newline_at_chunk_boundary() {
        assert_eq!(split_all(&[b"one\n", b"\ntwo"]), vec!["one", "", "two"]);
    }

    #[test]
    fn carriage_return_is_kept() {
        assert_eq!(split_all(&[b"a\r\nb"]), vec!["a\r", "b"]);
    }

    #[test]
    fn multibyte_character_split_across_chunks() {
        // "é" is 0xC3 0xA9, "€" is 0xE2 0x82 0xAC
        let chunks: [&[u8]; 4] = [b"caf\xC3", b"\xA9\n\xE2", b"\x82", b"\xAC!"];
        assert_eq!(split_all(&chunks), vec!["café", "€!"]);
    }

    #[test]
    fn four_byte_character_split_byte_by_byte() {
        let bytes = "x😀y".as_bytes();
        let chunks: Vec<&[u8]> = bytes.chunks(1).collect();
        assert_eq!(split_all(&chunks), vec!["x😀y"]);
    }

    #[test]
    fn invalid_sequence_reports_absolute_offset() {
        let mut splitter = LineSplitter::new();
        splitter.feed(b"ok\n").unwrap();
        let err = splitter.feed(b"ab\xFFcd").unwrap_err();
        assert!(matches!(err, IngestError::DecodingFailed { byte_offset: 5 }));
    }

    #[test]
    fn lines_before_invalid_byte_survive_in_the_same_chunk() {
        let mut together = Vec::new();
        let err = LineSplitter::new()
            .feed_into(b"ok\nbad\xFF\n", &mut together)
            .unwrap_err();
        assert!(matches!(err, IngestError::DecodingFailed { byte_offset: 6 }));

        let mut apart = Vec::new();
        let mut splitter = LineSplitter::new();
        splitter.feed_into(b"ok\n", &mut apart).unwrap();
        let err = splitter.feed_into(b"bad\xFF\n", &mut apart).unwrap_err();
        assert!(matches!(err, IngestError::DecodingFailed { byte_offset: 6 }));

        assert_eq!(together, vec!["ok"]);
        assert_eq!(together, apart);
    }

    #[test]
    fn invalid_continuation_after_carried_prefix() {
        let mut splitter = LineSplitter::new();
        splitter.feed(b"a\xC3").unwrap();
        let err = splitter.feed(b"Z").unwrap_err();
        assert!(matches!(err, IngestError::DecodingFailed { byte_offset: 1 }));
    }

    #[test]
    fn truncated_sequence_at_end_of_stream_fails() {
        let mut splitter = LineSplitter::new();
        splitter.feed(b"abc\xE2\x82").unwrap();
        let err = splitter.finish().unwrap_err();
        assert!(matches!(err, IngestError::DecodingFailed { byte_offset: 3 }));
    }

    #[test]
    fn carried_len_tracks_partial_line() {
        let mut splitter = LineSplitter::new();
        splitter.feed(b"abc\nde\xC3").unwrap();
        assert_eq!(splitter.carried_len(), 3);
        assert_eq!(splitter.bytes_consumed(), 7);
    }

    proptest! {
        /// Splitting the same input into arbitrary chunks yields the same lines
        /// as splitting it in one piece, and joining reproduces the input.
        #[test]
        fn prop_chunking_is_invisible(
            input in "(\\PC|\n|é|€|😀){0,200}",
            cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..12),
        ) {
            let bytes = input.as_bytes();
            let mut positions: Vec<usize> = cuts.iter().map(|c| c.index(bytes.len() + 1)).collect();
            positions.sort_unstable();
            positions.dedup();

            let mut chunks: Vec<&[u8]> = Vec::new();
            let mut start = 0;
            for pos in positions {
                chunks.push(&bytes[start..pos]);
                start = pos;
            }
            chunks.push(&bytes[start..]);

            let chunked = split_all(&chunks);
            let whole = split_all(&[bytes]);
            prop_assert_eq!(&chunked, &whole);
            prop_assert_eq!(chunked.join("\n"), input);
        }
    }
}
