//! Ingestion runs and the session that owns the committed store.
//!
//! A run owns the store it fills, so two runs can never append into the
//! same store. Starting a new run through [`LogSession::begin`] cancels the
//! previous one; the cancelled run stops before appending its next chunk.

use super::source::ChunkSource;
use super::splitter::LineSplitter;
use crate::model::error::{IngestError, IngestFailure};
use crate::model::{Classifier, LogStore};
use std::ops::Range;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Identity of an ingestion run within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

impl RunId {
    /// Raw counter value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// A single ingestion of one source into a fresh store.
#[derive(Debug)]
pub struct IngestRun {
    id: RunId,
    cancel: CancellationToken,
    classifier: Classifier,
}

impl IngestRun {
    /// Create a standalone run with its own cancellation token.
    pub fn new(classifier: Classifier) -> Self {
        Self::with_token(RunId(0), CancellationToken::new(), classifier)
    }

    fn with_token(id: RunId, cancel: CancellationToken, classifier: Classifier) -> Self {
        Self {
            id,
            cancel,
            classifier,
        }
    }

    /// Identity of this run within its session.
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Handle that cancels this run when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drive the run to end of stream.
    ///
    /// After each chunk that completes at least one line, `observer` is
    /// called with the store and the range of newly appended ordinals, so
    /// readers can extend derived views incrementally. Control returns to
    /// the scheduler between chunks.
    ///
    /// # Errors
    ///
    /// Returns `IngestFailure` carrying the partial store when the source
    /// errors (`IngestionFailed`), bytes are not UTF-8 (`DecodingFailed`),
    /// or the run is cancelled (`Cancelled`). Lines already appended stay
    /// valid; nothing after the failure point is appended.
    pub async fn run<S, F>(self, source: &mut S, mut observer: F) -> Result<LogStore, IngestFailure>
    where
        S: ChunkSource,
        F: FnMut(&LogStore, Range<usize>),
    {
        let mut store = LogStore::new();
        let mut splitter = LineSplitter::new();
        let mut chunks = 0usize;

        info!(run = self.id.get(), store = store.id().get(), "Ingestion started");

        loop {
            let read = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                read = source.next_chunk() => Some(read),
            };

            // Checked again after every suspension, before anything is appended.
            let read = match read {
                Some(read) if !self.cancel.is_cancelled() => read,
                _ => return Err(self.cancelled(store)),
            };

            let chunk = match read {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(err) => {
                    warn!(run = self.id.get(), error = %err, "Chunk read failed");
                    let lines_emitted = store.len();
                    store.mark_incomplete();
                    return Err(IngestFailure::new(
                        IngestError::IngestionFailed {
                            lines_emitted,
                            source: err,
                        },
                        store,
                    ));
                }
            };
            chunks += 1;

            let mut lines = Vec::new();
            let decoded = splitter.feed_into(&chunk, &mut lines);

            let start = store.len();
            for text in lines {
                self.append(&mut store, text);
            }
            debug!(
                run = self.id.get(),
                chunk = chunks,
                bytes = chunk.len(),
                appended = store.len() - start,
                carried = splitter.carried_len(),
                "Chunk ingested"
            );
            if store.len() > start {
                observer(&store, start..store.len());
            }
            if let Err(error) = decoded {
                return Err(self.failed(error, store));
            }

            tokio::task::yield_now().await;
        }

        let last = match splitter.finish() {
            Ok(last) => last,
            Err(error) => return Err(self.failed(error, store)),
        };
        let start = store.len();
        self.append(&mut store, last);
        observer(&store, start..store.len());
        store.freeze();

        let (errors, warnings) = store.flagged_counts();
        info!(
            run = self.id.get(),
            lines = store.len(),
            chunks,
            errors,
            warnings,
            "Ingestion complete"
        );
        Ok(store)
    }

    fn append(&self, store: &mut LogStore, text: String) {
        let severity = self.classifier.classify(&text);
        store.push_line(text, severity);
    }

    fn cancelled(&self, mut store: LogStore) -> IngestFailure {
        let lines_emitted = store.len();
        warn!(run = self.id.get(), lines_emitted, "Ingestion cancelled");
        store.mark_cancelled();
        IngestFailure::new(IngestError::Cancelled { lines_emitted }, store)
    }

    fn failed(&self, error: IngestError, mut store: LogStore) -> IngestFailure {
        warn!(run = self.id.get(), %error, "Ingestion failed");
        store.mark_incomplete();
        IngestFailure::new(error, store)
    }
}

/// Owner of the committed store and of the in-flight run, if any.
///
/// The committed store only changes when a run completes and is committed
/// as the newest run, or when it is explicitly discarded. Failed and
/// superseded runs never replace it.
#[derive(Debug, Default)]
pub struct LogSession {
    classifier: Classifier,
    runs_started: u64,
    in_flight: Option<(RunId, CancellationToken)>,
    active: Option<LogStore>,
}

impl LogSession {
    /// Session with no committed store.
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            ..Self::default()
        }
    }

    /// Start a new run, cancelling the one in flight.
    pub fn begin(&mut self) -> IngestRun {
        if let Some((previous, token)) = self.in_flight.take() {
            info!(run = previous.get(), "Superseding in-flight ingestion");
            token.cancel();
        }
        self.runs_started += 1;
        let id = RunId(self.runs_started);
        let token = CancellationToken::new();
        self.in_flight = Some((id, token.clone()));
        IngestRun::with_token(id, token, self.classifier.clone())
    }

    /// Install the store produced by `run`.
    ///
    /// Returns `false` (and drops the store) if `run` is not the newest run
    /// or the store is not complete.
    pub fn commit(&mut self, run: RunId, store: LogStore) -> bool {
        match self.in_flight {
            Some((latest, _)) if latest == run && store.is_frozen() => {
                self.in_flight = None;
                self.active = Some(store);
                true
            }
            _ => {
                debug!(run = run.get(), "Discarding store from stale or incomplete run");
                false
            }
        }
    }

    /// Record that `run` ended without a committable store.
    ///
    /// The committed store is left untouched.
    pub fn abandon(&mut self, run: RunId) {
        if matches!(self.in_flight, Some((latest, _)) if latest == run) {
            self.in_flight = None;
        }
    }

    /// Run a full ingestion of `source` and commit it.
    ///
    /// # Errors
    ///
    /// On failure the previous committed store is kept and the failure
    /// (with its partial store) is returned.
    pub async fn ingest<S, F>(&mut self, source: &mut S, observer: F) -> Result<&LogStore, IngestFailure>
    where
        S: ChunkSource,
        F: FnMut(&LogStore, Range<usize>),
    {
        let run = self.begin();
        let id = run.id();
        match run.run(source, observer).await {
            Ok(store) => {
                // Holding `&mut self` across the run means nothing superseded it.
                self.in_flight = None;
                Ok(&*self.active.insert(store))
            }
            Err(failure) => {
                self.abandon(id);
                Err(failure)
            }
        }
    }

    /// The committed store.
    pub fn active(&self) -> Option<&LogStore> {
        self.active.as_ref()
    }

    /// True while a run started by this session has not been committed or abandoned.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Drop the committed store.
    pub fn discard(&mut self) -> Option<LogStore> {
        self.active.take()
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
