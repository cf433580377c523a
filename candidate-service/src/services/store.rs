use crate::models::{Candidate, CandidateSummary};
use async_trait::async_trait;
use mongodb::error::ErrorKind;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use thiserror::Error;

/// Failure kinds surfaced by a [`CandidateStore`].
///
/// The HTTP layer decides how these collapse into status codes; see
/// `handlers::candidates::CandidateError`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no matching candidate")]
    NotFound,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed query: {0}")]
    MalformedQuery(String),
}

impl StoreError {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound => "not_found",
            StoreError::Transport(_) => "transport",
            StoreError::MalformedQuery(_) => "malformed_query",
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match &*err.kind {
            ErrorKind::InvalidArgument { .. }
            | ErrorKind::BsonDeserialization(_)
            | ErrorKind::BsonSerialization(_)
            | ErrorKind::Command(_)
            | ErrorKind::Write(_)
            | ErrorKind::BulkWrite(_)
            | ErrorKind::InvalidResponse { .. } => StoreError::MalformedQuery(err.to_string()),
            _ => StoreError::Transport(err.to_string()),
        }
    }
}

/// The three operations the HTTP layer needs from the candidates collection.
///
/// Implementations must be safe to share across all in-flight requests.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Equality match on `CandidateName` over the whole collection. An empty
    /// result is not an error at this level.
    async fn find_by_name(&self, name: &str) -> Result<Vec<CandidateSummary>, StoreError>;

    async fn list_all(&self) -> Result<Vec<CandidateSummary>, StoreError>;

    /// Insert-or-replace the record keyed by `name`.
    async fn upsert(&self, name: &str) -> Result<Candidate, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Process-local store for tests and offline runs.
#[derive(Default)]
pub struct InMemoryCandidateStore {
    candidates: Mutex<BTreeMap<String, Candidate>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryCandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read fail with a transport error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail with a transport error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        self.lock().map(|c| c.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|n| n == 0)
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("simulated read failure".to_string()));
        }
        Ok(())
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Candidate>>, StoreError> {
        self.candidates
            .lock()
            .map_err(|e| StoreError::Transport(format!("in-memory store mutex poisoned: {}", e)))
    }
}

#[async_trait]
impl CandidateStore for InMemoryCandidateStore {
    async fn find_by_name(&self, name: &str) -> Result<Vec<CandidateSummary>, StoreError> {
        self.check_reads()?;
        Ok(self
            .lock()?
            .values()
            .filter(|c| c.candidate_name == name)
            .map(Candidate::summary)
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<CandidateSummary>, StoreError> {
        self.check_reads()?;
        Ok(self.lock()?.values().map(Candidate::summary).collect())
    }

    async fn upsert(&self, name: &str) -> Result<Candidate, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("simulated write failure".to_string()));
        }
        let candidate = Candidate::new(name);
        self.lock()?.insert(candidate.id.clone(), candidate.clone());
        Ok(candidate)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_reads()
    }
}
