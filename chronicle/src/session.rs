//! Scoped ownership of the graph store connection

use chronicle_kg::GraphStore;
use tracing::{error, warn};

use crate::error::Result;
use crate::runner::RunOutcome;

/// Owns the single store connection of a run.
///
/// [`StoreSession::finish`] consumes the session, so the store is closed at
/// most once. Dropping an unfinished session only logs a warning: closing
/// is async and cannot happen in `Drop`.
pub struct StoreSession<S: GraphStore> {
    store: S,
    closed: bool,
}

/// How a session ended, for the completion notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Complete,
    Aborted,
    Failed,
}

impl Completion {
    fn notice(&self) -> &'static str {
        match self {
            Completion::Complete => "Run complete",
            Completion::Aborted => "Run aborted by operator",
            Completion::Failed => "Run failed",
        }
    }
}

/// Maps a result onto the notice printed by [`StoreSession::finish`]
pub trait SessionResult {
    fn completion(&self) -> Completion;
}

impl<T: SessionResult> SessionResult for Result<T> {
    fn completion(&self) -> Completion {
        match self {
            Ok(value) => value.completion(),
            Err(_) => Completion::Failed,
        }
    }
}

impl SessionResult for () {
    fn completion(&self) -> Completion {
        Completion::Complete
    }
}

impl SessionResult for bool {
    fn completion(&self) -> Completion {
        Completion::Complete
    }
}

impl SessionResult for RunOutcome {
    fn completion(&self) -> Completion {
        match self {
            RunOutcome::Aborted { .. } => Completion::Aborted,
            RunOutcome::Skipped | RunOutcome::Completed => Completion::Complete,
        }
    }
}

impl<S: GraphStore> StoreSession<S> {
    pub fn open(store: S) -> Self {
        Self {
            store,
            closed: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Print the completion notice, close the store and hand back `result`.
    ///
    /// A close failure is logged; it replaces the result only when the
    /// result was a success.
    pub async fn finish<T>(mut self, result: Result<T>) -> Result<T>
    where
        Result<T>: SessionResult,
    {
        println!("\n{}", result.completion().notice());

        let closed = self.store.close().await;
        self.closed = true;
        println!("Connection closed");

        match (result, closed) {
            (Ok(_), Err(e)) => {
                error!("Failed to close graph store: {}", e);
                Err(e.into())
            }
            (result, Err(e)) => {
                error!("Failed to close graph store: {}", e);
                result
            }
            (result, Ok(())) => result,
        }
    }
}

impl<S: GraphStore> Drop for StoreSession<S> {
    fn drop(&mut self) {
        if !self.closed {
            warn!("Store session dropped without being finished; connection not closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chronicle_kg::{GraphError, MemoryGraphStore};

    #[test]
    fn test_completion_of_results() {
        let ok: Result<RunOutcome> = Ok(RunOutcome::Aborted {
            completed_phases: 1,
        });
        assert_eq!(ok.completion(), Completion::Aborted);

        let failed: Result<()> = Err(Error::Configuration("x".to_string()));
        assert_eq!(failed.completion(), Completion::Failed);
    }

    #[tokio::test]
    async fn test_finish_closes_and_returns_result() {
        let store = MemoryGraphStore::new().unwrap();
        let session = StoreSession::open(store);
        assert!(!session.store().probe_any_edge().await.unwrap());

        let result = session.finish(Ok(true)).await.unwrap();
        assert!(result);
    }

    #[tokio::test]
    async fn test_finish_keeps_the_original_error() {
        let session = StoreSession::open(MemoryGraphStore::new().unwrap());
        let err = session
            .finish::<()>(Err(GraphError::QueryError("boom".to_string()).into()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
