//! Gated multi-phase ingestion
//!
//! `Idle → Gate(1) → PhaseRunning(1) → Gate(2) → … → Done`, with `Aborted`
//! reachable from any gate and `Failed` from any store call. Gate 1 also
//! decides whether the existing graph is cleared.

use chronicle_kg::GraphStore;
use tracing::{error, info};

use crate::confirm::{ConfirmationSource, Decision};
use crate::error::Result;
use crate::gate::has_any_data;
use crate::loader::EpisodeLoader;
use crate::phase::Phase;
use crate::search::SearchOrchestrator;

/// Where the runner is; phase numbers are 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    /// Waiting for the decision that precedes phase n
    Gate(usize),
    PhaseRunning(usize),
    Done,
    Aborted,
    Failed,
}

/// How a run ended when no store call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Data already existed; nothing was cleared or loaded
    Skipped,
    /// Every phase was loaded
    Completed,
    /// The operator quit at a gate
    Aborted { completed_phases: usize },
}

pub struct PhaseRunner<'a, S, C>
where
    S: GraphStore,
    C: ConfirmationSource + ?Sized,
{
    store: &'a S,
    confirmation: &'a mut C,
    history: Vec<RunnerState>,
}

impl<'a, S, C> PhaseRunner<'a, S, C>
where
    S: GraphStore,
    C: ConfirmationSource + ?Sized,
{
    pub fn new(store: &'a S, confirmation: &'a mut C) -> Self {
        Self {
            store,
            confirmation,
            history: vec![RunnerState::Idle],
        }
    }

    /// Every state entered so far, in order
    pub fn history(&self) -> &[RunnerState] {
        &self.history
    }

    pub fn state(&self) -> RunnerState {
        self.history.last().copied().unwrap_or(RunnerState::Idle)
    }

    fn enter(&mut self, state: RunnerState) {
        info!("Runner state: {:?}", state);
        self.history.push(state);
    }

    /// Run `phases` in order. Store failures move the runner to `Failed`
    /// and propagate.
    pub async fn run(&mut self, phases: &[Phase]) -> Result<RunOutcome> {
        let result = self.drive(phases).await;
        if let Err(e) = &result {
            error!("Phase run failed: {}", e);
            self.enter(RunnerState::Failed);
        }
        result
    }

    async fn drive(&mut self, phases: &[Phase]) -> Result<RunOutcome> {
        if has_any_data(self.store).await? {
            println!("Knowledge graph data already exists. Skipping data loading.");
            self.enter(RunnerState::Done);
            return Ok(RunOutcome::Skipped);
        }

        for (index, phase) in phases.iter().enumerate() {
            let number = index + 1;
            self.enter(RunnerState::Gate(number));
            if index == 0 {
                println!("Do you want to clear existing data?");
            }

            if self.confirmation.next_decision()? == Decision::Quit {
                info!("Operator quit before phase {}", number);
                self.enter(RunnerState::Aborted);
                return Ok(RunOutcome::Aborted {
                    completed_phases: index,
                });
            }

            if index == 0 {
                println!("Clearing existing graph data...");
                self.store.clear_all_data().await?;
                println!("Graph data cleared successfully.");
            }

            self.enter(RunnerState::PhaseRunning(number));
            println!("\n=== PHASE {}: {} ===", number, phase.title.to_uppercase());

            let report = EpisodeLoader::new(self.store)
                .load(&phase.prefix, &phase.episodes)
                .await?;
            info!("Phase {} loaded {} episode(s)", number, report.len());

            SearchOrchestrator::new(self.store)
                .hybrid_search(&phase.query)
                .await?;
        }

        self.enter(RunnerState::Done);
        Ok(RunOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::ScriptedConfirmation;
    use chronicle_kg::{Episode, MemoryGraphStore};
    use serde_json::json;

    fn phases() -> Vec<Phase> {
        vec![
            Phase::new(
                "first",
                "First",
                vec![Episode::from_json(json!({"name": "A", "creator": "B"}), "meta").unwrap()],
                "creator",
            ),
            Phase::new(
                "second",
                "Second",
                vec![Episode::text("A was updated", "note")],
                "updated",
            ),
        ]
    }

    #[tokio::test]
    async fn test_full_run_history() {
        let store = MemoryGraphStore::new().unwrap();
        let mut confirmation = ScriptedConfirmation::new([Decision::Continue, Decision::Continue]);
        let mut runner = PhaseRunner::new(&store, &mut confirmation);

        let outcome = runner.run(&phases()).await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(
            runner.history(),
            &[
                RunnerState::Idle,
                RunnerState::Gate(1),
                RunnerState::PhaseRunning(1),
                RunnerState::Gate(2),
                RunnerState::PhaseRunning(2),
                RunnerState::Done,
            ]
        );
        assert_eq!(store.episode_count().await, 2);
    }

    #[tokio::test]
    async fn test_quit_at_first_gate() {
        let store = MemoryGraphStore::new().unwrap();
        let mut confirmation = ScriptedConfirmation::new([Decision::Quit]);
        let mut runner = PhaseRunner::new(&store, &mut confirmation);

        let outcome = runner.run(&phases()).await.unwrap();
        assert_eq!(outcome, RunOutcome::Aborted { completed_phases: 0 });
        assert_eq!(runner.state(), RunnerState::Aborted);
        assert_eq!(store.episode_count().await, 0);
    }

    #[tokio::test]
    async fn test_existing_data_skips_everything() {
        let store = MemoryGraphStore::new().unwrap();
        let mut confirmation = ScriptedConfirmation::new([Decision::Continue]);
        PhaseRunner::new(&store, &mut confirmation)
            .run(&phases()[..1])
            .await
            .unwrap();

        let mut again = ScriptedConfirmation::new([Decision::Continue]);
        let mut runner = PhaseRunner::new(&store, &mut again);
        let outcome = runner.run(&phases()).await.unwrap();

        assert_eq!(outcome, RunOutcome::Skipped);
        assert_eq!(runner.history(), &[RunnerState::Idle, RunnerState::Done]);
        assert_eq!(store.episode_count().await, 1);
        assert_eq!(again.asked(), 0);
    }
}
