//! Sequential episode loading

use chrono::Utc;
use chronicle_kg::{Episode, EpisodeSubmission, GraphStore};
use tracing::info;

use crate::error::Result;

/// Names of the episodes a store acknowledged, in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub acknowledged: Vec<String>,
}

impl LoadReport {
    pub fn len(&self) -> usize {
        self.acknowledged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acknowledged.is_empty()
    }
}

/// Submits a batch one episode at a time.
///
/// Each submission is acknowledged before the next is sent: submission order
/// is the only precedence signal the store gets. The first failure stops the
/// batch; episodes already acknowledged stay.
pub struct EpisodeLoader<'a, S: GraphStore> {
    store: &'a S,
}

impl<'a, S: GraphStore> EpisodeLoader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn load(&self, prefix: &str, episodes: &[Episode]) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        for (index, episode) in episodes.iter().enumerate() {
            let name = format!("{} {}", prefix, index);
            let submission = EpisodeSubmission::new(name, episode, Utc::now())?;
            let ack = self.store.submit_episode(&submission).await?;

            println!(
                "Added episode: {} ({})",
                submission.name,
                submission.source_kind.as_str()
            );
            info!("Episode '{}' stored as {}", ack.name, ack.uuid);
            report.acknowledged.push(submission.name);
        }

        Ok(report)
    }
}
