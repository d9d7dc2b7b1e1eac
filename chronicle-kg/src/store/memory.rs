//! In-memory graph store
//!
//! Keeps the whole graph in process behind a `tokio::sync::Mutex`. Lexical
//! ranking comes from RAM Tantivy indexes over fact text and over node name
//! plus summary.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::{fact_search_config, GraphStore};
use crate::error::{GraphError, Result};
use crate::schema::{
    append_summary, mentioned_names, plan_supersession, project_record, EntityNode, EpisodeAck,
    EpisodeSubmission, EpisodicNode, ExistingFact, Fact, RecordProjection, SourceKind,
};
use crate::search::{hop_distances, node_text, rank_facts, rank_nodes, tokenize, LexicalIndex, SearchConfig};

struct MemoryState {
    episodes: Vec<EpisodicNode>,
    nodes: Vec<EntityNode>,
    facts: Vec<Fact>,
    /// (episode, entity) links created by text episodes
    mentions: Vec<(Uuid, Uuid)>,
    fact_index: LexicalIndex,
    node_index: LexicalIndex,
    closed: bool,
}

impl MemoryState {
    fn new() -> Result<Self> {
        Ok(Self {
            episodes: Vec::new(),
            nodes: Vec::new(),
            facts: Vec::new(),
            mentions: Vec::new(),
            fact_index: LexicalIndex::new()?,
            node_index: LexicalIndex::new()?,
            closed: false,
        })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(GraphError::ConnectionError("graph store is closed".to_string()));
        }
        Ok(())
    }

    /// Position of the entity named `name`, creating it when unknown
    fn entity(&mut self, name: &str, created_at: DateTime<Utc>) -> Result<usize> {
        if let Some(pos) = self.nodes.iter().position(|n| n.name == name) {
            return Ok(pos);
        }
        let node = EntityNode::new(name, created_at);
        self.node_index.upsert(node.uuid, &node_text(&node))?;
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    fn apply_projection(&mut self, projection: &RecordProjection, submitted_at: DateTime<Utc>) -> Result<()> {
        let subject = self.entity(&projection.subject, submitted_at)?;
        let subject_uuid = self.nodes[subject].uuid;
        for (key, value) in &projection.attributes {
            self.nodes[subject].attributes.insert(key.clone(), value.clone());
        }

        let existing: Vec<ExistingFact> = self
            .facts
            .iter()
            .filter(|f| f.source_node_uuid == subject_uuid && f.is_valid())
            .map(|f| ExistingFact {
                uuid: f.uuid,
                relation: f.name.clone(),
                fact: f.fact.clone(),
            })
            .collect();
        let plan = plan_supersession(&existing, projection);

        for fact in self.facts.iter_mut().filter(|f| plan.invalidate.contains(&f.uuid)) {
            debug!("Invalidating fact {}: {}", fact.uuid, fact.fact);
            fact.invalid_at = Some(submitted_at);
        }

        for claim in plan.create {
            let target = self.entity(&claim.target, submitted_at)?;
            let fact = Fact {
                uuid: Uuid::new_v4(),
                name: claim.relation,
                fact: claim.fact,
                source_node_uuid: subject_uuid,
                target_node_uuid: self.nodes[target].uuid,
                valid_at: Some(submitted_at),
                invalid_at: None,
                created_at: Utc::now(),
            };
            self.fact_index.upsert(fact.uuid, &fact.fact)?;
            self.facts.push(fact);
        }

        Ok(())
    }

    fn apply_mentions(&mut self, episode_uuid: Uuid, content: &str) -> Result<()> {
        let names: Vec<String> = mentioned_names(content, self.nodes.iter().map(|n| n.name.as_str()))
            .into_iter()
            .map(str::to_string)
            .collect();

        for node in self.nodes.iter_mut().filter(|n| names.contains(&n.name)) {
            node.summary = append_summary(&node.summary, content);
            self.node_index.upsert(node.uuid, &node_text(node))?;
            self.mentions.push((episode_uuid, node.uuid));
        }
        Ok(())
    }

    /// Hop distances over every fact, valid or not
    fn distances_from(&self, center: Uuid) -> HashMap<Uuid, u32> {
        hop_distances(
            self.facts.iter().map(|f| (f.source_node_uuid, f.target_node_uuid)),
            center,
        )
    }

    fn commit(&mut self) -> Result<()> {
        self.fact_index.commit()?;
        self.node_index.commit()
    }
}

/// Graph store that lives entirely in process memory
pub struct MemoryGraphStore {
    state: Mutex<MemoryState>,
}

impl MemoryGraphStore {
    /// Create an empty store
    pub fn new() -> Result<Self> {
        Ok(Self {
            state: Mutex::new(MemoryState::new()?),
        })
    }

    /// Snapshot of every fact, in creation order
    pub async fn facts(&self) -> Vec<Fact> {
        self.state.lock().await.facts.clone()
    }

    /// Entity with exactly this name
    pub async fn entity_by_name(&self, name: &str) -> Option<EntityNode> {
        self.state
            .lock()
            .await
            .nodes
            .iter()
            .find(|n| n.name == name)
            .cloned()
    }

    /// Number of stored episodes
    pub async fn episode_count(&self) -> usize {
        self.state.lock().await.episodes.len()
    }
}

impl GraphStore for MemoryGraphStore {
    async fn submit_episode(&self, submission: &EpisodeSubmission) -> Result<EpisodeAck> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;

        let episode = EpisodicNode::from_submission(submission);
        debug!("Storing episode '{}' ({})", episode.name, episode.source.as_str());

        match submission.source_kind {
            SourceKind::Structured => {
                let record = submission.record()?.unwrap_or_default();
                match project_record(&record) {
                    Some(projection) => {
                        state.apply_projection(&projection, submission.submission_time)?
                    }
                    None => debug!("Episode '{}' names no entity", episode.name),
                }
            }
            SourceKind::Text => state.apply_mentions(episode.uuid, &submission.body)?,
        }
        state.commit()?;

        let ack = EpisodeAck {
            uuid: episode.uuid,
            name: episode.name.clone(),
        };
        state.episodes.push(episode);
        Ok(ack)
    }

    async fn probe_any_edge(&self) -> Result<bool> {
        let state = self.state.lock().await;
        state.ensure_open()?;
        Ok(!state.facts.is_empty() || !state.mentions.is_empty())
    }

    async fn clear_all_data(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;

        state.episodes.clear();
        state.nodes.clear();
        state.facts.clear();
        state.mentions.clear();
        state.fact_index.clear()?;
        state.node_index.clear()?;
        info!("Cleared in-memory graph");
        Ok(())
    }

    async fn search(&self, query: &str, center_node_uuid: Option<Uuid>) -> Result<Vec<Fact>> {
        let state = self.state.lock().await;
        state.ensure_open()?;
        if tokenize(query).is_empty() {
            return Ok(Vec::new());
        }

        let config = fact_search_config(center_node_uuid);
        let lexical: Vec<Uuid> = state
            .fact_index
            .search(query, state.facts.len().max(1))?
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        let distances = config.distance_center()?.map(|center| state.distances_from(center));

        let results = rank_facts(query, state.facts.clone(), &lexical, distances.as_ref(), &config);
        debug!("Fact search '{}' matched {} fact(s)", query, results.len());
        Ok(results)
    }

    async fn search_nodes(&self, query: &str, config: &SearchConfig) -> Result<Vec<EntityNode>> {
        let state = self.state.lock().await;
        state.ensure_open()?;
        let center = config.distance_center()?;
        if tokenize(query).is_empty() {
            return Ok(Vec::new());
        }

        let lexical: Vec<Uuid> = state
            .node_index
            .search(query, state.nodes.len().max(1))?
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        let distances = center.map(|center| state.distances_from(center));

        let results = rank_nodes(query, state.nodes.clone(), &lexical, distances.as_ref(), config);
        debug!("Node search '{}' matched {} node(s)", query, results.len());
        Ok(results)
    }

    async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.closed = true;
        debug!("In-memory graph store closed");
        Ok(())
    }
}
