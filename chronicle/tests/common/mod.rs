//! Recording graph store for orchestration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::Utc;
use chronicle_kg::{
    EntityNode, EpisodeAck, EpisodeSubmission, Fact, GraphError, GraphStore, Result, SearchConfig,
};
use uuid::Uuid;

/// One call made against the store
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Submit(String),
    Probe,
    Clear,
    Search(String, Option<Uuid>),
    SearchNodes(String, usize),
    Close,
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    pub in_flight: usize,
    pub max_in_flight: usize,
    /// Recipes handed to `search_nodes`
    pub node_configs: Vec<SearchConfig>,
}

/// Scripted behaviour of a [`RecordingStore`]
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Answer of `probe_any_edge`
    pub has_data: bool,
    /// Zero-based submission that fails
    pub fail_submission: Option<usize>,
    pub facts: Vec<Fact>,
    pub reranked: Vec<Fact>,
    pub nodes: Vec<EntityNode>,
}

#[derive(Clone)]
pub struct RecordingStore {
    pub recorder: Arc<Mutex<Recorder>>,
    script: Script,
}

impl RecordingStore {
    pub fn new(script: Script) -> Self {
        Self {
            recorder: Arc::new(Mutex::new(Recorder::default())),
            script,
        }
    }

    pub fn empty() -> Self {
        Self::new(Script::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.recorder.lock().unwrap().calls.clone()
    }

    pub fn submitted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Submit(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::Close).count()
    }

    pub fn node_configs(&self) -> Vec<SearchConfig> {
        self.recorder.lock().unwrap().node_configs.clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.recorder.lock().unwrap().max_in_flight
    }

    fn record(&self, call: Call) {
        self.recorder.lock().unwrap().calls.push(call);
    }
}

impl GraphStore for RecordingStore {
    async fn submit_episode(&self, submission: &EpisodeSubmission) -> Result<EpisodeAck> {
        let index = {
            let mut recorder = self.recorder.lock().unwrap();
            recorder.calls.push(Call::Submit(submission.name.clone()));
            recorder.in_flight += 1;
            recorder.max_in_flight = recorder.max_in_flight.max(recorder.in_flight);
            recorder
                .calls
                .iter()
                .filter(|c| matches!(c, Call::Submit(_)))
                .count()
                - 1
        };

        tokio::task::yield_now().await;
        self.recorder.lock().unwrap().in_flight -= 1;

        if self.script.fail_submission == Some(index) {
            return Err(GraphError::ConnectionError("connection reset".to_string()));
        }
        Ok(EpisodeAck {
            uuid: Uuid::new_v4(),
            name: submission.name.clone(),
        })
    }

    async fn probe_any_edge(&self) -> Result<bool> {
        self.record(Call::Probe);
        Ok(self.script.has_data)
    }

    async fn clear_all_data(&self) -> Result<()> {
        self.record(Call::Clear);
        Ok(())
    }

    async fn search(&self, query: &str, center_node_uuid: Option<Uuid>) -> Result<Vec<Fact>> {
        self.record(Call::Search(query.to_string(), center_node_uuid));
        Ok(match center_node_uuid {
            Some(_) => self.script.reranked.clone(),
            None => self.script.facts.clone(),
        })
    }

    async fn search_nodes(&self, query: &str, config: &SearchConfig) -> Result<Vec<EntityNode>> {
        {
            let mut recorder = self.recorder.lock().unwrap();
            recorder.calls.push(Call::SearchNodes(query.to_string(), config.limit));
            recorder.node_configs.push(config.clone());
        }
        Ok(self.script.nodes.clone())
    }

    async fn close(&self) -> Result<()> {
        self.record(Call::Close);
        Ok(())
    }
}

pub fn fact(text: &str) -> Fact {
    Fact {
        uuid: Uuid::new_v4(),
        name: "ASSESSMENT".to_string(),
        fact: text.to_string(),
        source_node_uuid: Uuid::new_v4(),
        target_node_uuid: Uuid::new_v4(),
        valid_at: Some(Utc::now()),
        invalid_at: None,
        created_at: Utc::now(),
    }
}

pub fn node(name: &str, summary: &str) -> EntityNode {
    let mut node = EntityNode::new(name, Utc::now());
    node.summary = summary.to_string();
    node
}
