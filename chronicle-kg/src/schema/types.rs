//! Type definitions for episodes, facts and entity nodes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use crate::error::{GraphError, Result};

/// Kind of content carried by an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Free text
    #[serde(rename = "text")]
    Text,
    /// A structured record serialized as JSON
    #[serde(rename = "json")]
    Structured,
}

impl SourceKind {
    /// Wire label used for storage and progress output
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Text => "text",
            SourceKind::Structured => "json",
        }
    }
}

/// Body of an episode before it is put on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EpisodeBody {
    /// Raw text observation
    Text(String),
    /// Structured record with insertion-ordered keys
    Structured(Map<String, JsonValue>),
}

impl EpisodeBody {
    /// The source kind matching this body
    pub fn source_kind(&self) -> SourceKind {
        match self {
            EpisodeBody::Text(_) => SourceKind::Text,
            EpisodeBody::Structured(_) => SourceKind::Structured,
        }
    }

    /// Canonical wire form: text verbatim, records as compact JSON
    pub fn to_wire(&self) -> Result<String> {
        match self {
            EpisodeBody::Text(text) => Ok(text.clone()),
            EpisodeBody::Structured(record) => Ok(serde_json::to_string(record)?),
        }
    }
}

/// An observation waiting to be loaded.
///
/// Name and submission time are assigned by the loader, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Content of the observation
    pub body: EpisodeBody,
    /// Free-text provenance label
    pub description: String,
}

impl Episode {
    /// Create a text episode
    pub fn text(content: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            body: EpisodeBody::Text(content.into()),
            description: description.into(),
        }
    }

    /// Create a structured episode from a record
    pub fn structured(record: Map<String, JsonValue>, description: impl Into<String>) -> Self {
        Self {
            body: EpisodeBody::Structured(record),
            description: description.into(),
        }
    }

    /// Create a structured episode from a JSON value, which must be an object
    pub fn from_json(value: JsonValue, description: impl Into<String>) -> Result<Self> {
        match value {
            JsonValue::Object(record) => Ok(Self::structured(record, description)),
            other => Err(GraphError::ValidationError(format!(
                "structured episode must be a JSON object, got {}",
                other
            ))),
        }
    }

    /// Source kind of the body
    pub fn source_kind(&self) -> SourceKind {
        self.body.source_kind()
    }
}

/// Wire form of an episode as received by a Graph Store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSubmission {
    /// `"{prefix} {index}"`, unique within a load run
    pub name: String,
    /// Serialized body
    pub body: String,
    /// How `body` should be interpreted
    pub source_kind: SourceKind,
    /// Provenance label
    pub description: String,
    /// Wall-clock time of ingestion
    pub submission_time: DateTime<Utc>,
}

impl EpisodeSubmission {
    /// Serialize an episode for submission
    pub fn new(name: String, episode: &Episode, submission_time: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            name,
            body: episode.body.to_wire()?,
            source_kind: episode.source_kind(),
            description: episode.description.clone(),
            submission_time,
        })
    }

    /// Parse the body back into a record (structured episodes only)
    pub fn record(&self) -> Result<Option<Map<String, JsonValue>>> {
        if self.source_kind != SourceKind::Structured {
            return Ok(None);
        }
        match serde_json::from_str::<JsonValue>(&self.body)? {
            JsonValue::Object(record) => Ok(Some(record)),
            _ => Err(GraphError::ValidationError(format!(
                "episode '{}' is marked json but is not an object",
                self.name
            ))),
        }
    }
}

/// Acknowledgement returned once a store has accepted an episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeAck {
    /// UUID assigned to the stored episode
    pub uuid: Uuid,
    /// Name the episode was submitted under
    pub name: String,
}

/// Stored episode node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodicNode {
    pub uuid: Uuid,
    pub name: String,
    pub content: String,
    pub source: SourceKind,
    pub source_description: String,
    pub created_at: DateTime<Utc>,
    /// Equal to the submission time
    pub valid_at: DateTime<Utc>,
}

impl EpisodicNode {
    /// Build the stored node for a submission
    pub fn from_submission(submission: &EpisodeSubmission) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: submission.name.clone(),
            content: submission.body.clone(),
            source: submission.source_kind,
            source_description: submission.description.clone(),
            created_at: Utc::now(),
            valid_at: submission.submission_time,
        }
    }
}

/// A directed factual relationship between two entity nodes.
///
/// `valid_at` / `invalid_at` bound the period the fact was observed to hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub uuid: Uuid,
    /// Relation label (e.g. `CREATOR`)
    pub name: String,
    /// Human-readable fact text
    pub fact: String,
    pub source_node_uuid: Uuid,
    pub target_node_uuid: Uuid,
    pub valid_at: Option<DateTime<Utc>>,
    pub invalid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Fact {
    /// Whether the fact has not been superseded
    pub fn is_valid(&self) -> bool {
        self.invalid_at.is_none()
    }
}

/// An entity in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityNode {
    pub uuid: Uuid,
    pub name: String,
    pub summary: String,
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub attributes: Map<String, JsonValue>,
}

impl EntityNode {
    /// Label carried by every entity node
    pub const LABEL: &'static str = "Entity";

    /// Create an empty entity
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            summary: String::new(),
            labels: vec![Self::LABEL.to_string()],
            created_at,
            attributes: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_kind_conversion() {
        assert_eq!(SourceKind::Text.as_str(), "text");
        assert_eq!(SourceKind::Structured.as_str(), "json");
        assert_eq!(serde_json::to_value(SourceKind::Structured).unwrap(), "json");
    }

    #[test]
    fn test_structured_wire_form_keeps_key_order() {
        let episode = Episode::from_json(
            json!({"name": "Gemini 2.5 Pro", "creator": "Google", "ranking": 1}),
            "LLM metadata",
        )
        .unwrap();

        assert_eq!(episode.source_kind(), SourceKind::Structured);
        assert_eq!(
            episode.body.to_wire().unwrap(),
            r#"{"name":"Gemini 2.5 Pro","creator":"Google","ranking":1}"#
        );
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        let err = Episode::from_json(json!(["a", "b"]), "bad").unwrap_err();
        assert!(matches!(err, GraphError::ValidationError(_)));
    }

    #[test]
    fn test_submission_record_parsing() {
        let now = Utc::now();
        let text = EpisodeSubmission::new(
            "Batch 0".to_string(),
            &Episode::text("plain words", "note"),
            now,
        )
        .unwrap();
        assert_eq!(text.body, "plain words");
        assert!(text.record().unwrap().is_none());

        let structured = EpisodeSubmission::new(
            "Batch 1".to_string(),
            &Episode::from_json(json!({"name": "GPT-5"}), "meta").unwrap(),
            now,
        )
        .unwrap();
        let record = structured.record().unwrap().unwrap();
        assert_eq!(record["name"], json!("GPT-5"));
        assert_eq!(structured.submission_time, now);
    }

    #[test]
    fn test_entity_node_defaults() {
        let node = EntityNode::new("Anthropic", Utc::now());
        assert_eq!(node.labels, vec!["Entity".to_string()]);
        assert!(node.summary.is_empty());
        assert!(node.attributes.is_empty());
    }
}
