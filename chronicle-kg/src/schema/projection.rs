//! Deterministic projection of structured records onto the graph
//!
//! A record names one subject entity. Scalar values become attributes of that
//! entity, string values (and string items of arrays) become claims: facts
//! pointing at an entity named by the value. Both backends share this logic so
//! they agree on what a record means and on which older facts it supersedes.

use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// Key that names the subject entity of a record
pub const SUBJECT_KEY: &str = "name";

/// One claim derived from a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Relation label, upper snake case of the record key
    pub relation: String,
    /// Name of the entity the fact points at
    pub target: String,
    /// Human-readable fact text
    pub fact: String,
}

/// Everything a record contributes to the graph
#[derive(Debug, Clone, PartialEq)]
pub struct RecordProjection {
    /// Subject entity name
    pub subject: String,
    /// Scalar attributes to merge into the subject
    pub attributes: Map<String, JsonValue>,
    /// Claims in record order
    pub claims: Vec<Claim>,
}

impl RecordProjection {
    /// Relation labels asserted by this record, in first-seen order
    pub fn relations(&self) -> Vec<&str> {
        let mut relations: Vec<&str> = Vec::new();
        for claim in &self.claims {
            if !relations.contains(&claim.relation.as_str()) {
                relations.push(&claim.relation);
            }
        }
        relations
    }
}

/// Project a record. Returns `None` when the record has no string `name`.
pub fn project_record(record: &Map<String, JsonValue>) -> Option<RecordProjection> {
    let subject = record
        .get(SUBJECT_KEY)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let mut attributes = Map::new();
    let mut claims = Vec::new();

    for (key, value) in record {
        if key == SUBJECT_KEY {
            continue;
        }
        match value {
            JsonValue::Number(_) | JsonValue::Bool(_) => {
                attributes.insert(key.clone(), value.clone());
            }
            JsonValue::String(s) => {
                if let Some(claim) = claim_for(&subject, key, s) {
                    claims.push(claim);
                }
            }
            JsonValue::Array(items) => {
                for item in items.iter().filter_map(|v| v.as_str()) {
                    if let Some(claim) = claim_for(&subject, key, item) {
                        claims.push(claim);
                    }
                }
            }
            JsonValue::Object(_) | JsonValue::Null => {}
        }
    }

    Some(RecordProjection {
        subject,
        attributes,
        claims,
    })
}

fn claim_for(subject: &str, key: &str, value: &str) -> Option<Claim> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(Claim {
        relation: relation_label(key),
        target: value.to_string(),
        fact: format!("{} {}: {}", subject, key.replace('_', " "), value),
    })
}

/// `release_date` -> `RELEASE_DATE`
pub fn relation_label(key: &str) -> String {
    key.trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}

/// A fact of the subject that is currently in force
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingFact {
    pub uuid: Uuid,
    pub relation: String,
    pub fact: String,
}

/// What a store must do to apply a projection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupersessionPlan {
    /// Facts to close with the new episode's submission time
    pub invalidate: Vec<Uuid>,
    /// Claims that need a new fact
    pub create: Vec<Claim>,
}

/// Decide which facts a projection supersedes.
///
/// Only relations asserted by the record are touched. Within them, texts that
/// are asserted again stay as they are, the rest are invalidated.
pub fn plan_supersession(existing: &[ExistingFact], projection: &RecordProjection) -> SupersessionPlan {
    let relations = projection.relations();
    let mut plan = SupersessionPlan::default();

    for fact in existing {
        if !relations.contains(&fact.relation.as_str()) {
            continue;
        }
        let reasserted = projection
            .claims
            .iter()
            .any(|c| c.relation == fact.relation && c.fact == fact.fact);
        if !reasserted {
            plan.invalidate.push(fact.uuid);
        }
    }

    for claim in &projection.claims {
        let known = existing
            .iter()
            .any(|f| f.relation == claim.relation && f.fact == claim.fact);
        let queued = plan.create.iter().any(|c| c == claim);
        if !known && !queued {
            plan.create.push(claim.clone());
        }
    }

    plan
}

/// Names from `candidates` that occur in `text`, case-insensitively
pub fn mentioned_names<'a, I>(text: &str, candidates: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let haystack = text.to_lowercase();
    candidates
        .into_iter()
        .filter(|name| !name.trim().is_empty() && haystack.contains(&name.to_lowercase()))
        .collect()
}

/// Append an episode's text to an entity summary
pub fn append_summary(summary: &str, content: &str) -> String {
    if summary.is_empty() {
        content.to_string()
    } else {
        format!("{} {}", summary, content)
    }
}
