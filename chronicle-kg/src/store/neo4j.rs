//! Neo4j graph store
//!
//! Layout:
//! - `(:Episodic {uuid, name, content, source, source_description, created_at, valid_at})`
//! - `(:Entity {uuid, name, summary, attributes, created_at})`, attributes as a JSON string
//! - `(:Entity)-[:RELATES_TO {uuid, name, fact, valid_at, invalid_at, created_at, episode_uuid}]->(:Entity)`
//! - `(:Episodic)-[:MENTIONS]->(:Entity)`
//!
//! Timestamps are stored as RFC 3339 strings.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use neo4rs::{query, Graph, Query, Row};
use serde_json::{Map, Value as JsonValue};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{fact_search_config, GraphStore};
use crate::connection::{Neo4jClient, Neo4jSettings};
use crate::error::{GraphError, Result};
use crate::schema::{
    mentioned_names, plan_supersession, project_record, EntityNode, EpisodeAck,
    EpisodeSubmission, EpisodicNode, ExistingFact, Fact, RecordProjection, SourceKind,
};
use crate::search::{
    escape_lucene, lexical_query, rank_facts, rank_nodes, tokenize, SearchConfig, UNREACHABLE_DISTANCE,
};

/// Full-text index over relationship name and fact text
pub const FACT_TEXT_INDEX: &str = "fact_text";

/// Full-text index over entity name and summary
pub const NODE_TEXT_INDEX: &str = "node_name_and_summary";

/// Full-text hits fetched per result slot before fusion
const CANDIDATE_FACTOR: usize = 5;
const MIN_CANDIDATES: usize = 50;

const INDEX_STATEMENTS: &[&str] = &[
    "CREATE INDEX entity_uuid IF NOT EXISTS FOR (n:Entity) ON (n.uuid)",
    "CREATE INDEX entity_name IF NOT EXISTS FOR (n:Entity) ON (n.name)",
    "CREATE INDEX episode_uuid IF NOT EXISTS FOR (n:Episodic) ON (n.uuid)",
    "CREATE INDEX relation_uuid IF NOT EXISTS FOR ()-[e:RELATES_TO]-() ON (e.uuid)",
    "CREATE FULLTEXT INDEX fact_text IF NOT EXISTS FOR ()-[e:RELATES_TO]-() ON EACH [e.name, e.fact]",
    "CREATE FULLTEXT INDEX node_name_and_summary IF NOT EXISTS FOR (n:Entity) ON EACH [n.name, n.summary]",
];

/// Graph store backed by a Neo4j database
pub struct Neo4jGraphStore {
    client: RwLock<Option<Neo4jClient>>,
}

impl Neo4jGraphStore {
    /// Connect, verify the database and build indexes
    pub async fn connect(settings: &Neo4jSettings) -> Result<Self> {
        let client = Neo4jClient::connect(settings).await?;
        let store = Self {
            client: RwLock::new(Some(client)),
        };
        store.build_indices_and_constraints().await?;
        Ok(store)
    }

    /// Create the uuid and full-text indexes; safe to repeat
    pub async fn build_indices_and_constraints(&self) -> Result<()> {
        let graph = self.graph().await?;
        for statement in INDEX_STATEMENTS {
            graph
                .run(query(statement))
                .await
                .map_err(|e| GraphError::QueryError(format!("Failed to create index: {}", e)))?;
        }
        info!("Graph indexes ready");
        Ok(())
    }

    async fn graph(&self) -> Result<Graph> {
        self.client
            .read()
            .await
            .as_ref()
            .map(|client| client.graph().clone())
            .ok_or_else(|| GraphError::ConnectionError("graph store is closed".to_string()))
    }

    /// Entity uuid for `name`, creating the entity when unknown
    async fn merge_entity(&self, graph: &Graph, name: &str, created_at: DateTime<Utc>) -> Result<(Uuid, String)> {
        let cypher = query(
            "MERGE (n:Entity {name: $name})
             ON CREATE SET n.uuid = $uuid, n.summary = '', n.attributes = '{}', n.created_at = $created_at
             RETURN n.uuid AS uuid, coalesce(n.attributes, '{}') AS attributes",
        )
        .param("name", name)
        .param("uuid", Uuid::new_v4().to_string())
        .param("created_at", created_at.to_rfc3339());

        let row = fetch_rows(graph, cypher, "merge entity")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GraphError::QueryError(format!("Entity '{}' was not merged", name)))?;
        Ok((get_uuid(&row, "uuid")?, get_string(&row, "attributes")?))
    }

    async fn apply_projection(
        &self,
        graph: &Graph,
        projection: &RecordProjection,
        episode_uuid: Uuid,
        submitted_at: DateTime<Utc>,
    ) -> Result<()> {
        let (subject, stored_attributes) = self.merge_entity(graph, &projection.subject, submitted_at).await?;

        if !projection.attributes.is_empty() {
            let mut attributes: Map<String, JsonValue> =
                serde_json::from_str(&stored_attributes).unwrap_or_default();
            for (key, value) in &projection.attributes {
                attributes.insert(key.clone(), value.clone());
            }
            let cypher = query("MATCH (n:Entity {uuid: $uuid}) SET n.attributes = $attributes")
                .param("uuid", subject.to_string())
                .param("attributes", serde_json::to_string(&attributes)?);
            run(graph, cypher, "update attributes").await?;
        }

        let cypher = query(
            "MATCH (n:Entity {uuid: $uuid})-[r:RELATES_TO]->()
             WHERE r.invalid_at IS NULL
             RETURN r.uuid AS uuid, r.name AS name, r.fact AS fact",
        )
        .param("uuid", subject.to_string());
        let mut existing = Vec::new();
        for row in fetch_rows(graph, cypher, "load current facts").await? {
            existing.push(ExistingFact {
                uuid: get_uuid(&row, "uuid")?,
                relation: get_string(&row, "name")?,
                fact: get_string(&row, "fact")?,
            });
        }

        let plan = plan_supersession(&existing, projection);
        if !plan.invalidate.is_empty() {
            debug!("Invalidating {} fact(s) of '{}'", plan.invalidate.len(), projection.subject);
            let cypher = query(
                "MATCH ()-[r:RELATES_TO]->() WHERE r.uuid IN $uuids SET r.invalid_at = $invalid_at",
            )
            .param(
                "uuids",
                plan.invalidate.iter().map(Uuid::to_string).collect::<Vec<_>>(),
            )
            .param("invalid_at", submitted_at.to_rfc3339());
            run(graph, cypher, "invalidate facts").await?;
        }

        for claim in plan.create {
            let (target, _) = self.merge_entity(graph, &claim.target, submitted_at).await?;
            let cypher = query(
                "MATCH (s:Entity {uuid: $source}), (t:Entity {uuid: $target})
                 CREATE (s)-[:RELATES_TO {
                     uuid: $uuid,
                     name: $name,
                     fact: $fact,
                     valid_at: $valid_at,
                     created_at: $created_at,
                     episode_uuid: $episode_uuid
                 }]->(t)",
            )
            .param("source", subject.to_string())
            .param("target", target.to_string())
            .param("uuid", Uuid::new_v4().to_string())
            .param("name", claim.relation)
            .param("fact", claim.fact)
            .param("valid_at", submitted_at.to_rfc3339())
            .param("created_at", Utc::now().to_rfc3339())
            .param("episode_uuid", episode_uuid.to_string());
            run(graph, cypher, "create fact").await?;
        }

        Ok(())
    }

    async fn apply_mentions(&self, graph: &Graph, episode_uuid: Uuid, content: &str) -> Result<()> {
        let mut names = Vec::new();
        for row in fetch_rows(graph, query("MATCH (n:Entity) RETURN n.name AS name"), "list entities").await? {
            names.push(get_string(&row, "name")?);
        }

        for name in mentioned_names(content, names.iter().map(String::as_str)) {
            let cypher = query(
                "MATCH (e:Episodic {uuid: $episode}), (n:Entity {name: $name})
                 SET n.summary = CASE WHEN coalesce(n.summary, '') = '' THEN $content
                                      ELSE n.summary + ' ' + $content END
                 MERGE (e)-[:MENTIONS]->(n)",
            )
            .param("episode", episode_uuid.to_string())
            .param("name", name)
            .param("content", content);
            run(graph, cypher, "link mention").await?;
        }
        Ok(())
    }

    async fn hop_distances(&self, graph: &Graph, center: Uuid, nodes: Vec<String>) -> Result<HashMap<Uuid, u32>> {
        let cypher = query(
            "MATCH (c:Entity {uuid: $center})
             UNWIND $uuids AS id
             MATCH (n:Entity {uuid: id})
             WHERE n <> c
             OPTIONAL MATCH p = shortestPath((c)-[:RELATES_TO*..10]-(n))
             RETURN id AS uuid, coalesce(length(p), -1) AS hops",
        )
        .param("center", center.to_string())
        .param("uuids", nodes);

        let mut distances = HashMap::from([(center, 0)]);
        for row in fetch_rows(graph, cypher, "compute distances").await? {
            let hops: i64 = row
                .get("hops")
                .map_err(|e| GraphError::QueryError(format!("Failed to read hops: {}", e)))?;
            if hops >= 0 {
                distances.insert(get_uuid(&row, "uuid")?, (hops as u32).min(UNREACHABLE_DISTANCE));
            }
        }
        Ok(distances)
    }
}

impl GraphStore for Neo4jGraphStore {
    async fn submit_episode(&self, submission: &EpisodeSubmission) -> Result<EpisodeAck> {
        let graph = self.graph().await?;
        let episode = EpisodicNode::from_submission(submission);
        debug!("Storing episode '{}' ({})", episode.name, episode.source.as_str());

        let cypher = query(
            "CREATE (e:Episodic {
                uuid: $uuid,
                name: $name,
                content: $content,
                source: $source,
                source_description: $source_description,
                created_at: $created_at,
                valid_at: $valid_at
            })",
        )
        .param("uuid", episode.uuid.to_string())
        .param("name", episode.name.clone())
        .param("content", episode.content.clone())
        .param("source", episode.source.as_str())
        .param("source_description", episode.source_description.clone())
        .param("created_at", episode.created_at.to_rfc3339())
        .param("valid_at", episode.valid_at.to_rfc3339());
        run(&graph, cypher, "create episode").await?;

        match submission.source_kind {
            SourceKind::Structured => {
                let record = submission.record()?.unwrap_or_default();
                match project_record(&record) {
                    Some(projection) => {
                        self.apply_projection(&graph, &projection, episode.uuid, submission.submission_time)
                            .await?
                    }
                    None => debug!("Episode '{}' names no entity", episode.name),
                }
            }
            SourceKind::Text => self.apply_mentions(&graph, episode.uuid, &submission.body).await?,
        }

        Ok(EpisodeAck {
            uuid: episode.uuid,
            name: episode.name,
        })
    }

    async fn probe_any_edge(&self) -> Result<bool> {
        let graph = self.graph().await?;
        let rows = fetch_rows(&graph, query("MATCH (n1)-[r]->(n2) RETURN r LIMIT 1"), "probe edges").await?;
        Ok(!rows.is_empty())
    }

    async fn clear_all_data(&self) -> Result<()> {
        let graph = self.graph().await?;
        run(&graph, query("MATCH (n) DETACH DELETE n"), "clear graph").await?;
        info!("Cleared graph data");
        Ok(())
    }

    async fn search(&self, query_text: &str, center_node_uuid: Option<Uuid>) -> Result<Vec<Fact>> {
        if tokenize(query_text).is_empty() {
            return Ok(Vec::new());
        }
        let graph = self.graph().await?;
        let config = fact_search_config(center_node_uuid);

        let cypher = query(
            "CALL db.index.fulltext.queryRelationships($index, $query)
             YIELD relationship AS r, score
             MATCH (s:Entity)-[r]->(t:Entity)
             RETURN r.uuid AS uuid, r.name AS name, r.fact AS fact,
                    s.uuid AS source, t.uuid AS target,
                    coalesce(r.valid_at, '') AS valid_at,
                    coalesce(r.invalid_at, '') AS invalid_at,
                    coalesce(r.created_at, '') AS created_at
             ORDER BY score DESC
             LIMIT $limit",
        )
        .param("index", FACT_TEXT_INDEX)
        .param("query", fulltext_query(query_text))
        .param("limit", candidate_limit(config.limit));

        let mut candidates = Vec::new();
        for row in fetch_rows(&graph, cypher, "fact search").await? {
            candidates.push(fact_from_row(&row)?);
        }
        let lexical: Vec<Uuid> = candidates.iter().map(|f| f.uuid).collect();

        let distances = match config.distance_center()? {
            Some(center) => {
                let mut endpoints: Vec<String> = Vec::new();
                for fact in &candidates {
                    for id in [fact.source_node_uuid, fact.target_node_uuid] {
                        let id = id.to_string();
                        if !endpoints.contains(&id) {
                            endpoints.push(id);
                        }
                    }
                }
                Some(self.hop_distances(&graph, center, endpoints).await?)
            }
            None => None,
        };

        let results = rank_facts(query_text, candidates, &lexical, distances.as_ref(), &config);
        debug!("Fact search '{}' matched {} fact(s)", query_text, results.len());
        Ok(results)
    }

    async fn search_nodes(&self, query_text: &str, config: &SearchConfig) -> Result<Vec<EntityNode>> {
        let center = config.distance_center()?;
        if tokenize(query_text).is_empty() {
            return Ok(Vec::new());
        }
        let graph = self.graph().await?;

        let cypher = query(
            "CALL db.index.fulltext.queryNodes($index, $query)
             YIELD node AS n, score
             RETURN n.uuid AS uuid, n.name AS name,
                    coalesce(n.summary, '') AS summary,
                    labels(n) AS labels,
                    coalesce(n.created_at, '') AS created_at,
                    coalesce(n.attributes, '{}') AS attributes
             ORDER BY score DESC
             LIMIT $limit",
        )
        .param("index", NODE_TEXT_INDEX)
        .param("query", fulltext_query(query_text))
        .param("limit", candidate_limit(config.limit));

        let mut candidates = Vec::new();
        for row in fetch_rows(&graph, cypher, "node search").await? {
            candidates.push(node_from_row(&row)?);
        }
        let lexical: Vec<Uuid> = candidates.iter().map(|n| n.uuid).collect();

        let distances = match center {
            Some(center) => {
                let ids = lexical.iter().map(Uuid::to_string).collect();
                Some(self.hop_distances(&graph, center, ids).await?)
            }
            None => None,
        };

        let results = rank_nodes(query_text, candidates, &lexical, distances.as_ref(), config);
        debug!("Node search '{}' matched {} node(s)", query_text, results.len());
        Ok(results)
    }

    async fn close(&self) -> Result<()> {
        if self.client.write().await.take().is_some() {
            info!("Neo4j connection closed");
        }
        Ok(())
    }
}

fn candidate_limit(limit: usize) -> i64 {
    let candidates = limit.saturating_mul(CANDIDATE_FACTOR).max(MIN_CANDIDATES);
    i64::try_from(candidates).unwrap_or(i64::MAX)
}

/// Full-text query for user text.
///
/// Terms are lowercased, so `AND`, `OR` and `NOT` are matched as words
/// rather than parsed as operators.
fn fulltext_query(text: &str) -> String {
    escape_lucene(&lexical_query(text))
}

async fn run(graph: &Graph, cypher: Query, action: &str) -> Result<()> {
    graph
        .run(cypher)
        .await
        .map_err(|e| GraphError::QueryError(format!("Failed to {}: {}", action, e)))
}

async fn fetch_rows(graph: &Graph, cypher: Query, action: &str) -> Result<Vec<Row>> {
    let mut result = graph
        .execute(cypher)
        .await
        .map_err(|e| GraphError::QueryError(format!("Failed to {}: {}", action, e)))?;

    let mut rows = Vec::new();
    while let Some(row) = result
        .next()
        .await
        .map_err(|e| GraphError::QueryError(format!("Failed to read {} result: {}", action, e)))?
    {
        rows.push(row);
    }
    Ok(rows)
}

fn get_string(row: &Row, key: &str) -> Result<String> {
    row.get::<String>(key)
        .map_err(|e| GraphError::QueryError(format!("Failed to get {}: {}", key, e)))
}

fn get_uuid(row: &Row, key: &str) -> Result<Uuid> {
    let raw = get_string(row, key)?;
    Uuid::parse_str(&raw)
        .map_err(|e| GraphError::SerializationError(format!("Invalid {} '{}': {}", key, raw, e)))
}

/// Empty strings mean "not set"
fn get_time(row: &Row, key: &str) -> Result<Option<DateTime<Utc>>> {
    let raw = get_string(row, key)?;
    if raw.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|e| GraphError::SerializationError(format!("Invalid {} '{}': {}", key, raw, e)))
}

fn fact_from_row(row: &Row) -> Result<Fact> {
    Ok(Fact {
        uuid: get_uuid(row, "uuid")?,
        name: get_string(row, "name")?,
        fact: get_string(row, "fact")?,
        source_node_uuid: get_uuid(row, "source")?,
        target_node_uuid: get_uuid(row, "target")?,
        valid_at: get_time(row, "valid_at")?,
        invalid_at: get_time(row, "invalid_at")?,
        created_at: get_time(row, "created_at")?.unwrap_or_else(Utc::now),
    })
}

fn node_from_row(row: &Row) -> Result<EntityNode> {
    let labels: Vec<String> = row
        .get("labels")
        .map_err(|e| GraphError::QueryError(format!("Failed to get labels: {}", e)))?;
    let attributes: Map<String, JsonValue> = serde_json::from_str(&get_string(row, "attributes")?)?;

    Ok(EntityNode {
        uuid: get_uuid(row, "uuid")?,
        name: get_string(row, "name")?,
        summary: get_string(row, "summary")?,
        labels,
        created_at: get_time(row, "created_at")?.unwrap_or_else(Utc::now),
        attributes,
    })
}
