//! Graph Store contract and backends
//!
//! [`GraphStore`] is the only surface the ingestion and search layers use.
//! Two backends implement it: [`Neo4jGraphStore`] for a live database and
//! [`MemoryGraphStore`] for tests and offline runs.

pub mod memory;
pub mod neo4j;

use uuid::Uuid;

use crate::error::Result;
use crate::schema::{EntityNode, EpisodeAck, EpisodeSubmission, Fact};
use crate::search::{SearchConfig, EDGE_HYBRID_SEARCH_NODE_DISTANCE, EDGE_HYBRID_SEARCH_RRF};

pub use memory::MemoryGraphStore;
pub use neo4j::Neo4jGraphStore;

/// A temporal knowledge graph backend.
///
/// Calls are awaited one at a time by the orchestration layer; a backend
/// may still be shared across tasks, hence `Send + Sync`.
#[allow(async_fn_in_trait)]
pub trait GraphStore: Send + Sync {
    /// Persist one episode and apply what it asserts.
    ///
    /// Returns once the episode is durable and visible to later calls.
    async fn submit_episode(&self, submission: &EpisodeSubmission) -> Result<EpisodeAck>;

    /// Whether at least one edge exists between any two nodes
    async fn probe_any_edge(&self) -> Result<bool>;

    /// Delete every node and edge
    async fn clear_all_data(&self) -> Result<()>;

    /// Hybrid fact search, reranked by graph distance when `center_node_uuid`
    /// is given.
    async fn search(&self, query: &str, center_node_uuid: Option<Uuid>) -> Result<Vec<Fact>>;

    /// Node-granularity search; `config.limit` caps the result.
    ///
    /// A node-distance recipe must carry a center node.
    async fn search_nodes(&self, query: &str, config: &SearchConfig) -> Result<Vec<EntityNode>>;

    /// Release the underlying connection. Later calls fail.
    async fn close(&self) -> Result<()>;
}

/// Recipe used by [`GraphStore::search`]
pub fn fact_search_config(center_node_uuid: Option<Uuid>) -> SearchConfig {
    match center_node_uuid {
        Some(center) => EDGE_HYBRID_SEARCH_NODE_DISTANCE.with_center(center),
        None => EDGE_HYBRID_SEARCH_RRF,
    }
}
