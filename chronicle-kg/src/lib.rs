//! # Chronicle Knowledge Graph (chronicle-kg)
//!
//! A temporal knowledge graph store for Rust: episodes go in, facts with
//! validity intervals come out, and hybrid (lexical + similarity) search ranks
//! them, optionally around a center node.
//!
//! ## Backends
//!
//! - [`Neo4jGraphStore`] persists to Neo4j and searches with full-text indexes.
//! - [`MemoryGraphStore`] keeps everything in process, with BM25 from Tantivy.
//!
//! Both implement [`GraphStore`], the only surface callers depend on.
//!
//! ```no_run
//! use chronicle_kg::{Episode, EpisodeSubmission, GraphStore, MemoryGraphStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = MemoryGraphStore::new()?;
//!
//!     let episode = Episode::from_json(
//!         json!({"name": "Claude 4", "creator": "Anthropic", "ranking": 1}),
//!         "LLM metadata",
//!     )?;
//!     let submission = EpisodeSubmission::new("Claude 4 Era 0".to_string(), &episode, chrono::Utc::now())?;
//!     store.submit_episode(&submission).await?;
//!
//!     for fact in store.search("Which AI assistant is from Anthropic?", None).await? {
//!         println!("{}", fact.fact);
//!     }
//!     store.close().await?;
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod error;
pub mod schema;
pub mod search;
pub mod store;

// Re-export main types for convenience
pub use connection::{Neo4jClient, Neo4jSettings};
pub use error::{GraphError, Result};
pub use schema::{
    EntityNode, Episode, EpisodeAck, EpisodeBody, EpisodeSubmission, EpisodicNode, Fact,
    SourceKind,
};
pub use search::{
    RerankerKind, SearchConfig, SearchTarget, EDGE_HYBRID_SEARCH_NODE_DISTANCE,
    EDGE_HYBRID_SEARCH_RRF, NODE_HYBRID_SEARCH_NODE_DISTANCE, NODE_HYBRID_SEARCH_RRF,
};
pub use store::{GraphStore, MemoryGraphStore, Neo4jGraphStore};
