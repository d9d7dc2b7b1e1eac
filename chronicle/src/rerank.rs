//! Center-node reranking

use chronicle_kg::{Fact, GraphStore};
use tracing::{info, warn};

use crate::display::print_facts;
use crate::error::Result;

/// Re-runs a search around the source node of the top baseline hit
pub struct Reranker<'a, S: GraphStore> {
    store: &'a S,
}

impl<'a, S: GraphStore> Reranker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The store's ordering is returned as-is; nothing is merged with the baseline.
    ///
    /// An empty baseline has no center: it is returned unchanged and the store
    /// is not called.
    pub async fn rerank(&self, query: &str, baseline: Vec<Fact>) -> Result<Vec<Fact>> {
        let Some(top) = baseline.first() else {
            warn!("Rerank of '{}' skipped: no center node available", query);
            println!("No results found in the initial search to use as center node.");
            return Ok(baseline);
        };

        let center = top.source_node_uuid;
        println!("\nReranking search results based on graph distance:");
        println!("Using center node UUID: {}", center);

        let results = self.store.search(query, Some(center)).await?;
        info!(
            "Reranked '{}' around {}: {} fact(s)",
            query,
            center,
            results.len()
        );

        print_facts("Reranked Search Results", &results);
        Ok(results)
    }
}
