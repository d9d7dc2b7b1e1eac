//! Hybrid fact search

use chronicle_kg::{Fact, GraphStore};
use tracing::info;

use crate::display::print_facts;
use crate::error::Result;

/// Issues fused semantic + lexical fact searches and prints them
pub struct SearchOrchestrator<'a, S: GraphStore> {
    store: &'a S,
}

impl<'a, S: GraphStore> SearchOrchestrator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Ranked facts for `query`; empty when nothing matches
    pub async fn hybrid_search(&self, query: &str) -> Result<Vec<Fact>> {
        println!("\nSearching for: '{}'", query);
        let results = self.store.search(query, None).await?;
        info!("Hybrid search '{}' returned {} fact(s)", query, results.len());

        print_facts("Search Results", &results);
        Ok(results)
    }
}
