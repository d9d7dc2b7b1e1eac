//! Query-time pipeline: hybrid search → rerank → recipe node search

use chronicle_kg::{Fact, GraphStore, SearchConfig};
use tracing::info;

use crate::error::Result;
use crate::recipe::{NodeView, RecipeSearch};
use crate::rerank::Reranker;
use crate::search::SearchOrchestrator;
use crate::session::{Completion, SessionResult};

/// Output of every pipeline stage
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub baseline: Vec<Fact>,
    pub reranked: Vec<Fact>,
    pub nodes: Vec<NodeView>,
}

impl SessionResult for PipelineReport {
    fn completion(&self) -> Completion {
        Completion::Complete
    }
}

pub struct QueryPipeline<'a, S: GraphStore> {
    store: &'a S,
    recipe: SearchConfig,
    node_limit: usize,
}

impl<'a, S: GraphStore> QueryPipeline<'a, S> {
    pub fn new(store: &'a S, recipe: SearchConfig, node_limit: usize) -> Self {
        Self {
            store,
            recipe,
            node_limit,
        }
    }

    pub async fn run(&self, query: &str) -> Result<PipelineReport> {
        info!("Running query pipeline for '{}'", query);

        let baseline = SearchOrchestrator::new(self.store).hybrid_search(query).await?;
        let reranked = Reranker::new(self.store)
            .rerank(query, baseline.clone())
            .await?;
        let center = baseline.first().map(|fact| fact.source_node_uuid);
        let nodes = RecipeSearch::new(self.store)
            .centered_on(center)
            .search_nodes(query, &self.recipe, self.node_limit)
            .await?;

        Ok(PipelineReport {
            baseline,
            reranked,
            nodes,
        })
    }
}
