//! Search configuration and predefined recipes

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GraphError, Result};

/// Default number of results returned by a search
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Default RRF k parameter
pub const DEFAULT_RRF_K: f32 = 60.0;

/// What a search returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTarget {
    /// Facts (entity edges)
    Edges,
    /// Entity nodes
    Nodes,
}

/// How fused candidates are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerankerKind {
    /// Reciprocal Rank Fusion of the lexical and similarity rankings
    Rrf,
    /// RRF score discounted by hop distance from a center node
    NodeDistance,
}

/// A named, parameterizable ranking configuration.
///
/// Recipes are plain values: clone one and adjust the copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub name: Cow<'static, str>,
    pub target: SearchTarget,
    pub reranker: RerankerKind,
    /// Maximum number of results
    pub limit: usize,
    /// RRF k parameter
    pub rrf_k: f32,
    /// Weight of the lexical (BM25) ranking
    pub lexical_weight: f32,
    /// Weight of the similarity ranking
    pub similarity_weight: f32,
    /// Node distances are measured from here under [`RerankerKind::NodeDistance`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_node_uuid: Option<Uuid>,
}

impl SearchConfig {
    const fn recipe(name: &'static str, target: SearchTarget, reranker: RerankerKind) -> Self {
        Self {
            name: Cow::Borrowed(name),
            target,
            reranker,
            limit: DEFAULT_SEARCH_LIMIT,
            rrf_k: DEFAULT_RRF_K,
            lexical_weight: 0.5,
            similarity_weight: 0.5,
            center_node_uuid: None,
        }
    }

    /// Look up a predefined recipe by name
    pub fn by_name(name: &str) -> Option<SearchConfig> {
        recipes().into_iter().find(|r| r.name == name)
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_center(mut self, center_node_uuid: Uuid) -> Self {
        self.center_node_uuid = Some(center_node_uuid);
        self
    }

    /// Center to measure hop distances from, if this recipe ranks by them.
    ///
    /// A node-distance recipe without a center is rejected.
    pub fn distance_center(&self) -> Result<Option<Uuid>> {
        match (self.reranker, self.center_node_uuid) {
            (RerankerKind::Rrf, _) => Ok(None),
            (RerankerKind::NodeDistance, Some(center)) => Ok(Some(center)),
            (RerankerKind::NodeDistance, None) => Err(GraphError::ValidationError(format!(
                "recipe '{}' needs a center node",
                self.name
            ))),
        }
    }
}

/// Hybrid fact search fused with RRF
pub const EDGE_HYBRID_SEARCH_RRF: SearchConfig = SearchConfig::recipe(
    "edge_hybrid_search_rrf",
    SearchTarget::Edges,
    RerankerKind::Rrf,
);

/// Hybrid fact search reranked by distance from a center node
pub const EDGE_HYBRID_SEARCH_NODE_DISTANCE: SearchConfig = SearchConfig::recipe(
    "edge_hybrid_search_node_distance",
    SearchTarget::Edges,
    RerankerKind::NodeDistance,
);

/// Hybrid node search fused with RRF
pub const NODE_HYBRID_SEARCH_RRF: SearchConfig = SearchConfig::recipe(
    "node_hybrid_search_rrf",
    SearchTarget::Nodes,
    RerankerKind::Rrf,
);

/// Hybrid node search reranked by distance from a center node
pub const NODE_HYBRID_SEARCH_NODE_DISTANCE: SearchConfig = SearchConfig::recipe(
    "node_hybrid_search_node_distance",
    SearchTarget::Nodes,
    RerankerKind::NodeDistance,
);

/// Every predefined recipe
pub fn recipes() -> [SearchConfig; 4] {
    [
        EDGE_HYBRID_SEARCH_RRF,
        EDGE_HYBRID_SEARCH_NODE_DISTANCE,
        NODE_HYBRID_SEARCH_RRF,
        NODE_HYBRID_SEARCH_NODE_DISTANCE,
    ]
}
