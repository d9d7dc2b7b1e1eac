//! Node search with a named recipe

use chrono::{DateTime, Utc};
use chronicle_kg::{EntityNode, GraphError, GraphStore, RerankerKind, SearchConfig, SearchTarget};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::{info, warn};
use uuid::Uuid;

use crate::display::print_nodes;
use crate::error::Result;

/// Characters of a summary kept for display
pub const SUMMARY_PREVIEW_CHARS: usize = 100;

/// A node as shown to the operator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub uuid: Uuid,
    pub name: String,
    /// Truncated with [`truncate_summary`]
    pub summary: String,
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub attributes: Map<String, JsonValue>,
}

impl From<EntityNode> for NodeView {
    fn from(node: EntityNode) -> Self {
        Self {
            summary: truncate_summary(&node.summary),
            uuid: node.uuid,
            name: node.name,
            labels: node.labels,
            created_at: node.created_at,
            attributes: node.attributes,
        }
    }
}

/// First 100 characters plus `...` when longer, otherwise verbatim
pub fn truncate_summary(summary: &str) -> String {
    match summary.char_indices().nth(SUMMARY_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &summary[..cut]),
        None => summary.to_string(),
    }
}

/// Node-granularity search with a result cap
pub struct RecipeSearch<'a, S: GraphStore> {
    store: &'a S,
    center: Option<Uuid>,
}

impl<'a, S: GraphStore> RecipeSearch<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            center: None,
        }
    }

    /// Center node for node-distance recipes
    pub fn centered_on(mut self, center: Option<Uuid>) -> Self {
        self.center = center;
        self
    }

    /// Search nodes with a copy of `recipe` limited to `limit` results.
    ///
    /// The named recipe itself is never modified.
    pub async fn search_nodes(&self, query: &str, recipe: &SearchConfig, limit: usize) -> Result<Vec<NodeView>> {
        if recipe.target != SearchTarget::Nodes {
            return Err(GraphError::ValidationError(format!(
                "recipe '{}' does not search nodes",
                recipe.name
            ))
            .into());
        }

        let mut config = recipe.clone().with_limit(limit);
        if config.reranker == RerankerKind::NodeDistance {
            match self.center {
                Some(center) => config = config.with_center(center),
                None => {
                    warn!("No center node available, ranking nodes with RRF");
                    config.reranker = RerankerKind::Rrf;
                }
            }
        }
        println!(
            "\nPerforming node search with recipe {} (limit {}):",
            config.name, config.limit
        );

        let mut nodes = self.store.search_nodes(query, &config).await?;
        nodes.truncate(limit);
        info!("Node search '{}' returned {} node(s)", query, nodes.len());

        let views: Vec<NodeView> = nodes.into_iter().map(NodeView::from).collect();
        print_nodes("Node Search Results", &views);
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_summary_boundaries() {
        let exact = "a".repeat(100);
        assert_eq!(truncate_summary(&exact), exact);

        let long = "b".repeat(101);
        let shown = truncate_summary(&long);
        assert_eq!(shown.chars().count(), 103);
        assert!(shown.ends_with("..."));

        assert_eq!(truncate_summary(""), "");
    }

    #[test]
    fn test_truncate_summary_counts_characters() {
        let text = "é".repeat(150);
        let shown = truncate_summary(&text);
        assert_eq!(shown.chars().count(), 103);
        assert!(shown.starts_with(&"é".repeat(100)));
    }
}
