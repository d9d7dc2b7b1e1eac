//! Hybrid ranking shared by the graph store backends
//!
//! A backend supplies the candidates and their lexical (BM25) order; this
//! module adds the similarity ranking, fuses both with weighted RRF and, under
//! a node-distance recipe, discounts each score by hop distance.

pub mod config;
pub mod distance;
pub mod fusion;
pub mod lexical;
pub mod text;

use std::cmp::Ordering;
use std::collections::HashMap;

use uuid::Uuid;

use crate::schema::{EntityNode, Fact};

pub use config::{
    recipes, RerankerKind, SearchConfig, SearchTarget, DEFAULT_RRF_K, DEFAULT_SEARCH_LIMIT,
    EDGE_HYBRID_SEARCH_NODE_DISTANCE, EDGE_HYBRID_SEARCH_RRF, NODE_HYBRID_SEARCH_NODE_DISTANCE,
    NODE_HYBRID_SEARCH_RRF,
};
pub use distance::{distance_of, distance_weighted, hop_distances, UNREACHABLE_DISTANCE};
pub use fusion::{fuse_rrf, WeightedRanking};
pub use lexical::LexicalIndex;
pub use text::{cosine_similarity, escape_lucene, lexical_query, tokenize};

/// Fused scores for candidates that matched at least one ranking
fn fused_scores<'a, I>(
    query_tokens: &[String],
    candidates: I,
    lexical_order: &[Uuid],
    config: &SearchConfig,
) -> HashMap<Uuid, f32>
where
    I: IntoIterator<Item = (Uuid, &'a str)>,
{
    let mut similarity: Vec<(Uuid, f32)> = candidates
        .into_iter()
        .map(|(id, text)| (id, cosine_similarity(query_tokens, text)))
        .filter(|(_, score)| *score > 0.0)
        .collect();
    similarity.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    let similarity_order: Vec<Uuid> = similarity.into_iter().map(|(id, _)| id).collect();

    fuse_rrf(
        &[
            WeightedRanking::new(lexical_order, config.lexical_weight),
            WeightedRanking::new(&similarity_order, config.similarity_weight),
        ],
        config.rrf_k,
    )
    .into_iter()
    .collect()
}

fn by_score_desc(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Distances that apply under `config`
fn applied<'d>(
    distances: Option<&'d HashMap<Uuid, u32>>,
    config: &SearchConfig,
) -> Option<&'d HashMap<Uuid, u32>> {
    match config.reranker {
        RerankerKind::NodeDistance => distances,
        RerankerKind::Rrf => None,
    }
}

/// Rank candidate facts for `query`.
///
/// Facts still in force come first, then higher fused score, then newer
/// facts. Under a node-distance recipe `distances` discounts each score: a
/// fact is as close as the nearer of its two endpoints.
pub fn rank_facts(
    query: &str,
    candidates: Vec<Fact>,
    lexical_order: &[Uuid],
    distances: Option<&HashMap<Uuid, u32>>,
    config: &SearchConfig,
) -> Vec<Fact> {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() || config.limit == 0 {
        return Vec::new();
    }
    let distances = applied(distances, config);

    let scores = fused_scores(
        &query_tokens,
        candidates.iter().map(|f| (f.uuid, f.fact.as_str())),
        lexical_order,
        config,
    );

    let mut ranked: Vec<(Fact, f32)> = candidates
        .into_iter()
        .filter_map(|fact| {
            let mut score = *scores.get(&fact.uuid)?;
            if let Some(distances) = distances {
                let hops = distance_of(distances, &fact.source_node_uuid)
                    .min(distance_of(distances, &fact.target_node_uuid));
                score = distance_weighted(score, hops);
            }
            Some((fact, score))
        })
        .collect();

    ranked.sort_by(|(a, sa), (b, sb)| {
        b.is_valid()
            .cmp(&a.is_valid())
            .then_with(|| by_score_desc(*sa, *sb))
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    ranked.truncate(config.limit);
    ranked.into_iter().map(|(fact, _)| fact).collect()
}

/// Rank candidate entity nodes for `query` by name and summary.
///
/// `distances` only counts under a node-distance recipe.
pub fn rank_nodes(
    query: &str,
    candidates: Vec<EntityNode>,
    lexical_order: &[Uuid],
    distances: Option<&HashMap<Uuid, u32>>,
    config: &SearchConfig,
) -> Vec<EntityNode> {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() || config.limit == 0 {
        return Vec::new();
    }

    let distances = applied(distances, config);

    let texts: Vec<(Uuid, String)> = candidates
        .iter()
        .map(|n| (n.uuid, node_text(n)))
        .collect();
    let scores = fused_scores(
        &query_tokens,
        texts.iter().map(|(id, text)| (*id, text.as_str())),
        lexical_order,
        config,
    );

    let mut ranked: Vec<(EntityNode, f32)> = candidates
        .into_iter()
        .filter_map(|node| {
            let mut score = *scores.get(&node.uuid)?;
            if let Some(distances) = distances {
                score = distance_weighted(score, distance_of(distances, &node.uuid));
            }
            Some((node, score))
        })
        .collect();

    ranked.sort_by(|(a, sa), (b, sb)| {
        by_score_desc(*sa, *sb).then_with(|| b.created_at.cmp(&a.created_at))
    });
    ranked.truncate(config.limit);
    ranked.into_iter().map(|(node, _)| node).collect()
}

/// Text a node is matched on
pub fn node_text(node: &EntityNode) -> String {
    if node.summary.is_empty() {
        node.name.clone()
    } else {
        format!("{} {}", node.name, node.summary)
    }
}
