//! Rank fusion for hybrid search

use std::collections::HashMap;

use uuid::Uuid;

/// A ranked list of candidate ids and the weight it carries in the fusion
#[derive(Debug, Clone, Copy)]
pub struct WeightedRanking<'a> {
    pub ids: &'a [Uuid],
    pub weight: f32,
}

impl<'a> WeightedRanking<'a> {
    pub fn new(ids: &'a [Uuid], weight: f32) -> Self {
        Self { ids, weight }
    }
}

/// Reciprocal Rank Fusion.
///
/// Each list contributes `weight / (k + rank + 1)` per id. Equal scores keep
/// the order in which ids were first seen.
pub fn fuse_rrf(rankings: &[WeightedRanking<'_>], k: f32) -> Vec<(Uuid, f32)> {
    let mut positions: HashMap<Uuid, usize> = HashMap::new();
    let mut fused: Vec<(Uuid, f32)> = Vec::new();

    for ranking in rankings {
        for (rank, id) in ranking.ids.iter().enumerate() {
            let rrf_score = ranking.weight / (k + rank as f32 + 1.0);
            match positions.get(id) {
                Some(&pos) => fused[pos].1 += rrf_score,
                None => {
                    positions.insert(*id, fused.len());
                    fused.push((*id, rrf_score));
                }
            }
        }
    }

    fused.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    fused
}
