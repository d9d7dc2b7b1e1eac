//! Hop distances from a center node

use std::collections::HashMap;

use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use uuid::Uuid;

/// Distance assigned to nodes not connected to the center
pub const UNREACHABLE_DISTANCE: u32 = 10;

/// Shortest hop count from `center` to every node reachable through `edges`.
///
/// Edges are treated as undirected. The center itself is at distance 0.
pub fn hop_distances<I>(edges: I, center: Uuid) -> HashMap<Uuid, u32>
where
    I: IntoIterator<Item = (Uuid, Uuid)>,
{
    let mut graph: UnGraph<Uuid, ()> = UnGraph::new_undirected();
    let mut indices: HashMap<Uuid, NodeIndex> = HashMap::new();

    let mut index_of = |graph: &mut UnGraph<Uuid, ()>, id: Uuid| {
        *indices.entry(id).or_insert_with(|| graph.add_node(id))
    };

    let start = index_of(&mut graph, center);
    for (source, target) in edges {
        let a = index_of(&mut graph, source);
        let b = index_of(&mut graph, target);
        graph.add_edge(a, b, ());
    }

    dijkstra(&graph, start, None, |_| 1u32)
        .into_iter()
        .map(|(index, hops)| (graph[index], hops))
        .collect()
}

/// Distance of `node`, or [`UNREACHABLE_DISTANCE`] when it is not connected
pub fn distance_of(distances: &HashMap<Uuid, u32>, node: &Uuid) -> u32 {
    distances.get(node).copied().unwrap_or(UNREACHABLE_DISTANCE)
}

/// Scale a relevance score down by hop distance
pub fn distance_weighted(score: f32, hops: u32) -> f32 {
    score / (1.0 + hops as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_distances() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let isolated = Uuid::new_v4();

        // a -> b <- c, direction is ignored
        let distances = hop_distances(vec![(a, b), (c, b)], a);
        assert_eq!(distances[&a], 0);
        assert_eq!(distances[&b], 1);
        assert_eq!(distances[&c], 2);
        assert_eq!(distance_of(&distances, &isolated), UNREACHABLE_DISTANCE);
    }

    #[test]
    fn test_center_without_edges() {
        let center = Uuid::new_v4();
        let distances = hop_distances(Vec::new(), center);
        assert_eq!(distances.len(), 1);
        assert_eq!(distances[&center], 0);
    }

    #[test]
    fn test_distance_weighted() {
        assert_eq!(distance_weighted(1.0, 0), 1.0);
        assert_eq!(distance_weighted(1.0, 1), 0.5);
        assert!(distance_weighted(1.0, UNREACHABLE_DISTANCE) < distance_weighted(0.2, 1));
    }
}
