//! Search orchestration: rerank no-op law, recipe cap and pipeline order

mod common;

use chronicle::{Error, QueryPipeline, RecipeSearch, Reranker};
use chronicle_kg::{
    GraphError, RerankerKind, SearchConfig, EDGE_HYBRID_SEARCH_RRF,
    NODE_HYBRID_SEARCH_NODE_DISTANCE, NODE_HYBRID_SEARCH_RRF,
};
use common::{fact, node, Call, RecordingStore, Script};

#[tokio::test]
async fn test_rerank_of_empty_baseline_makes_no_store_call() {
    let store = RecordingStore::empty();
    let reranked = Reranker::new(&store).rerank("q", Vec::new()).await.unwrap();

    assert!(reranked.is_empty());
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_rerank_centers_on_top_hit_and_keeps_store_order() {
    let top = fact("top hit");
    let reordered = vec![fact("second"), fact("first")];
    let store = RecordingStore::new(Script {
        reranked: reordered.clone(),
        ..Script::default()
    });

    let reranked = Reranker::new(&store)
        .rerank("q", vec![top.clone(), fact("runner-up")])
        .await
        .unwrap();

    assert_eq!(reranked, reordered);
    assert_eq!(
        store.calls(),
        vec![Call::Search("q".to_string(), Some(top.source_node_uuid))]
    );
}

#[tokio::test]
async fn test_recipe_search_caps_results_and_truncates_summaries() {
    let nodes = (0..8)
        .map(|i| node(&format!("Model {}", i), &"x".repeat(150)))
        .collect();
    let store = RecordingStore::new(Script {
        nodes,
        ..Script::default()
    });

    let results = RecipeSearch::new(&store)
        .search_nodes("best model", &NODE_HYBRID_SEARCH_RRF, 5)
        .await
        .unwrap();

    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|n| n.summary.chars().count() == 103));
    assert_eq!(store.calls(), vec![Call::SearchNodes("best model".to_string(), 5)]);
    // the named recipe is untouched
    assert_eq!(NODE_HYBRID_SEARCH_RRF.limit, 10);
    assert_eq!(SearchConfig::by_name("node_hybrid_search_rrf").unwrap().limit, 10);
}

#[tokio::test]
async fn test_recipe_search_rejects_edge_recipes() {
    let store = RecordingStore::empty();
    let err = RecipeSearch::new(&store)
        .search_nodes("best model", &EDGE_HYBRID_SEARCH_RRF, 5)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Connectivity(GraphError::ValidationError(_))
    ));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_pipeline_runs_search_rerank_then_node_search() {
    let top = fact("Claude 4 creator: Anthropic");
    let store = RecordingStore::new(Script {
        facts: vec![top.clone()],
        reranked: vec![top.clone()],
        nodes: vec![node("Claude 4", "An assistant from Anthropic")],
        ..Script::default()
    });

    let report = QueryPipeline::new(&store, NODE_HYBRID_SEARCH_RRF, 5)
        .run("Which AI assistant is from Anthropic?")
        .await
        .unwrap();

    let query = "Which AI assistant is from Anthropic?".to_string();
    assert_eq!(
        store.calls(),
        vec![
            Call::Search(query.clone(), None),
            Call::Search(query.clone(), Some(top.source_node_uuid)),
            Call::SearchNodes(query, 5),
        ]
    );
    assert_eq!(report.baseline.len(), 1);
    assert_eq!(report.reranked.len(), 1);
    assert_eq!(report.nodes[0].name, "Claude 4");
}

#[tokio::test]
async fn test_pipeline_with_no_hits_skips_rerank() {
    let store = RecordingStore::empty();
    let report = QueryPipeline::new(&store, NODE_HYBRID_SEARCH_RRF, 5)
        .run("nothing")
        .await
        .unwrap();

    assert!(report.baseline.is_empty());
    assert!(report.reranked.is_empty());
    assert_eq!(
        store.calls(),
        vec![
            Call::Search("nothing".to_string(), None),
            Call::SearchNodes("nothing".to_string(), 5),
        ]
    );
}

#[tokio::test]
async fn test_node_distance_recipe_is_centered_on_the_top_hit() {
    let top = fact("Claude 4 creator: Anthropic");
    let store = RecordingStore::new(Script {
        facts: vec![top.clone(), fact("GPT-4.1 creator: OpenAI")],
        ..Script::default()
    });

    QueryPipeline::new(&store, NODE_HYBRID_SEARCH_NODE_DISTANCE, 5)
        .run("Anthropic")
        .await
        .unwrap();

    let configs = store.node_configs();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].reranker, RerankerKind::NodeDistance);
    assert_eq!(configs[0].center_node_uuid, Some(top.source_node_uuid));
    assert!(NODE_HYBRID_SEARCH_NODE_DISTANCE.center_node_uuid.is_none());
}

#[tokio::test]
async fn test_node_distance_recipe_without_hits_falls_back_to_rrf() {
    let store = RecordingStore::empty();
    let nodes = RecipeSearch::new(&store)
        .search_nodes("best model", &NODE_HYBRID_SEARCH_NODE_DISTANCE, 5)
        .await
        .unwrap();

    assert!(nodes.is_empty());
    let configs = store.node_configs();
    assert_eq!(configs[0].reranker, RerankerKind::Rrf);
    assert!(configs[0].center_node_uuid.is_none());
}
