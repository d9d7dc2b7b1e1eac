//! End-to-end scenarios against the in-memory graph store

use chronicle::demo;
use chronicle::{has_any_data, EpisodeLoader, RecipeSearch, SearchOrchestrator};
use chronicle_kg::{Episode, GraphStore, MemoryGraphStore, NODE_HYBRID_SEARCH_RRF};
use serde_json::json;

const BEST_LLM: &str = "Which is the best LLM?";

#[tokio::test]
async fn test_existence_gate_follows_the_data() {
    let store = MemoryGraphStore::new().unwrap();
    assert!(!has_any_data(&store).await.unwrap());

    let episode = Episode::from_json(json!({"name": "GPT-4.1", "creator": "OpenAI"}), "meta").unwrap();
    EpisodeLoader::new(&store).load("Gate", &[episode]).await.unwrap();
    assert!(has_any_data(&store).await.unwrap());
}

#[tokio::test]
async fn test_scenario_top_ranked_entity_leads_then_is_superseded() {
    let store = MemoryGraphStore::new().unwrap();

    let phase1 = demo::current_llms().unwrap();
    let report = EpisodeLoader::new(&store)
        .load(&phase1.prefix, &phase1.episodes[..6])
        .await
        .unwrap();
    assert_eq!(report.len(), 6);

    let results = SearchOrchestrator::new(&store).hybrid_search(BEST_LLM).await.unwrap();
    assert!(!results.is_empty());
    let gemini = store.entity_by_name("Gemini 2.5 Pro").await.unwrap();
    assert_eq!(gemini.attributes.get("ranking"), Some(&json!(1)));
    assert_eq!(results[0].source_node_uuid, gemini.uuid);

    let phase2 = demo::claude4_emerges().unwrap();
    EpisodeLoader::new(&store)
        .load(&phase2.prefix, &phase2.episodes)
        .await
        .unwrap();

    let results = SearchOrchestrator::new(&store).hybrid_search(BEST_LLM).await.unwrap();
    let claude = store.entity_by_name("Claude 4").await.unwrap();
    assert_eq!(claude.attributes.get("ranking"), Some(&json!(1)));
    assert_eq!(results[0].source_node_uuid, claude.uuid);
    assert!(results[0].is_valid());

    // the superseded assessment is still there, closed and ranked last
    let stale = results
        .iter()
        .find(|f| f.source_node_uuid == gemini.uuid && f.fact.contains("Currently"))
        .unwrap();
    assert!(stale.invalid_at.is_some());
    assert!(!results.last().unwrap().is_valid());

    let gemini = store.entity_by_name("Gemini 2.5 Pro").await.unwrap();
    assert_eq!(gemini.attributes.get("ranking"), Some(&json!(2)));
}

#[tokio::test]
async fn test_scenario_recipe_search_caps_qualifying_nodes() {
    let store = MemoryGraphStore::new().unwrap();
    let names: Vec<String> = ('A'..='J').map(|c| format!("Model {}", c)).collect();

    let mut episodes: Vec<Episode> = names
        .iter()
        .enumerate()
        .map(|(i, name)| Episode::from_json(json!({"name": name, "ranking": i + 1}), "model metadata").unwrap())
        .collect();
    episodes.extend(names.iter().map(|name| {
        Episode::text(
            format!(
                "{} was reviewed at length by an independent panel and many reviewers called it the best model they had used for reasoning and coding work this year.",
                name
            ),
            "model review",
        )
    }));
    EpisodeLoader::new(&store).load("Models", &episodes).await.unwrap();

    let nodes = RecipeSearch::new(&store)
        .search_nodes("best model", &NODE_HYBRID_SEARCH_RRF, 3)
        .await
        .unwrap();

    assert_eq!(nodes.len(), 3);
    for node in &nodes {
        assert!(node.summary.chars().count() <= 103);
        assert!(node.summary.ends_with("..."));
        assert!(names.contains(&node.name));
    }
}

#[tokio::test]
async fn test_scenario_full_demo_load_then_anthropic_query() {
    let store = MemoryGraphStore::new().unwrap();
    for phase in demo::phases().unwrap() {
        EpisodeLoader::new(&store)
            .load(&phase.prefix, &phase.episodes)
            .await
            .unwrap();
    }

    let results = store.search(demo::DEFAULT_QUERY, None).await.unwrap();
    assert!(!results.is_empty());
    assert!(results[0].fact.contains("Anthropic"));

    store.close().await.unwrap();
    assert!(store.probe_any_edge().await.is_err());
}
