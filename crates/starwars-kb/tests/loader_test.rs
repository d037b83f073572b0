use std::sync::Arc;

use pretty_assertions::assert_eq;

use starwars_kb::{services::DatasetLoader, test_utils::FakeGraphStore, TraceContext};

const DATASET: &str = include_str!("../data/starwars.ttl");

#[tokio::test]
async fn test_load_recreates_database_then_inserts() {
    let store = Arc::new(FakeGraphStore::new());
    let loader = DatasetLoader::new(store.clone(), store.clone());

    loader
        .load(&TraceContext::new_root(), "starwars", DATASET)
        .await
        .unwrap();

    assert_eq!(store.admin_calls(), vec!["drop:starwars".to_string(), "create:starwars".to_string()]);

    let statements = store.statements();
    assert_eq!(statements.len(), 1);

    let text = statements[0].as_str();
    assert!(text.starts_with("PREFIX : <http://api.stardog.com/>\n"));
    assert!(text.contains("PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>\n"));
    assert!(text.contains("INSERT DATA {\n"));
    assert!(!text.contains("@prefix"));
    assert!(text.contains(":name \"Luke Skywalker\""));
    assert!(text.trim_end().ends_with('}'));
}

#[tokio::test]
async fn test_failed_insert_is_reported() {
    let store = Arc::new(FakeGraphStore::new());
    store.fail_next_update(starwars_kb::StoreError::Rejected {
        status: 400,
        body: "Invalid Turtle".to_string(),
    });

    let loader = DatasetLoader::new(store.clone(), store.clone());
    let err = loader
        .load(&TraceContext::new_root(), "starwars", ":broken")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Dataset insert failed"));
    assert_eq!(store.admin_calls().len(), 2);
}
