//! Catalog round trips against a mocked Stardog HTTP API

#![cfg(feature = "adapters")]

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use starwars_kb::{
    CharacterCatalog, CharacterField, StardogHttpClient, StatementBuilder, StoreConfig,
    TableDataAvailability, TraceContext,
};

fn uri(local: &str) -> serde_json::Value {
    json!({ "type": "uri", "value": format!("http://api.stardog.com/{}", local) })
}

fn row(id: i64, name: &str, kind: &str, movie: &str) -> serde_json::Value {
    json!({
        "id": {
            "type": "literal",
            "datatype": "http://www.w3.org/2001/XMLSchema#integer",
            "value": id.to_string()
        },
        "name": { "type": "literal", "value": name },
        "kind": uri(kind),
        "movie": uri(movie)
    })
}

async fn setup() -> (MockServer, CharacterCatalog) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/starwars/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "head": { "vars": ["id", "name", "homePlanet", "kind", "movie"] },
            "results": { "bindings": [
                row(8, "R2-D2", "Droid", "ANewHope"),
                row(8, "R2-D2", "Droid", "ReturnOfTheJedi"),
                row(7, "C-3PO", "Droid", "ANewHope")
            ] }
        })))
        .mount(&server)
        .await;

    let config = StoreConfig {
        endpoint: server.uri(),
        ..StoreConfig::default()
    };
    let client = Arc::new(StardogHttpClient::new(&config).unwrap());
    let catalog = CharacterCatalog::new(client, config.database, StatementBuilder::default());
    (server, catalog)
}

#[tokio::test]
async fn test_list_characters_over_http() {
    let (_server, catalog) = setup().await;

    let records = catalog.refresh(&TraceContext::new_root()).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, 7);
    assert_eq!(records[1].movies, vec!["ANewHope".to_string(), "ReturnOfTheJedi".to_string()]);
    assert_eq!(records[1].cell_text("homePlanet").as_deref(), Some(""));
}

#[tokio::test]
async fn test_edit_over_http_refreshes_after_acknowledgement() {
    let (server, catalog) = setup().await;
    let trace_ctx = TraceContext::new_root();

    Mock::given(method("POST"))
        .and(path("/starwars/update"))
        .and(body_string_contains("update=DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    catalog.refresh(&trace_ctx).await.unwrap();
    let intent = catalog.field_edit(7, CharacterField::Name, "See-Threepio").unwrap();
    let outcome = catalog.apply_and_refresh(&trace_ctx, &intent).await.unwrap();

    assert!(outcome.is_applied());
    assert_eq!(catalog.status(), TableDataAvailability::Loaded);

    let requests = server.received_requests().await.unwrap();
    let paths: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(paths, vec!["/starwars/query", "/starwars/update", "/starwars/query"]);
}

#[tokio::test]
async fn test_rejected_update_skips_refresh() {
    let (server, catalog) = setup().await;
    let trace_ctx = TraceContext::new_root();

    Mock::given(method("POST"))
        .and(path("/starwars/update"))
        .respond_with(ResponseTemplate::new(400).set_body_string("SPARQL parse error"))
        .mount(&server)
        .await;

    catalog.refresh(&trace_ctx).await.unwrap();
    let intent = catalog.field_edit(8, CharacterField::Kind, "Astromech").unwrap();
    let err = catalog.apply_and_refresh(&trace_ctx, &intent).await.unwrap_err();

    assert!(err.to_string().contains("Character update failed"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(catalog.find(8).map(|r| r.kind), Some("Droid".to_string()));
}
