use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde_json::json;
use tracing::{debug, error, instrument};

use crate::{
    config::StoreConfig,
    data::{
        errors::StoreError,
        trace_context::TraceContext,
        types::{Binding, MutationStatement, SelectResults},
    },
    traits::{QueryExecutor, StoreAdmin},
};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Talks to a Stardog server over its HTTP API.
///
/// Queries and updates use the SPARQL protocol endpoints of a database,
/// lifecycle calls use the admin API. Every request carries basic auth.
#[derive(Debug, Clone)]
pub struct StardogHttpClient {
    endpoint: String,
    username: String,
    password: String,
    client: Client,
}

impl StardogHttpClient {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::ConnectionError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            client,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| format!("HTTP error: {}", status));
        error!(status = status.as_u16(), body = %body, "Stardog rejected the request");
        Err(StoreError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

fn map_http_error(error: reqwest::Error) -> StoreError {
    if error.is_timeout() {
        StoreError::Timeout(error.to_string())
    } else if error.is_connect() {
        StoreError::ConnectionError(error.to_string())
    } else {
        StoreError::Unknown(format!("HTTP error: {}", error))
    }
}

#[async_trait]
impl QueryExecutor for StardogHttpClient {
    #[instrument(skip(self, trace_ctx, query), fields(trace_id = %trace_ctx.trace_id, parent_id = ?trace_ctx.parent_id))]
    async fn select(
        &self,
        trace_ctx: &TraceContext,
        database: &str,
        query: &str,
    ) -> Result<Vec<Binding>, StoreError> {
        debug!(query = %query, "Executing SELECT");

        let url = format!("{}/{}/query", self.endpoint, database);
        let request = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)]);

        let results: SelectResults = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::MappingError(format!("Failed to parse query results: {}", e)))?;

        let bindings = results.into_bindings();
        debug!(rows = bindings.len(), "SELECT returned");
        Ok(bindings)
    }

    #[instrument(skip(self, trace_ctx, statement), fields(trace_id = %trace_ctx.trace_id, parent_id = ?trace_ctx.parent_id))]
    async fn update(
        &self,
        trace_ctx: &TraceContext,
        database: &str,
        statement: &MutationStatement,
    ) -> Result<(), StoreError> {
        debug!(statement = %statement, "Executing update");

        let url = format!("{}/{}/update", self.endpoint, database);
        let request = self.client.post(&url).form(&[("update", statement.as_str())]);
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl StoreAdmin for StardogHttpClient {
    #[instrument(skip(self, trace_ctx), fields(trace_id = %trace_ctx.trace_id, parent_id = ?trace_ctx.parent_id))]
    async fn drop_database(&self, trace_ctx: &TraceContext, database: &str) -> Result<(), StoreError> {
        let url = format!("{}/admin/databases/{}", self.endpoint, database);
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }

    #[instrument(skip(self, trace_ctx), fields(trace_id = %trace_ctx.trace_id, parent_id = ?trace_ctx.parent_id))]
    async fn create_database(&self, trace_ctx: &TraceContext, database: &str) -> Result<(), StoreError> {
        let url = format!("{}/admin/databases", self.endpoint);
        let root = json!({ "dbname": database, "options": {}, "files": [] });
        let form = multipart::Form::new().text("root", root.to_string());

        self.send(self.client.post(&url).multipart(form)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BoundTerm;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // base64("admin:admin")
    const ADMIN_AUTH: &str = "Basic YWRtaW46YWRtaW4=";

    async fn setup_test_client() -> (MockServer, StardogHttpClient) {
        let mock_server = MockServer::start().await;
        let config = StoreConfig {
            endpoint: mock_server.uri(),
            timeout_secs: 1,
            ..StoreConfig::default()
        };
        let client = StardogHttpClient::new(&config).unwrap();
        (mock_server, client)
    }

    #[tokio::test]
    async fn test_select_parses_bindings() {
        let (mock_server, client) = setup_test_client().await;

        Mock::given(method("POST"))
            .and(path("/starwars/query"))
            .and(header("accept", SPARQL_RESULTS_JSON))
            .and(header("authorization", ADMIN_AUTH))
            .and(body_string_contains("query=SELECT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "head": { "vars": ["id", "name", "kind"] },
                "results": {
                    "bindings": [{
                        "id": {
                            "type": "literal",
                            "datatype": "http://www.w3.org/2001/XMLSchema#integer",
                            "value": "1"
                        },
                        "name": { "type": "literal", "value": "Luke Skywalker" },
                        "kind": { "type": "uri", "value": "http://api.stardog.com/Human" }
                    }]
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let bindings = client
            .select(&TraceContext::new_root(), "starwars", "SELECT ?id WHERE { ?s ?p ?id }")
            .await
            .unwrap();

        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0]["name"], BoundTerm::literal("Luke Skywalker"));
        assert_eq!(bindings[0]["kind"].display_value(), "Human");
    }

    #[tokio::test]
    async fn test_update_posts_statement() {
        let (mock_server, client) = setup_test_client().await;

        Mock::given(method("POST"))
            .and(path("/starwars/update"))
            .and(body_string_contains("update=INSERT+DATA"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let statement = MutationStatement::new("INSERT DATA { <a> <b> <c> . }".to_string());
        client
            .update(&TraceContext::new_root(), "starwars", &statement)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejected_update_keeps_status_and_body() {
        let (mock_server, client) = setup_test_client().await;

        Mock::given(method("POST"))
            .and(path("/starwars/update"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Parse error"))
            .mount(&mock_server)
            .await;

        let statement = MutationStatement::new("INSERT DATA {".to_string());
        let err = client
            .update(&TraceContext::new_root(), "starwars", &statement)
            .await
            .unwrap_err();

        match err {
            StoreError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "Parse error");
            }
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_results_are_a_mapping_error() {
        let (mock_server, client) = setup_test_client().await;

        Mock::given(method("POST"))
            .and(path("/starwars/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let err = client
            .select(&TraceContext::new_root(), "starwars", "SELECT * WHERE { ?s ?p ?o }")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MappingError(_)));
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let (mock_server, client) = setup_test_client().await;

        Mock::given(method("POST"))
            .and(path("/starwars/query"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let err = client
            .select(&TraceContext::new_root(), "starwars", "SELECT * WHERE { ?s ?p ?o }")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_database_lifecycle() {
        let (mock_server, client) = setup_test_client().await;

        Mock::given(method("DELETE"))
            .and(path("/admin/databases/starwars"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/admin/databases"))
            .and(body_string_contains("\"dbname\":\"starwars\""))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let trace_ctx = TraceContext::new_root();
        client.drop_database(&trace_ctx, "starwars").await.unwrap();
        client.create_database(&trace_ctx, "starwars").await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_store_is_a_connection_error() {
        let config = StoreConfig {
            endpoint: "http://127.0.0.1:1".to_string(),
            ..StoreConfig::default()
        };
        let client = StardogHttpClient::new(&config).unwrap();

        let err = client
            .drop_database(&TraceContext::new_root(), "starwars")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConnectionError(_)), "got {:?}", err);
    }
}
