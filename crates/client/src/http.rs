use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{QaError, detail_from_body};
use crate::service::AnswerService;
use crate::types::{Health, Neighbors, QaRequest, QaResponse};

/// Default origin of the answer service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Neighbor count the backend uses when `k` is not given.
pub const DEFAULT_NEIGHBOR_K: usize = 3;

/// [`AnswerService`] backed by the HTTP API.
#[derive(Clone)]
pub struct HttpAnswerService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAnswerService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build a client honouring the configured timeout. Without one the
    /// transport default applies.
    pub fn from_config(config: &ApiConfig) -> Result<Self, QaError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| QaError::client(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<Health, QaError> {
        let url = self.endpoint("/health");
        let response = self.client.get(&url).send().await?;
        let body = read_json(response).await?;

        serde_json::from_value(body)
            .map_err(|e| QaError::client(format!("invalid health response: {}", e)))
    }

    /// `GET /qa/graph/neighbor` for one entity.
    pub async fn graph_neighbors(&self, entity_id: &str, k: usize) -> Result<Neighbors, QaError> {
        let url = self.endpoint("/qa/graph/neighbor");
        let response = self
            .client
            .get(&url)
            .query(&[("entity_id", entity_id.to_string()), ("k", k.to_string())])
            .send()
            .await?;
        let body = read_json(response).await?;

        serde_json::from_value(body)
            .map_err(|e| QaError::client(format!("invalid neighbor response: {}", e)))
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn answer(&self, request: &QaRequest) -> Result<QaResponse, QaError> {
        let url = self.endpoint("/qa/rag");
        debug!(url = %url, lang = %request.lang, "Posting question");

        let response = self.client.post(&url).json(request).send().await?;
        let body = read_json(response).await?;

        Ok(QaResponse::from_value(&body))
    }
}

/// Split a response into a JSON body or the matching error.
async fn read_json(response: reqwest::Response) -> Result<Value, QaError> {
    let status = response.status();

    if !status.is_success() {
        // A body we cannot read still counts as a server-reported failure.
        let body = response.bytes().await.unwrap_or_default();
        return Err(QaError::server(status.as_u16(), detail_from_body(&body)));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| QaError::client(format!("invalid response body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NETWORK_MESSAGE;
    use crate::language::Language;
    use axum::{
        Json, Router,
        extract::Query,
        http::StatusCode,
        routing::{get, post},
    };
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn posts_question_and_reads_answer() {
        let app = Router::new().route(
            "/qa/rag",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "answer": format!("{}|{}", body["question"].as_str().unwrap(), body["lang"]),
                    "evidence": [{"work_id": "kpv", "para_id": "p1"}, {"work_id": "kpv", "para_id": "p2"}],
                    "graph_hits": [{"entity_id": "kant", "name": "Immanuel Kant"}]
                }))
            }),
        );
        let service = HttpAnswerService::new(spawn(app).await);

        let resp = service
            .answer(&QaRequest::new("  What is duty? ", Language::En))
            .await
            .unwrap();

        assert_eq!(resp.answer, "  What is duty? |\"en\"");
        assert_eq!(resp.evidence.len(), 2);
        assert_eq!(resp.evidence[1]["para_id"], "p2");
        assert_eq!(resp.graph_hits, vec![json!({"entity_id": "kant", "name": "Immanuel Kant"})]);
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_tolerated() {
        let app = Router::new().route("/qa/rag", post(|| async { Json(json!({"answer": "ok"})) }));
        let service = HttpAnswerService::new(format!("{}/", spawn(app).await));

        let resp = service.answer(&QaRequest::new("q", Language::Zh)).await.unwrap();
        assert_eq!(resp.answer, "ok");
        assert!(resp.evidence.is_empty());
    }

    #[tokio::test]
    async fn server_detail_is_surfaced() {
        let app = Router::new().route(
            "/qa/rag",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "index unavailable"})),
                )
            }),
        );
        let service = HttpAnswerService::new(spawn(app).await);

        let err = service
            .answer(&QaRequest::new("q", Language::Zh))
            .await
            .unwrap_err();

        assert_eq!(err, QaError::server(500, Some("index unavailable".to_string())));
        assert_eq!(err.to_string(), "Error: index unavailable");
    }

    #[tokio::test]
    async fn server_error_without_detail_falls_back() {
        let app = Router::new().route(
            "/qa/rag",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let service = HttpAnswerService::new(spawn(app).await);

        let err = service
            .answer(&QaRequest::new("q", Language::Zh))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Error: Failed to get answer");
    }

    #[tokio::test]
    async fn unknown_route_is_a_server_error() {
        let service = HttpAnswerService::new(spawn(Router::new()).await);

        let err = service
            .answer(&QaRequest::new("q", Language::Zh))
            .await
            .unwrap_err();

        assert!(matches!(err, QaError::Server { status: 404, .. }));
    }

    #[tokio::test]
    async fn undecodable_success_body_is_a_client_error() {
        let app = Router::new().route("/qa/rag", post(|| async { "plain text" }));
        let service = HttpAnswerService::new(spawn(app).await);

        let err = service
            .answer(&QaRequest::new("q", Language::Zh))
            .await
            .unwrap_err();

        assert!(matches!(err, QaError::Client(_)));
        assert!(err.to_string().starts_with("Error: invalid response body"));
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = HttpAnswerService::new(format!("http://{}", addr));
        let err = service
            .answer(&QaRequest::new("q", Language::Zh))
            .await
            .unwrap_err();

        assert!(matches!(err, QaError::Network { .. }));
        assert_eq!(err.to_string(), NETWORK_MESSAGE);
    }

    #[tokio::test]
    async fn malformed_base_url_is_a_client_error() {
        let service = HttpAnswerService::new("not a url");
        let err = service
            .answer(&QaRequest::new("q", Language::Zh))
            .await
            .unwrap_err();

        assert!(matches!(err, QaError::Client(_)));
        assert!(err.to_string().starts_with("Error: "));
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = Router::new().route(
            "/health",
            get(|| async { Json(json!({"status": "healthy", "service": "meet-kant-api"})) }),
        );
        let service = HttpAnswerService::new(spawn(app).await);

        let health = service.health().await.unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.service, "meet-kant-api");
    }

    #[tokio::test]
    async fn neighbor_lookup_sends_entity_and_k() {
        let app = Router::new().route(
            "/qa/graph/neighbor",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let k: usize = params["k"].parse().unwrap();
                let neighbors: Vec<Value> = (0..k)
                    .map(|i| json!({"entity_id": format!("n{}", i), "relationship": "defined_by"}))
                    .collect();
                Json(json!({"entity_id": params["entity_id"], "neighbors": neighbors}))
            }),
        );
        let service = HttpAnswerService::new(spawn(app).await);

        let result = service.graph_neighbors("kant", 2).await.unwrap();
        assert_eq!(result.entity_id, "kant");
        assert_eq!(result.neighbors.len(), 2);
        assert_eq!(result.neighbors[1]["entity_id"], "n1");
    }

    #[tokio::test]
    async fn health_failure_surfaces_detail() {
        let app = Router::new().route(
            "/health",
            get(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"detail": "retriever down"})),
                )
            }),
        );
        let service = HttpAnswerService::new(spawn(app).await);

        let err = service.health().await.unwrap_err();
        assert_eq!(err, QaError::server(503, Some("retriever down".to_string())));
        assert_eq!(err.to_string(), "Error: retriever down");
    }

    #[tokio::test]
    async fn health_against_closed_port_is_a_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = HttpAnswerService::new(format!("http://{}", addr));
        let err = service.health().await.unwrap_err();

        assert!(matches!(err, QaError::Network { .. }));
        assert_eq!(err.to_string(), NETWORK_MESSAGE);
    }

    #[tokio::test]
    async fn unknown_entity_surfaces_detail() {
        let app = Router::new().route(
            "/qa/graph/neighbor",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"detail": "entity not found"})),
                )
            }),
        );
        let service = HttpAnswerService::new(spawn(app).await);

        let err = service.graph_neighbors("nobody", 3).await.unwrap_err();
        assert_eq!(err, QaError::server(404, Some("entity not found".to_string())));
        assert_eq!(err.to_string(), "Error: entity not found");
    }

    #[tokio::test]
    async fn neighbor_error_without_detail_falls_back() {
        let app = Router::new().route(
            "/qa/graph/neighbor",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let service = HttpAnswerService::new(spawn(app).await);

        let err = service.graph_neighbors("kant", 3).await.unwrap_err();
        assert!(matches!(err, QaError::Server { status: 500, detail: None }));
        assert_eq!(err.to_string(), "Error: Failed to get answer");
    }

    #[test]
    fn from_config_keeps_base_url() {
        let config = ApiConfig {
            base_url: "http://example.test:9000".to_string(),
            request_timeout_secs: Some(5),
        };
        let service = HttpAnswerService::from_config(&config).unwrap();
        assert_eq!(service.base_url(), "http://example.test:9000");
        assert_eq!(service.endpoint("/qa/rag"), "http://example.test:9000/qa/rag");
    }
}
