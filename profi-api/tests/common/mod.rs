/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - In-memory test database with migrations applied
/// - A router wired to the mock chat provider
/// - Request/response helpers

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use profi_api::app::{build_router, AppState};
use profi_api::config::{ApiConfig, ChatConfig, Config, DatabaseConfig, WeatherConfig};
use profi_chat::{MockConfig, MockProvider};
use profi_shared::db::migrations::run_migrations;
use profi_shared::db::pool;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context over a fresh in-memory database.
    ///
    /// The pool is pinned to one connection: each in-memory SQLite
    /// connection is its own database.
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_chat(MockConfig::default()).await
    }

    /// Like [`TestContext::new`] with a custom mock chat configuration.
    pub async fn with_chat(chat_config: MockConfig) -> anyhow::Result<Self> {
        Self::with_chat_and_timeout(chat_config, 10).await
    }

    /// Like [`TestContext::with_chat`] with a custom chat deadline; a zero
    /// deadline cancels completions as soon as they start.
    pub async fn with_chat_and_timeout(
        chat_config: MockConfig,
        timeout_seconds: u64,
    ) -> anyhow::Result<Self> {
        let db = pool::create_pool(pool::DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        })
        .await?;

        run_migrations(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            chat: ChatConfig {
                groq_api_key: None,
                model: "llama3-70b-8192".to_string(),
                timeout_seconds,
            },
            weather: WeatherConfig { api_key: None },
            bootstrap_admin: None,
        };

        let chat = Arc::new(MockProvider::new(chat_config));
        let state = AppState::new(db.clone(), config, chat);
        let app = build_router(state);

        Ok(TestContext { db, app })
    }

    /// Sends a JSON request and returns the response.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        self.app
            .clone()
            .call(request)
            .await
            .expect("request should not fail at the transport level")
    }
}

/// Reads a response body as JSON, panicking with the body on mismatch.
pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("body was not JSON ({}): {}", e, String::from_utf8_lossy(&body)))
}

/// Asserts a status, printing the body on mismatch for easier debugging.
pub async fn assert_status(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let json = read_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {}", json);
    json
}

/// Registers a user through the API.
pub async fn register_user(ctx: &TestContext, username: &str, email: &str) {
    let response = ctx
        .request(
            "POST",
            "/v1/auth/register",
            Some(serde_json::json!({
                "username": username,
                "password": "a-long-enough-password",
                "email": email,
            })),
        )
        .await;
    assert_status(response, StatusCode::OK).await;
}

/// Reads an entire SSE body and returns the raw text.
pub async fn read_sse_body(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("SSE body should be readable");
    String::from_utf8_lossy(&body).into_owned()
}
