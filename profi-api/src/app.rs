/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use profi_api::{app::AppState, config::Config};
/// use profi_chat::{MockConfig, MockProvider};
/// use profi_shared::db::pool::{create_pool, DatabaseConfig};
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     max_connections: config.database.max_connections,
///     ..Default::default()
/// })
/// .await?;
/// let chat = Arc::new(MockProvider::new(MockConfig::default()));
/// let state = AppState::new(pool, config, chat);
/// let app = profi_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    routing::{delete, get, post},
    Router,
};
use profi_chat::ChatProvider;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Chat provider behind the /v1/chat surface
    pub chat: Arc<dyn ChatProvider>,

    /// HTTP client for outbound lookups (weather)
    pub http: reqwest::Client,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config, chat: Arc<dyn ChatProvider>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            chat,
            http: reqwest::Client::new(),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// ├── /v1/                       # API v1 (versioned)
/// │   ├── /auth/
/// │   │   ├── POST /register
/// │   │   ├── POST /login
/// │   │   └── POST /reset-password
/// │   ├── /budget/
/// │   │   ├── POST /planned      # Upsert a planned amount
/// │   │   ├── POST /transactions # Append a spend/inflow
/// │   │   ├── GET  /progress
/// │   │   └── GET  /summary
/// │   ├── /goals/
/// │   │   ├── POST /             # Create a goal
/// │   │   ├── GET  /             # List goals
/// │   │   └── POST /contribute
/// │   ├── /quotes/
/// │   │   ├── GET    /random     # Public
/// │   │   ├── POST   /           # Admin only
/// │   │   ├── GET    /           # Admin only
/// │   │   └── DELETE /:id        # Admin only
/// │   ├── /chat                  # POST, streams SSE fragments
/// │   ├── /chat/history          # GET
/// │   └── /weather               # GET
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
///
/// Admin checks live inside the quote handlers; there is no token
/// middleware, the presentation collaborator supplies usernames directly.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/reset-password", post(routes::auth::reset_password));

    let budget_routes = Router::new()
        .route("/planned", post(routes::budget::set_planned))
        .route("/transactions", post(routes::budget::log_transaction))
        .route("/progress", get(routes::budget::progress))
        .route("/summary", get(routes::budget::summary));

    let goal_routes = Router::new()
        .route("/", post(routes::goals::add_goal))
        .route("/", get(routes::goals::list_goals))
        .route("/contribute", post(routes::goals::contribute));

    // Quote management fails closed: handlers verify admin membership
    // before touching the store. /random stays public.
    let quote_routes = Router::new()
        .route("/random", get(routes::quotes::random_quote))
        .route("/", post(routes::quotes::add_quote))
        .route("/", get(routes::quotes::list_quotes))
        .route("/:id", delete(routes::quotes::delete_quote));

    let chat_routes = Router::new()
        .route("/", post(routes::chat::chat))
        .route("/history", get(routes::chat::history));

    let weather_routes = Router::new().route("/", get(routes::weather::weather));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/budget", budget_routes)
        .nest("/goals", goal_routes)
        .nest("/quotes", quote_routes)
        .nest("/chat", chat_routes)
        .nest("/weather", weather_routes);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
