//! # ProFi API Server
//!
//! The HTTP backend for the ProFi personal-finance assistant: credential
//! store, monthly budget ledger, savings goals, motivational quotes, the
//! SSE chat surface, and weather lookup.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=sqlite://profi.db cargo run -p profi-api
//! ```

use profi_api::{
    app::{build_router, AppState},
    config::Config,
};
use profi_chat::{ChatProvider, GroqConfig, GroqProvider, MockConfig, MockProvider};
use profi_shared::db::{migrations::run_migrations, pool};
use profi_shared::models::admin::Admin;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "profi_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("ProFi API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&db).await?;

    // Grant the bootstrap admin, if configured. Idempotent across restarts,
    // but the user must already be registered.
    if let Some(username) = &config.bootstrap_admin {
        match Admin::grant(&db, username).await {
            Ok(()) => tracing::info!(username, "Bootstrap admin granted"),
            Err(e) => tracing::warn!(username, error = %e, "Bootstrap admin grant failed"),
        }
    }

    let chat: Arc<dyn ChatProvider> = match &config.chat.groq_api_key {
        Some(key) => {
            let mut groq = GroqConfig::new(key.clone());
            groq.model = config.chat.model.clone();
            Arc::new(GroqProvider::new(groq))
        }
        None => {
            tracing::warn!("GROQ_API_KEY not set, serving chat from the mock provider");
            Arc::new(MockProvider::new(MockConfig::default()))
        }
    };
    tracing::info!(provider = chat.name(), "Chat provider selected");

    let bind_address = config.bind_address();
    let state = AppState::new(db, config, chat);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
