/// Motivational quote endpoints
///
/// # Endpoints
///
/// - `GET /v1/quotes/random` - Random quote, public, never fails
/// - `POST /v1/quotes` - Add a quote (admin only)
/// - `GET /v1/quotes` - List all quotes (admin only)
/// - `DELETE /v1/quotes/:id` - Remove a quote (admin only)
///
/// Management endpoints fail closed: admin membership is checked before the
/// store is touched, and a membership lookup error denies access rather than
/// granting it.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use profi_shared::models::{admin::Admin, quote::Quote};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Random quote query parameters
#[derive(Debug, Deserialize)]
pub struct RandomQuoteQuery {
    /// Optional category filter
    pub category: Option<String>,
}

/// Random quote response
#[derive(Debug, Serialize, Deserialize)]
pub struct RandomQuoteResponse {
    pub quote: String,
}

/// Quote creation request
#[derive(Debug, Deserialize, Validate)]
pub struct AddQuoteRequest {
    /// Acting username; must be an admin
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: String,

    #[validate(length(min = 1, message = "Quote text is required"))]
    pub quote: String,
}

/// Quote creation response
#[derive(Debug, Serialize)]
pub struct AddQuoteResponse {
    pub quote_id: i64,
}

/// Username query parameter (acting admin)
#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

/// Quote deletion request body
#[derive(Debug, Deserialize)]
pub struct DeleteQuoteRequest {
    /// Acting username; must be an admin
    pub username: String,
}

/// Verifies admin membership, failing closed.
async fn require_admin(state: &AppState, username: &str) -> Result<(), ApiError> {
    let is_admin = Admin::is_admin(&state.db, username).await.map_err(|e| {
        tracing::error!(error = %e, "Admin membership check failed");
        ApiError::Forbidden("Admin access required".to_string())
    })?;

    if !is_admin {
        tracing::warn!(username, "Non-admin attempted quote management");
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    Ok(())
}

/// Returns one random quote, optionally filtered by category
///
/// Never errors toward the caller: an empty store (or empty category) yields
/// the built-in fallback quote.
pub async fn random_quote(
    State(state): State<AppState>,
    Query(query): Query<RandomQuoteQuery>,
) -> ApiResult<Json<RandomQuoteResponse>> {
    let quote = Quote::random(&state.db, query.category.as_deref()).await?;
    Ok(Json(RandomQuoteResponse { quote }))
}

/// Adds a quote (admin only)
pub async fn add_quote(
    State(state): State<AppState>,
    Json(req): Json<AddQuoteRequest>,
) -> ApiResult<Json<AddQuoteResponse>> {
    req.validate()?;
    require_admin(&state, &req.username).await?;

    let quote_id = Quote::add(&state.db, &req.category, &req.quote).await?;

    Ok(Json(AddQuoteResponse { quote_id }))
}

/// Lists all quotes in insertion order (admin only)
pub async fn list_quotes(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> ApiResult<Json<Vec<Quote>>> {
    require_admin(&state, &query.username).await?;

    let quotes = Quote::list(&state.db).await?;
    Ok(Json(quotes))
}

/// Deletes a quote by id (admin only)
///
/// # Errors
///
/// - `404 Not Found`: No quote with this id
pub async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<DeleteQuoteRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&state, &req.username).await?;

    Quote::delete(&state.db, id).await?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}
