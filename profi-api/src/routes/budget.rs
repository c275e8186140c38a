/// Budget ledger endpoints
///
/// # Endpoints
///
/// - `POST /v1/budget/planned` - Upsert the planned amount for a category
/// - `POST /v1/budget/transactions` - Append a spend (or inflow, negative)
/// - `GET /v1/budget/progress` - Planned-versus-actual per category
/// - `GET /v1/budget/summary` - Month totals over planned categories
///
/// All reads and writes are scoped to the current calendar month in server
/// local time.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use profi_shared::models::budget::{BudgetSummary, CategoryProgress, DailyTransaction, MonthlyBudget};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Planned amount upsert request
#[derive(Debug, Deserialize, Validate)]
pub struct SetPlannedRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: String,

    /// Planned amount for the current month; replaces any prior value
    #[validate(range(min = 0.0, message = "Planned amount must be non-negative"))]
    pub amount: f64,
}

/// Transaction append request
#[derive(Debug, Deserialize, Validate)]
pub struct LogTransactionRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: String,

    /// Signed amount: positive is a spend, negative an inflow
    pub amount: f64,

    /// Transaction date; defaults to today
    pub date: Option<NaiveDate>,
}

/// Transaction append response
#[derive(Debug, Serialize)]
pub struct LogTransactionResponse {
    pub transaction_id: i64,
}

/// Username query parameter
#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

/// Upserts the planned amount for (username, current month, category)
///
/// Setting the same category twice in one month overwrites the planned
/// amount; it never creates a second row.
pub async fn set_planned(
    State(state): State<AppState>,
    Json(req): Json<SetPlannedRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    req.validate()?;

    MonthlyBudget::set_planned(&state.db, &req.username, &req.category, req.amount).await?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}

/// Appends a transaction to the ledger
///
/// The log is append-only: corrections are made with counter-entries, not
/// edits.
pub async fn log_transaction(
    State(state): State<AppState>,
    Json(req): Json<LogTransactionRequest>,
) -> ApiResult<Json<LogTransactionResponse>> {
    req.validate()?;

    let transaction_id =
        DailyTransaction::log(&state.db, &req.username, &req.category, req.amount, req.date)
            .await?;

    Ok(Json(LogTransactionResponse { transaction_id }))
}

/// Planned-versus-actual per category for the current month
///
/// Categories spent against without a planned entry still appear, with
/// `planned = 0` and `ratio = 0`.
pub async fn progress(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> ApiResult<Json<Vec<CategoryProgress>>> {
    let progress = MonthlyBudget::progress(&state.db, &query.username).await?;
    Ok(Json(progress))
}

/// Month totals over planned categories
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> ApiResult<Json<BudgetSummary>> {
    let summary = MonthlyBudget::summary(&state.db, &query.username).await?;
    Ok(Json(summary))
}
