/// Savings goal endpoints
///
/// # Endpoints
///
/// - `POST /v1/goals` - Create a goal
/// - `POST /v1/goals/contribute` - Add to a goal's saved total
/// - `GET /v1/goals` - List a user's goals
///
/// Goals may be over-funded; the stored total is never capped.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use profi_shared::models::goal::FinancialGoal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Goal creation request
#[derive(Debug, Deserialize, Validate)]
pub struct AddGoalRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, max = 100, message = "Goal name must be 1-100 characters"))]
    pub name: String,

    #[validate(range(min = 0.0, message = "Target amount must be non-negative"))]
    pub target_amount: f64,

    /// Optional target date
    pub deadline: Option<NaiveDate>,
}

/// Goal creation response
#[derive(Debug, Serialize)]
pub struct AddGoalResponse {
    pub goal_id: i64,
}

/// Contribution request
#[derive(Debug, Deserialize, Validate)]
pub struct ContributeRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Goal name is required"))]
    pub name: String,

    pub amount: f64,
}

/// Username query parameter
#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

/// Goal with its derived progress ratio
#[derive(Debug, Serialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: FinancialGoal,

    /// saved / target, uncapped; 0 when the target is 0
    pub progress_ratio: f64,
}

/// Creates a savings goal
///
/// # Errors
///
/// - `409 Conflict`: The user already has a goal with this name
pub async fn add_goal(
    State(state): State<AppState>,
    Json(req): Json<AddGoalRequest>,
) -> ApiResult<Json<AddGoalResponse>> {
    req.validate()?;

    let goal_id = FinancialGoal::add(
        &state.db,
        &req.username,
        &req.name,
        req.target_amount,
        req.deadline,
    )
    .await?;

    Ok(Json(AddGoalResponse { goal_id }))
}

/// Adds to a goal's saved total (atomic in-engine increment)
///
/// # Errors
///
/// - `404 Not Found`: No such goal for this user; nothing is created
pub async fn contribute(
    State(state): State<AppState>,
    Json(req): Json<ContributeRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    req.validate()?;

    FinancialGoal::contribute(&state.db, &req.username, &req.name, req.amount).await?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}

/// Lists a user's goals with progress ratios
pub async fn list_goals(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> ApiResult<Json<Vec<GoalView>>> {
    let goals = FinancialGoal::list_for_user(&state.db, &query.username).await?;

    let views = goals
        .into_iter()
        .map(|goal| GoalView {
            progress_ratio: goal.progress_ratio(),
            goal,
        })
        .collect();

    Ok(Json(views))
}
