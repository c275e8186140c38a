/// Authentication endpoints
///
/// This module provides user credential endpoints:
/// - Registration
/// - Login
/// - Password reset
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Verify credentials
/// - `POST /v1/auth/reset-password` - Replace a password
///
/// Failures from login never say whether the identifier or the password was
/// wrong; the store layer burns a hash verification even for unknown
/// identifiers so timing stays flat.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use profi_shared::models::user::{NewUser, User, UserSummary};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username (3-50 characters)
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Optional home region
    #[validate(length(max = 100, message = "Region must be at most 100 characters"))]
    pub region: Option<String>,

    /// Optional preferred currency code
    #[validate(length(max = 10, message = "Currency must be at most 10 characters"))]
    pub currency: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// New user id
    pub user_id: i64,

    /// Registered username
    pub username: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,

    /// Password
    pub password: String,
}

/// Password reset request
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Username or email
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,

    /// Replacement password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "a-strong-password",
///   "email": "alice@example.com",
///   "region": "EU",
///   "currency": "EUR"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Username or email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    req.validate()?;

    let user_id = User::register(
        &state.db,
        NewUser {
            username: req.username.clone(),
            password: req.password,
            email: req.email,
            region: req.region,
            currency: req.currency,
        },
    )
    .await?;

    tracing::info!(user_id, username = %req.username, "User registered");

    Ok(Json(RegisterResponse {
        user_id,
        username: req.username,
    }))
}

/// Login endpoint
///
/// Verifies credentials and returns the user profile summary. There is no
/// session token; the presentation collaborator keeps its own session state.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials (always the same body)
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<UserSummary>> {
    req.validate()?;

    let summary = User::authenticate(&state.db, &req.identifier, &req.password).await?;

    tracing::info!(username = %summary.username, "User logged in");

    Ok(Json(summary))
}

/// Password reset endpoint
///
/// Replaces the stored hash for the given identifier. The original product
/// surface has no email loop, so this is a direct replacement.
///
/// # Errors
///
/// - `404 Not Found`: Unknown identifier
/// - `422 Unprocessable Entity`: Validation failed
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    req.validate()?;

    User::reset_password(&state.db, &req.identifier, &req.new_password).await?;

    tracing::info!("Password reset completed");

    Ok(Json(serde_json::json!({ "status": "ok" })))
}
