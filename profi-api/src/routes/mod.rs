/// API route handlers
///
/// # Route Groups
///
/// - `health`: liveness and database connectivity
/// - `auth`: registration, login, password reset
/// - `budget`: planned amounts, transactions, progress, summary
/// - `goals`: savings goals and contributions
/// - `quotes`: motivational quotes (management is admin-gated)
/// - `chat`: the SSE chat surface and interaction history
/// - `weather`: city weather lookup

pub mod auth;
pub mod budget;
pub mod chat;
pub mod goals;
pub mod health;
pub mod quotes;
pub mod weather;
