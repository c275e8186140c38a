/// Database access layer
///
/// # Modules
///
/// - [`pool`]: SQLite connection pool with health checks
/// - [`migrations`]: embedded schema migration runner

pub mod migrations;
pub mod pool;
