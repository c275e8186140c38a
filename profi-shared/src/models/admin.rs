/// Admin allow-list
///
/// An admin is a username marked with quote-management privilege. Membership
/// is granted only by an out-of-band bootstrap action (startup hook), never
/// through an API route. The foreign key to `users(username)` guarantees the
/// referenced account exists.
///
/// The store performs no authorization itself: callers must check
/// [`Admin::is_admin`] and fail closed before invoking any mutating quote
/// operation.
use sqlx::SqlitePool;

use crate::error::{StoreError, StoreResult};

/// Admin membership operations
pub struct Admin;

impl Admin {
    /// Pure existence check against the admin set.
    pub async fn is_admin(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM admins WHERE username = ?1")
                .bind(username)
                .fetch_optional(pool)
                .await?;

        Ok(exists.is_some())
    }

    /// Grants admin membership to an existing user. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such user exists (foreign-key
    /// violation).
    pub async fn grant(pool: &SqlitePool, username: &str) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admins (username) VALUES (?1)
            ON CONFLICT(username) DO NOTHING
            "#,
        )
        .bind(username)
        .execute(pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "user"))?;

        tracing::info!(username, "Admin membership granted");
        Ok(())
    }
}
