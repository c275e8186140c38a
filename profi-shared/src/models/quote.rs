/// Motivational quote store
///
/// Quotes are independent of users: a flat (category, text) collection read
/// uniformly at random, optionally filtered by category. Mutations are
/// admin-gated by the caller; this store performs no authorization check
/// itself (documented contract; the API layer fails closed on
/// [`crate::models::admin::Admin::is_admin`] first).
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{StoreError, StoreResult};

/// Returned when no quote matches the requested category (or the table is
/// empty). `random` never fails on an empty set.
pub const FALLBACK_QUOTE: &str = "Keep pushing forward!";

/// Quote row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Quote {
    pub id: i64,
    pub category: String,
    pub quote: String,
}

impl Quote {
    /// Inserts a quote. Caller must have verified admin membership.
    pub async fn add(pool: &SqlitePool, category: &str, text: &str) -> StoreResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO motivational_quotes (category, quote)
            VALUES (?1, ?2)
            RETURNING id
            "#,
        )
        .bind(category)
        .bind(text)
        .fetch_one(pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "quote"))?;

        Ok(id)
    }

    /// All quotes in insertion order.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, category, quote
            FROM motivational_quotes
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Deletes a quote by id. Caller must have verified admin membership.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no quote has this id.
    pub async fn delete(pool: &SqlitePool, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM motivational_quotes WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "quote"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("quote".to_string()));
        }

        Ok(())
    }

    /// Uniform random quote, optionally filtered by category.
    ///
    /// Selection happens in-engine (`ORDER BY RANDOM() LIMIT 1`). An empty
    /// result set yields [`FALLBACK_QUOTE`], never an error.
    pub async fn random(
        pool: &SqlitePool,
        category: Option<&str>,
    ) -> Result<String, sqlx::Error> {
        let picked: Option<String> = match category {
            Some(category) => {
                sqlx::query_scalar(
                    r#"
                    SELECT quote FROM motivational_quotes
                    WHERE category = ?1
                    ORDER BY RANDOM() LIMIT 1
                    "#,
                )
                .bind(category)
                .fetch_optional(pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT quote FROM motivational_quotes ORDER BY RANDOM() LIMIT 1",
                )
                .fetch_optional(pool)
                .await?
            }
        };

        Ok(picked.unwrap_or_else(|| FALLBACK_QUOTE.to_string()))
    }
}
