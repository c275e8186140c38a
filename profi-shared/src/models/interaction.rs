/// Chat interaction log
///
/// One row per completed question/answer exchange. Cancelled or failed chat
/// streams are never recorded; partial output is discarded.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{StoreError, StoreResult};

/// Completed chat exchange
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Interaction {
    pub id: i64,
    pub username: String,
    pub question: String,
    pub bot_response: String,
    pub created_at: DateTime<Utc>,
}

impl Interaction {
    /// Records a completed exchange.
    pub async fn record(
        pool: &SqlitePool,
        username: &str,
        question: &str,
        bot_response: &str,
    ) -> StoreResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO user_interactions (username, question, bot_response, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(question)
        .bind(bot_response)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "interaction"))?;

        Ok(id)
    }

    /// Most recent exchanges for a user, newest first.
    pub async fn list_for_user(
        pool: &SqlitePool,
        username: &str,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Interaction>(
            r#"
            SELECT id, username, question, bot_response, created_at
            FROM user_interactions
            WHERE username = ?1
            ORDER BY id DESC
            LIMIT ?2
            "#,
        )
        .bind(username)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
