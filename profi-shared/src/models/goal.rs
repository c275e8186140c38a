/// Savings goals
///
/// A goal is a named target per user with a running `current_savings` that
/// starts at 0 and only ever grows. Contributions are applied as one atomic
/// in-engine increment so concurrent contributions cannot lose updates.
/// Over-funding past the target is allowed.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{StoreError, StoreResult};

/// Savings goal row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FinancialGoal {
    pub id: i64,
    pub username: String,
    pub goal_name: String,
    pub target_amount: f64,
    pub current_savings: f64,
    pub deadline: Option<NaiveDate>,
}

impl FinancialGoal {
    /// Creates a goal with `current_savings = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the user already has a goal with
    /// this name.
    pub async fn add(
        pool: &SqlitePool,
        username: &str,
        name: &str,
        target_amount: f64,
        deadline: Option<NaiveDate>,
    ) -> StoreResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO financial_goals (username, goal_name, target_amount, current_savings, deadline)
            VALUES (?1, ?2, ?3, 0.0, ?4)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(name)
        .bind(target_amount)
        .bind(deadline)
        .fetch_one(pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "goal"))?;

        tracing::info!(username, goal = name, target_amount, "Goal created");
        Ok(id)
    }

    /// Atomically adds `amount` to the matching goal's savings.
    ///
    /// The increment happens in-engine (`current_savings = current_savings + ?`),
    /// never as a read-then-write from the caller. There is no cap at the
    /// target.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the user has no goal with this
    /// name; no row is created.
    pub async fn contribute(
        pool: &SqlitePool,
        username: &str,
        name: &str,
        amount: f64,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE financial_goals
            SET current_savings = current_savings + ?1
            WHERE username = ?2 AND goal_name = ?3
            "#,
        )
        .bind(amount)
        .bind(username)
        .bind(name)
        .execute(pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "goal"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("goal".to_string()));
        }

        tracing::debug!(username, goal = name, amount, "Contribution recorded");
        Ok(())
    }

    /// All goals for a user, ordered by creation.
    pub async fn list_for_user(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, FinancialGoal>(
            r#"
            SELECT id, username, goal_name, target_amount, current_savings, deadline
            FROM financial_goals
            WHERE username = ?1
            ORDER BY id
            "#,
        )
        .bind(username)
        .fetch_all(pool)
        .await
    }

    /// Savings-to-target ratio; 0 when the target is 0.
    ///
    /// Not capped at 1.0; over-funded goals report their real ratio.
    pub fn progress_ratio(&self) -> f64 {
        if self.target_amount > 0.0 {
            self.current_savings / self.target_amount
        } else {
            0.0
        }
    }
}
