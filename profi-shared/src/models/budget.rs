/// Budget ledger: planned amounts and the transaction log
///
/// Two tables back the ledger. `monthly_budget` holds one planned amount per
/// (username, month, category): writes are upserts, last writer wins.
/// `daily_transactions` is an append-only log; multiple entries per
/// day/category are additive.
///
/// # Amount sign convention
///
/// A transaction `amount` is a positive magnitude of spend; inflows (salary,
/// refunds) are recorded as negative amounts. This one convention applies to
/// everything that sums transactions.
///
/// # Example
///
/// ```no_run
/// use profi_shared::models::budget::{DailyTransaction, MonthlyBudget};
/// # use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// MonthlyBudget::set_planned(&pool, "maya", "Food", 100.0).await?;
/// DailyTransaction::log(&pool, "maya", "Food", 80.0, None).await?;
///
/// let progress = MonthlyBudget::progress(&pool, "maya").await?;
/// assert_eq!(progress[0].ratio, 0.8);
/// # Ok(())
/// # }
/// ```
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::error::{StoreError, StoreResult};

/// Planned budget row: one per (username, month, category)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MonthlyBudget {
    pub id: i64,
    pub username: String,
    /// Month key in `YYYY-MM` form
    pub month: String,
    pub category: String,
    pub planned_amount: f64,
}

/// Append-only transaction log row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyTransaction {
    pub id: i64,
    pub username: String,
    pub date: NaiveDate,
    pub category: String,
    /// Positive = spend, negative = inflow
    pub amount: f64,
}

/// Per-category progress for the current month
///
/// Categories with spend but no planned entry are surfaced here with
/// `planned = 0` rather than silently dropped.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryProgress {
    pub category: String,
    pub planned: f64,
    pub actual: f64,
    /// `min(actual / planned, 1.0)` when planned > 0, else 0
    pub ratio: f64,
}

/// Month totals for categories that have a planned entry
///
/// `total_spent` deliberately counts only planned categories, matching the
/// reference behavior; spend in unplanned categories is visible in
/// [`MonthlyBudget::progress`] but excluded from these totals, so the
/// summary undercounts raw spend.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetSummary {
    pub total_planned: f64,
    pub total_spent: f64,
    pub remaining: f64,
}

/// Current month key (`YYYY-MM`), local time
pub fn current_month() -> String {
    Local::now().format("%Y-%m").to_string()
}

/// Spend-to-plan ratio with the division-by-zero guard.
///
/// Defined as 0 when nothing is planned; capped at 1.0 for display.
pub fn progress_ratio(actual: f64, planned: f64) -> f64 {
    if planned > 0.0 {
        (actual / planned).min(1.0)
    } else {
        0.0
    }
}

impl MonthlyBudget {
    /// Sets the planned amount for (username, current month, category).
    ///
    /// A single in-engine upsert: a second write for the same triple
    /// overwrites the planned amount, never duplicates, and cannot lose
    /// updates to a concurrent writer.
    pub async fn set_planned(
        pool: &SqlitePool,
        username: &str,
        category: &str,
        amount: f64,
    ) -> StoreResult<()> {
        let month = current_month();

        sqlx::query(
            r#"
            INSERT INTO monthly_budget (username, month, category, planned_amount)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(username, month, category)
                DO UPDATE SET planned_amount = excluded.planned_amount
            "#,
        )
        .bind(username)
        .bind(&month)
        .bind(category)
        .bind(amount)
        .execute(pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "budget"))?;

        tracing::debug!(username, month, category, amount, "Planned budget set");
        Ok(())
    }

    /// Planned entries for (username, current month), ordered by category.
    pub async fn list_current(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyBudget>(
            r#"
            SELECT id, username, month, category, planned_amount
            FROM monthly_budget
            WHERE username = ?1 AND month = ?2
            ORDER BY category
            "#,
        )
        .bind(username)
        .bind(current_month())
        .fetch_all(pool)
        .await
    }

    /// Planned-versus-actual per category for the current month.
    ///
    /// The result is the union of planned and actual categories: a category
    /// that was spent against but never planned appears with `planned = 0`,
    /// and a planned category with no spend appears with `actual = 0`.
    pub async fn progress(
        pool: &SqlitePool,
        username: &str,
    ) -> StoreResult<Vec<CategoryProgress>> {
        let month = current_month();

        let planned = Self::list_current(pool, username)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "budget"))?;
        let actual = DailyTransaction::sums_by_category(pool, username, &month)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "budget"))?;

        let mut merged: BTreeMap<String, (f64, f64)> = BTreeMap::new();
        for entry in planned {
            merged.entry(entry.category).or_insert((0.0, 0.0)).0 = entry.planned_amount;
        }
        for (category, spent) in actual {
            merged.entry(category).or_insert((0.0, 0.0)).1 = spent;
        }

        Ok(merged
            .into_iter()
            .map(|(category, (planned, actual))| CategoryProgress {
                category,
                planned,
                actual,
                ratio: progress_ratio(actual, planned),
            })
            .collect())
    }

    /// Month totals over categories that have a planned entry.
    ///
    /// See [`BudgetSummary`] for the undercounting caveat on `total_spent`.
    pub async fn summary(pool: &SqlitePool, username: &str) -> StoreResult<BudgetSummary> {
        let month = current_month();

        let planned = Self::list_current(pool, username)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "budget"))?;
        let actual = DailyTransaction::sums_by_category(pool, username, &month)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "budget"))?;

        let total_planned: f64 = planned.iter().map(|e| e.planned_amount).sum();
        let total_spent: f64 = planned
            .iter()
            .map(|e| actual.get(&e.category).copied().unwrap_or(0.0))
            .sum();

        Ok(BudgetSummary {
            total_planned,
            total_spent,
            remaining: total_planned - total_spent,
        })
    }
}

impl DailyTransaction {
    /// Appends a transaction. `date` defaults to today.
    pub async fn log(
        pool: &SqlitePool,
        username: &str,
        category: &str,
        amount: f64,
        date: Option<NaiveDate>,
    ) -> StoreResult<i64> {
        let date = date.unwrap_or_else(|| Local::now().date_naive());

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO daily_transactions (username, date, category, amount)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(date)
        .bind(category)
        .bind(amount)
        .fetch_one(pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "transaction"))?;

        tracing::debug!(username, category, amount, %date, "Transaction logged");
        Ok(id)
    }

    /// Per-category spend sums for one month, summed in-engine.
    pub async fn sums_by_category(
        pool: &SqlitePool,
        username: &str,
        month: &str,
    ) -> Result<BTreeMap<String, f64>, sqlx::Error> {
        let rows: Vec<(String, f64)> = sqlx::query_as(
            r#"
            SELECT category, SUM(amount)
            FROM daily_transactions
            WHERE username = ?1 AND date LIKE ?2
            GROUP BY category
            "#,
        )
        .bind(username)
        .bind(format!("{month}-%"))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
