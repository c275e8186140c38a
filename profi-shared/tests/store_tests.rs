/// Integration tests for the ProFi stores
///
/// These run against an in-memory SQLite database with the full migration
/// set applied, so no external services are required.
///
/// Run with: cargo test -p profi-shared --test store_tests
use profi_shared::db::migrations::run_migrations;
use profi_shared::db::pool::{create_pool, DatabaseConfig};
use profi_shared::error::{AuthError, StoreError};
use profi_shared::models::admin::Admin;
use profi_shared::models::budget::{DailyTransaction, MonthlyBudget};
use profi_shared::models::goal::FinancialGoal;
use profi_shared::models::interaction::Interaction;
use profi_shared::models::quote::{Quote, FALLBACK_QUOTE};
use profi_shared::models::user::{NewUser, User};
use sqlx::SqlitePool;

/// Fresh in-memory database with the schema applied.
///
/// One connection only: each in-memory SQLite connection is its own
/// database, so the pool must not fan out.
async fn test_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        ..Default::default()
    };

    let pool = create_pool(config).await.expect("pool should be created");
    run_migrations(&pool).await.expect("migrations should apply");
    pool
}

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: "a-long-enough-password".to_string(),
        email: email.to_string(),
        region: Some("EU".to_string()),
        currency: Some("EUR".to_string()),
    }
}

#[tokio::test]
async fn test_register_duplicate_email_fails_first_remains() {
    let pool = test_pool().await;

    let id = User::register(&pool, new_user("alice", "alice@example.com"))
        .await
        .expect("first registration should succeed");

    let err = User::register(&pool, new_user("alice2", "alice@example.com"))
        .await
        .expect_err("duplicate email should fail");
    assert!(matches!(err, StoreError::Duplicate(_)));

    // First registration is untouched and still queryable.
    let summary = User::authenticate(&pool, "alice", "a-long-enough-password")
        .await
        .expect("first user should still authenticate");
    assert_eq!(summary.id, id);
    assert_eq!(summary.username, "alice");
}

#[tokio::test]
async fn test_register_duplicate_username_fails() {
    let pool = test_pool().await;

    User::register(&pool, new_user("bob", "bob@example.com"))
        .await
        .unwrap();

    let err = User::register(&pool, new_user("bob", "other@example.com"))
        .await
        .expect_err("duplicate username should fail");
    assert!(matches!(err, StoreError::Duplicate(_)));
}

#[tokio::test]
async fn test_authenticate_failures_are_indistinguishable() {
    let pool = test_pool().await;

    User::register(&pool, new_user("carol", "carol@example.com"))
        .await
        .unwrap();

    // Correct username, wrong password.
    let wrong_password = User::authenticate(&pool, "carol", "not-the-password")
        .await
        .expect_err("wrong password should fail");

    // Unknown identifier, "correct" password.
    let wrong_user = User::authenticate(&pool, "nobody", "a-long-enough-password")
        .await
        .expect_err("unknown user should fail");

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(wrong_user, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_authenticate_by_email() {
    let pool = test_pool().await;

    User::register(&pool, new_user("dave", "dave@example.com"))
        .await
        .unwrap();

    let summary = User::authenticate(&pool, "dave@example.com", "a-long-enough-password")
        .await
        .expect("email identifier should work");
    assert_eq!(summary.username, "dave");
}

#[tokio::test]
async fn test_reset_password() {
    let pool = test_pool().await;

    User::register(&pool, new_user("erin", "erin@example.com"))
        .await
        .unwrap();

    User::reset_password(&pool, "erin@example.com", "brand-new-password")
        .await
        .expect("reset should succeed");

    assert!(
        User::authenticate(&pool, "erin", "a-long-enough-password")
            .await
            .is_err(),
        "old password should no longer work"
    );
    User::authenticate(&pool, "erin", "brand-new-password")
        .await
        .expect("new password should work");

    let err = User::reset_password(&pool, "ghost", "whatever-password")
        .await
        .expect_err("unknown identifier should fail");
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_set_planned_is_idempotent_upsert() {
    let pool = test_pool().await;

    MonthlyBudget::set_planned(&pool, "u", "Food", 100.0)
        .await
        .unwrap();
    MonthlyBudget::set_planned(&pool, "u", "Food", 150.0)
        .await
        .unwrap();

    let entries = MonthlyBudget::list_current(&pool, "u").await.unwrap();
    assert_eq!(entries.len(), 1, "upsert must not duplicate the triple");
    assert_eq!(entries[0].category, "Food");
    assert_eq!(entries[0].planned_amount, 150.0);
}

#[tokio::test]
async fn test_progress_planned_and_actual() {
    let pool = test_pool().await;

    MonthlyBudget::set_planned(&pool, "u", "Food", 100.0)
        .await
        .unwrap();
    DailyTransaction::log(&pool, "u", "Food", 50.0, None)
        .await
        .unwrap();
    DailyTransaction::log(&pool, "u", "Food", 30.0, None)
        .await
        .unwrap();

    let progress = MonthlyBudget::progress(&pool, "u").await.unwrap();
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].planned, 100.0);
    assert_eq!(progress[0].actual, 80.0);
    assert_eq!(progress[0].ratio, 0.8);
}

#[tokio::test]
async fn test_progress_zero_planned_is_zero_ratio() {
    let pool = test_pool().await;

    MonthlyBudget::set_planned(&pool, "u", "Gifts", 0.0)
        .await
        .unwrap();
    DailyTransaction::log(&pool, "u", "Gifts", 25.0, None)
        .await
        .unwrap();

    let progress = MonthlyBudget::progress(&pool, "u").await.unwrap();
    assert_eq!(progress[0].ratio, 0.0, "planned 0 must not divide");
}

#[tokio::test]
async fn test_progress_surfaces_unplanned_categories() {
    let pool = test_pool().await;

    MonthlyBudget::set_planned(&pool, "u", "Food", 100.0)
        .await
        .unwrap();
    DailyTransaction::log(&pool, "u", "Taxi", 12.5, None)
        .await
        .unwrap();

    let progress = MonthlyBudget::progress(&pool, "u").await.unwrap();
    let taxi = progress
        .iter()
        .find(|p| p.category == "Taxi")
        .expect("unplanned category must be surfaced");
    assert_eq!(taxi.planned, 0.0);
    assert_eq!(taxi.actual, 12.5);
    assert_eq!(taxi.ratio, 0.0);
}

#[tokio::test]
async fn test_summary_counts_only_planned_categories() {
    let pool = test_pool().await;

    MonthlyBudget::set_planned(&pool, "u", "Food", 100.0)
        .await
        .unwrap();
    MonthlyBudget::set_planned(&pool, "u", "Rent", 500.0)
        .await
        .unwrap();
    DailyTransaction::log(&pool, "u", "Food", 80.0, None)
        .await
        .unwrap();
    // Spend in a category with no planned entry: visible in progress,
    // excluded from the summary totals.
    DailyTransaction::log(&pool, "u", "Taxi", 40.0, None)
        .await
        .unwrap();

    let summary = MonthlyBudget::summary(&pool, "u").await.unwrap();
    assert_eq!(summary.total_planned, 600.0);
    assert_eq!(summary.total_spent, 80.0);
    assert_eq!(summary.remaining, 520.0);
}

#[tokio::test]
async fn test_contribute_twice_and_ratio() {
    let pool = test_pool().await;

    FinancialGoal::add(&pool, "u", "Car", 200.0, None)
        .await
        .unwrap();
    FinancialGoal::contribute(&pool, "u", "Car", 50.0)
        .await
        .unwrap();
    FinancialGoal::contribute(&pool, "u", "Car", 50.0)
        .await
        .unwrap();

    let goals = FinancialGoal::list_for_user(&pool, "u").await.unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].current_savings, 100.0);
    assert_eq!(goals[0].progress_ratio(), 0.5);
}

#[tokio::test]
async fn test_contribute_to_missing_goal_creates_nothing() {
    let pool = test_pool().await;

    let err = FinancialGoal::contribute(&pool, "u", "Yacht", 50.0)
        .await
        .expect_err("missing goal should fail");
    assert!(matches!(err, StoreError::NotFound(_)));

    let goals = FinancialGoal::list_for_user(&pool, "u").await.unwrap();
    assert!(goals.is_empty(), "failed contribute must not create a row");
}

#[tokio::test]
async fn test_goal_over_funding_allowed() {
    let pool = test_pool().await;

    FinancialGoal::add(&pool, "u", "Trip", 100.0, None)
        .await
        .unwrap();
    FinancialGoal::contribute(&pool, "u", "Trip", 250.0)
        .await
        .unwrap();

    let goals = FinancialGoal::list_for_user(&pool, "u").await.unwrap();
    assert_eq!(goals[0].current_savings, 250.0);
    assert_eq!(goals[0].progress_ratio(), 2.5);
}

#[tokio::test]
async fn test_duplicate_goal_name_rejected() {
    let pool = test_pool().await;

    FinancialGoal::add(&pool, "u", "Car", 200.0, None)
        .await
        .unwrap();
    let err = FinancialGoal::add(&pool, "u", "Car", 300.0, None)
        .await
        .expect_err("same goal name for one user should fail");
    assert!(matches!(err, StoreError::Duplicate(_)));
}

#[tokio::test]
async fn test_random_quote_fallback_on_empty_set() {
    let pool = test_pool().await;

    let text = Quote::random(&pool, Some("unknown-category"))
        .await
        .expect("random must never fail");
    assert_eq!(text, FALLBACK_QUOTE);

    let text = Quote::random(&pool, None).await.unwrap();
    assert_eq!(text, FALLBACK_QUOTE);
}

#[tokio::test]
async fn test_quote_lifecycle() {
    let pool = test_pool().await;

    let id1 = Quote::add(&pool, "saving", "A penny saved.").await.unwrap();
    let id2 = Quote::add(&pool, "budgeting", "Plan the month.").await.unwrap();

    let quotes = Quote::list(&pool).await.unwrap();
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].id, id1, "list must be in insertion order");

    let text = Quote::random(&pool, Some("saving")).await.unwrap();
    assert_eq!(text, "A penny saved.");

    Quote::delete(&pool, id2).await.unwrap();
    let err = Quote::delete(&pool, id2)
        .await
        .expect_err("second delete should fail");
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_admin_membership() {
    let pool = test_pool().await;

    User::register(&pool, new_user("root", "root@example.com"))
        .await
        .unwrap();

    assert!(!Admin::is_admin(&pool, "root").await.unwrap());
    Admin::grant(&pool, "root").await.unwrap();
    assert!(Admin::is_admin(&pool, "root").await.unwrap());

    // Idempotent.
    Admin::grant(&pool, "root").await.unwrap();
    assert!(Admin::is_admin(&pool, "root").await.unwrap());
}

#[tokio::test]
async fn test_admin_grant_requires_existing_user() {
    let pool = test_pool().await;

    let err = Admin::grant(&pool, "phantom")
        .await
        .expect_err("granting a nonexistent user should fail");
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_interaction_log() {
    let pool = test_pool().await;

    Interaction::record(&pool, "u", "How do I save?", "Start small.")
        .await
        .unwrap();
    Interaction::record(&pool, "u", "And then?", "Automate it.")
        .await
        .unwrap();

    let history = Interaction::list_for_user(&pool, "u", 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].question, "And then?", "newest first");
}
