/// User model and credential operations
///
/// A user is an identity record: unique username, unique email, an Argon2id
/// password hash, and display preferences (region, currency). Users are
/// created at registration, mutated only by password reset, and never
/// deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     username TEXT NOT NULL UNIQUE,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     region TEXT,
///     currency TEXT,
///     created_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use profi_shared::models::user::{NewUser, User};
/// # use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let id = User::register(
///     &pool,
///     NewUser {
///         username: "maya".to_string(),
///         password: "correct-horse-battery".to_string(),
///         email: "maya@example.com".to_string(),
///         region: Some("CA".to_string()),
///         currency: Some("CAD".to_string()),
///     },
/// )
/// .await?;
///
/// let summary = User::authenticate(&pool, "maya", "correct-horse-battery").await?;
/// assert_eq!(summary.id, id);
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::password;
use crate::error::{AuthError, StoreError, StoreResult};

/// User account row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Row id
    pub id: i64,

    /// Unique login/display name; partition key for every ledger table
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Argon2id PHC string, never plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Self-reported region
    pub region: Option<String>,

    /// Preferred display currency
    pub currency: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for registering a new user
///
/// Carries the plaintext password only as far as `register`, which hashes it
/// before anything touches the database.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub region: Option<String>,
    pub currency: Option<String>,
}

/// What `authenticate` hands back to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub region: Option<String>,
    pub currency: Option<String>,
}

impl User {
    /// Registers a new user.
    ///
    /// The password is hashed with a fresh salt before insertion. Username
    /// and email are each globally unique.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the username or email is already
    /// taken; the existing registration is untouched.
    pub async fn register(pool: &SqlitePool, data: NewUser) -> StoreResult<i64> {
        let password_hash = password::hash_password(&data.password)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash, region, currency, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            "#,
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(&password_hash)
        .bind(&data.region)
        .bind(&data.currency)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "user"))?;

        tracing::info!(username = %data.username, "User registered");
        Ok(id)
    }

    /// Authenticates by username or email.
    ///
    /// Unknown identifier and wrong password both come back as
    /// [`AuthError::InvalidCredentials`]; the unknown-identifier path still
    /// performs hashing work so response timing does not reveal whether the
    /// account exists.
    pub async fn authenticate(
        pool: &SqlitePool,
        identifier: &str,
        supplied_password: &str,
    ) -> Result<UserSummary, AuthError> {
        let user = Self::find_by_identifier(pool, identifier).await?;

        let user = match user {
            Some(user) => user,
            None => {
                password::equalize_timing(supplied_password);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !password::verify_password(supplied_password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(UserSummary {
            id: user.id,
            username: user.username,
            region: user.region,
            currency: user.currency,
        })
    }

    /// Re-hashes and overwrites the password for the matching user.
    ///
    /// No session invalidation happens here; there is no session model.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no user matches the identifier.
    pub async fn reset_password(
        pool: &SqlitePool,
        identifier: &str,
        new_password: &str,
    ) -> StoreResult<()> {
        let password_hash = password::hash_password(new_password)?;

        let result = sqlx::query(
            r#"
            UPDATE users SET password_hash = ?1
            WHERE username = ?2 OR email = ?2
            "#,
        )
        .bind(&password_hash)
        .bind(identifier)
        .execute(pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "user"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("user".to_string()));
        }

        tracing::info!(identifier, "Password reset");
        Ok(())
    }

    /// Finds a user by username or email.
    pub async fn find_by_identifier(
        pool: &SqlitePool,
        identifier: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, region, currency, created_at
            FROM users
            WHERE username = ?1 OR email = ?1
            "#,
        )
        .bind(identifier)
        .fetch_optional(pool)
        .await
    }
}
