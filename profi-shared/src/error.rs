/// Store-layer error taxonomy
///
/// Every store operation returns one of these kinds; raw sqlx errors never
/// cross the component boundary unclassified. The API layer maps them onto
/// HTTP statuses.
///
/// # Kinds
///
/// - [`StoreError::Duplicate`]: unique-constraint violation (second
///   registration with the same username/email, duplicate goal name)
/// - [`StoreError::NotFound`]: operating on a missing row (contributing to a
///   nonexistent goal, deleting an unknown quote)
/// - [`StoreError::Database`]: anything else the storage engine reports
use crate::auth::password::PasswordError;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated
    #[error("record already exists: {0}")]
    Duplicate(String),

    /// The target row does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Password hashing failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Underlying storage error
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// Classifies a sqlx error for the given entity name.
    ///
    /// Unique violations become [`StoreError::Duplicate`]; foreign-key
    /// violations and `RowNotFound` become [`StoreError::NotFound`].
    pub fn from_sqlx(err: sqlx::Error, entity: &str) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound(entity.to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate(entity.to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::NotFound(entity.to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Authentication error
///
/// Bad-password and unknown-identifier both surface as
/// [`AuthError::InvalidCredentials`] so the response shape cannot be used to
/// enumerate usernames.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Wrong password or unknown username/email (indistinguishable)
    #[error("invalid username/email or password")]
    InvalidCredentials,

    /// Password hash could not be processed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Underlying storage error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = StoreError::from_sqlx(sqlx::Error::RowNotFound, "goal");
        assert!(matches!(err, StoreError::NotFound(ref e) if e == "goal"));
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::Duplicate("user".to_string());
        assert_eq!(err.to_string(), "record already exists: user");

        let err = AuthError::InvalidCredentials;
        assert_eq!(err.to_string(), "invalid username/email or password");
    }
}
