//! Error type for repository operations that enforce domain rules.
//!
//! Plain reads return `sqlx::Error`; operations that validate, lock, or
//! span several tables return [`RepoError`] so callers can tell a business
//! rule failure from a database failure.

use mes_core::error::CoreError;

/// PostgreSQL `lock_not_available`: a `NOWAIT` lock or `lock_timeout` expired.
pub const LOCK_NOT_AVAILABLE: &str = "55P03";

/// PostgreSQL `query_canceled`: raised when `statement_timeout` fires.
pub const QUERY_CANCELED: &str = "57014";

/// PostgreSQL `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Lock failures become [`CoreError::LockContention`]; everything else stays
/// a database error.
impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(
                db_err.code().as_deref(),
                Some(LOCK_NOT_AVAILABLE) | Some(QUERY_CANCELED)
            ) {
                return RepoError::Core(CoreError::LockContention(db_err.message().to_string()));
            }
        }
        RepoError::Database(err)
    }
}

/// Whether `err` is a unique violation on `constraint`.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
