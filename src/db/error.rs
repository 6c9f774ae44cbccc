use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key (username or client id) is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Unavailable(#[from] DbErr),
}

impl StoreError {
    /// Classifies an insert failure, turning unique violations into `Conflict`.
    pub(crate) fn from_insert(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::Conflict(msg),
            _ => Self::Unavailable(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_db_errors_are_unavailable() {
        let err = StoreError::from_insert(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
