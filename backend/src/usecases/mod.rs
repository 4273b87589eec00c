pub mod categories;
pub mod item_types;
pub mod items;
pub mod navbar;
pub mod payments;
pub mod purchases;
pub mod sales;
pub mod users;

use axum::http::StatusCode;
use crates::domain::repositories::errors::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UseCaseError::Validation(_) => StatusCode::BAD_REQUEST,
            UseCaseError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            UseCaseError::Forbidden(_) => StatusCode::FORBIDDEN,
            UseCaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UseCaseError::Conflict(_) => StatusCode::CONFLICT,
            UseCaseError::Configuration(_)
            | UseCaseError::Upstream(_)
            | UseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps constraint violations raised by a write into `Conflict`/`Validation`.
    pub fn from_write(err: anyhow::Error, conflict_message: &str) -> Self {
        match RepositoryError::from_anyhow(&err) {
            Some(RepositoryError::UniqueViolation(_)) => {
                UseCaseError::Conflict(conflict_message.to_string())
            }
            Some(RepositoryError::ForeignKeyViolation(constraint)) => {
                UseCaseError::Validation(format!("referenced record does not exist or is in use ({constraint})"))
            }
            None => UseCaseError::Internal(err),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UseCaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_becomes_conflict() {
        let err = anyhow::Error::new(RepositoryError::UniqueViolation("users_email_key".into()));
        let mapped = UseCaseError::from_write(err, "email already registered");

        assert!(matches!(mapped, UseCaseError::Conflict(ref msg) if msg == "email already registered"));
        assert_eq!(mapped.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_errors_stay_internal() {
        let mapped = UseCaseError::from_write(anyhow::anyhow!("connection reset"), "dup");
        assert_eq!(mapped.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
