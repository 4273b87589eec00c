use thiserror::Error;

/// Constraint failures the storage layer reports in a typed form.
/// Repositories return them inside `anyhow::Error`; use cases downcast.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
}

impl RepositoryError {
    pub fn from_anyhow(err: &anyhow::Error) -> Option<&RepositoryError> {
        err.downcast_ref::<RepositoryError>()
    }
}
