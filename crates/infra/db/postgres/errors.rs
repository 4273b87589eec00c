use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::repositories::errors::RepositoryError;

/// Lifts constraint violations into `RepositoryError`, everything else passes through.
pub fn map_constraint_error(err: DieselError) -> anyhow::Error {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RepositoryError::UniqueViolation(constraint_label(info.as_ref())).into()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            RepositoryError::ForeignKeyViolation(constraint_label(info.as_ref())).into()
        }
        other => other.into(),
    }
}

fn constraint_label(info: &(dyn diesel::result::DatabaseErrorInformation + Send + Sync)) -> String {
    info.constraint_name()
        .unwrap_or_else(|| info.message())
        .to_string()
}

/// `%term%` for ILIKE with the pattern metacharacters escaped.
pub fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
