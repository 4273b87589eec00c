use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{entities::users::UserEntity, value_objects::enums::roles::Role};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Public view of an account. The password hash never leaves the repository layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserModel {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for UserModel {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            role: Role::from_str(&entity.role).unwrap_or_default(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserModel {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginModel {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResultModel {
    pub user: UserModel,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyTokenModel {
    pub valid: bool,
    pub user: UserModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyTokenQuery {
    #[serde(default)]
    pub refresh: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserModel {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordModel {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersFilter {
    pub q: Option<String>,
}

pub fn normalize_username(value: &str) -> Option<String> {
    let username = value.trim().to_lowercase();
    (!username.is_empty()).then_some(username)
}

/// Trimmed, lowercased address of the `local@domain.tld` shape.
pub fn normalize_email(value: &str) -> Option<String> {
    let email = value.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;

    let valid = !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));

    valid.then_some(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Ana@Example.COM "),
            Some("ana@example.com".to_string())
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["", "ana", "ana@", "@example.com", "ana@example", "a b@x.io", "a@b@c.io"] {
            assert_eq!(normalize_email(email), None, "{email}");
        }
    }

    #[test]
    fn blank_username_is_rejected() {
        assert_eq!(normalize_username("   "), None);
        assert_eq!(normalize_username(" Ana "), Some("ana".to_string()));
    }
}
