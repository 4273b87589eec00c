pub mod password;

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Duration, Utc};
use crates::domain::value_objects::{enums::roles::Role, users::UserModel};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::usecases::{UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub username: String,
}

impl From<&UserModel> for TokenUser {
    fn from(user: &UserModel) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLifetime {
    Access,
    Refresh,
}

/// HS256 keys and token lifetimes. Shared with handlers through a request extension.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, access_ttl_minutes: i64, refresh_ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::hours(refresh_ttl_hours),
        }
    }

    pub fn issue(&self, user: TokenUser, lifetime: TokenLifetime) -> UseCaseResult<String> {
        let now = Utc::now();
        let ttl = match lifetime {
            TokenLifetime::Access => self.access_ttl,
            TokenLifetime::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            user,
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| UseCaseError::Internal(anyhow::anyhow!("failed to sign token: {err}")))
    }

    pub fn validate(&self, token: &str) -> UseCaseResult<Claims> {
        let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

        let token_data = decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
            UseCaseError::Unauthenticated(format!("JWT validation failed: {err}"))
        })?;

        Ok(token_data.claims)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub username: String,
}

impl AuthUser {
    pub fn from_claims(claims: Claims) -> UseCaseResult<Self> {
        let user_id = Uuid::parse_str(&claims.user.id)
            .map_err(|_| UseCaseError::Unauthenticated("Invalid user ID in token".to_string()))?;

        Ok(Self {
            user_id,
            email: claims.user.email,
            role: claims.user.role,
            username: claims.user.username,
        })
    }

    pub fn require_admin(&self) -> UseCaseResult<()> {
        if self.role.is_admin() {
            return Ok(());
        }
        Err(UseCaseError::Forbidden("admin role required".to_string()))
    }

    pub fn require_buyer(&self) -> UseCaseResult<()> {
        match self.role {
            Role::Buyer | Role::Admin => Ok(()),
            Role::Guest => Err(UseCaseError::Forbidden("buyer role required".to_string())),
        }
    }

    pub fn require_self_or_admin(&self, target_id: Uuid) -> UseCaseResult<()> {
        if self.user_id == target_id || self.role.is_admin() {
            return Ok(());
        }
        Err(UseCaseError::Forbidden(
            "not allowed to act on another account".to_string(),
        ))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = UseCaseError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = parts
            .extensions
            .get::<Arc<JwtKeys>>()
            .cloned()
            .ok_or_else(|| UseCaseError::Internal(anyhow::anyhow!("JWT keys are not installed")))?;

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    UseCaseError::Unauthenticated(
                        "Missing or malformed Authorization header".to_string(),
                    )
                })?;

        let claims = keys.validate(bearer.token())?;

        AuthUser::from_claims(claims)
    }
}

/// Caller identity when present. Never rejects; anonymous callers are guests.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn role(&self) -> Role {
        self.0.as_ref().map(|user| user.role).unwrap_or(Role::Guest)
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}

#[cfg(test)]
mod tests;
