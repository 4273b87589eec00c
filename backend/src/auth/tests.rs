use super::*;
use axum::http::{Request, header::AUTHORIZATION};
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "supersecretjwtsecretforunittesting123";

fn keys() -> Arc<JwtKeys> {
    Arc::new(JwtKeys::new(SECRET, 30, 24))
}

fn token_user(role: Role) -> TokenUser {
    TokenUser {
        id: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        email: "test@example.com".to_string(),
        role,
        username: "tester".to_string(),
    }
}

fn parts_with(authorization: Option<&str>, keys: Option<Arc<JwtKeys>>) -> Parts {
    let mut builder = Request::builder().uri("/");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    let (mut parts, _) = builder.body(()).unwrap().into_parts();
    if let Some(keys) = keys {
        parts.extensions.insert(keys);
    }
    parts
}

#[test]
fn test_issue_and_validate_round_trip() {
    let keys = keys();
    let token = keys.issue(token_user(Role::Buyer), TokenLifetime::Access).unwrap();

    let claims = keys.validate(&token).expect("Valid token should pass");
    assert_eq!(claims.user, token_user(Role::Buyer));
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_refresh_token_outlives_access_token() {
    let keys = keys();
    let access = keys
        .validate(&keys.issue(token_user(Role::Buyer), TokenLifetime::Access).unwrap())
        .unwrap();
    let refresh = keys
        .validate(&keys.issue(token_user(Role::Buyer), TokenLifetime::Refresh).unwrap())
        .unwrap();

    assert!(refresh.exp > access.exp);
}

#[test]
fn test_validate_jwt_expired() {
    let claims = Claims {
        user: token_user(Role::Buyer),
        iat: 0,
        exp: 1,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let result = keys().validate(&token);
    assert!(matches!(result, Err(UseCaseError::Unauthenticated(_))));
}

#[test]
fn test_validate_jwt_invalid_signature() {
    let other = JwtKeys::new("wrongsecret", 30, 24);
    let token = other.issue(token_user(Role::Admin), TokenLifetime::Access).unwrap();

    let result = keys().validate(&token);
    assert!(matches!(result, Err(UseCaseError::Unauthenticated(_))));
}

#[test]
fn test_malformed_user_id_is_rejected() {
    let mut user = token_user(Role::Buyer);
    user.id = "not-a-uuid".to_string();
    let claims = Claims { user, iat: 0, exp: 1 };

    assert!(matches!(
        AuthUser::from_claims(claims),
        Err(UseCaseError::Unauthenticated(_))
    ));
}

#[test]
fn test_role_guards() {
    let target = Uuid::new_v4();
    let buyer = AuthUser {
        user_id: Uuid::new_v4(),
        email: "b@example.com".to_string(),
        role: Role::Buyer,
        username: "b".to_string(),
    };
    let admin = AuthUser {
        role: Role::Admin,
        ..buyer.clone()
    };
    let guest = AuthUser {
        role: Role::Guest,
        ..buyer.clone()
    };

    assert!(matches!(buyer.require_admin(), Err(UseCaseError::Forbidden(_))));
    assert!(admin.require_admin().is_ok());
    assert!(buyer.require_buyer().is_ok());
    assert!(admin.require_buyer().is_ok());
    assert!(matches!(guest.require_buyer(), Err(UseCaseError::Forbidden(_))));
    assert!(buyer.require_self_or_admin(buyer.user_id).is_ok());
    assert!(matches!(
        buyer.require_self_or_admin(target),
        Err(UseCaseError::Forbidden(_))
    ));
    assert!(admin.require_self_or_admin(target).is_ok());
}

#[tokio::test]
async fn test_extractor_accepts_bearer_token() {
    let keys = keys();
    let token = keys.issue(token_user(Role::Admin), TokenLifetime::Access).unwrap();
    let mut parts = parts_with(Some(&format!("Bearer {token}")), Some(keys));

    let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.role, Role::Admin);
    assert_eq!(user.username, "tester");
}

#[tokio::test]
async fn test_extractor_rejects_missing_or_non_bearer_header() {
    for header in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer not.a.jwt")] {
        let mut parts = parts_with(header, Some(keys()));
        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(
            matches!(result, Err(UseCaseError::Unauthenticated(_))),
            "{header:?}"
        );
    }
}

#[tokio::test]
async fn test_optional_extractor_falls_back_to_guest() {
    let mut parts = parts_with(None, Some(keys()));
    let user = OptionalAuthUser::from_request_parts(&mut parts, &()).await.unwrap();

    assert!(!user.is_authenticated());
    assert_eq!(user.role(), Role::Guest);
}
