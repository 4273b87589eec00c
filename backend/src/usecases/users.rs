use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    entities::users::{InsertUserEntity, UpdateUserEntity},
    repositories::users::UserRepository,
    value_objects::{
        acks::DeletedModel,
        enums::roles::Role,
        pagination::{DEFAULT_LIMIT, Paged, Pagination},
        users::{
            ChangePasswordModel, ListUsersQuery, LoginModel, LoginResultModel,
            MIN_PASSWORD_LENGTH, RegisterUserModel, UpdateUserModel, UserModel, UsersFilter,
            VerifyTokenModel, VerifyTokenQuery, normalize_email, normalize_username,
        },
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{UseCaseError, UseCaseResult};
use crate::auth::{
    AuthUser, JwtKeys, TokenLifetime, TokenUser,
    password::{hash_password, verify_password},
};

const SELF_REGISTRATION_ACTOR: &str = "self";

pub struct UserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    jwt_keys: Arc<JwtKeys>,
}

impl<U> UserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, jwt_keys: Arc<JwtKeys>) -> Self {
        Self { user_repo, jwt_keys }
    }

    /// Only an authenticated admin may register another admin.
    pub async fn register(
        &self,
        actor: Option<&AuthUser>,
        model: RegisterUserModel,
    ) -> UseCaseResult<UserModel> {
        let username = normalize_username(&model.username)
            .ok_or_else(|| UseCaseError::Validation("username is required".to_string()))?;
        let email = normalize_email(&model.email)
            .ok_or_else(|| UseCaseError::Validation("email is invalid".to_string()))?;
        ensure_password_length(&model.password)?;

        let role = match model.role.as_deref().map(str::trim) {
            None | Some("") => Role::Buyer,
            Some(raw) => match Role::from_str(&raw.to_lowercase()) {
                Some(Role::Buyer) => Role::Buyer,
                Some(Role::Admin) => {
                    if !actor.is_some_and(|actor| actor.role.is_admin()) {
                        return Err(UseCaseError::Forbidden(
                            "only an admin can register an admin".to_string(),
                        ));
                    }
                    Role::Admin
                }
                _ => {
                    return Err(UseCaseError::Validation(
                        "role must be buyer or admin".to_string(),
                    ));
                }
            },
        };

        if self
            .user_repo
            .exists_by_email_or_username(&email, &username, None)
            .await?
        {
            return Err(UseCaseError::Conflict(
                "email or username already registered".to_string(),
            ));
        }

        let password_hash = hash_password(&model.password)?;
        let created_by = actor
            .map(|actor| actor.user_id.to_string())
            .unwrap_or_else(|| SELF_REGISTRATION_ACTOR.to_string());

        let user = self
            .user_repo
            .create(InsertUserEntity {
                username,
                email,
                password_hash,
                role: role.to_string(),
                created_by,
            })
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to create user");
                UseCaseError::from_write(err, "email or username already registered")
            })?;

        info!(user_id = %user.id, %role, "users: user registered");

        Ok(user.into())
    }

    pub async fn login(&self, model: LoginModel) -> UseCaseResult<LoginResultModel> {
        let email = model.email.trim().to_lowercase();

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("user not found".to_string()))?;

        if !verify_password(&model.password, &user.password_hash) {
            warn!(user_id = %user.id, "users: login with wrong password");
            return Err(UseCaseError::Unauthenticated(
                "invalid credentials".to_string(),
            ));
        }

        let user = UserModel::from(user);
        let access_token = self
            .jwt_keys
            .issue(TokenUser::from(&user), TokenLifetime::Access)?;

        info!(user_id = %user.id, "users: login succeeded");

        Ok(LoginResultModel { user, access_token })
    }

    /// Confirms the token's subject still exists; with `refresh` a longer-lived
    /// token is issued.
    pub async fn verify_token(
        &self,
        auth_user: &AuthUser,
        query: VerifyTokenQuery,
    ) -> UseCaseResult<VerifyTokenModel> {
        let user: UserModel = self
            .user_repo
            .find_by_id(auth_user.user_id)
            .await?
            .ok_or_else(|| UseCaseError::Unauthenticated("user no longer exists".to_string()))?
            .into();

        let token = if query.refresh.unwrap_or(false) {
            Some(
                self.jwt_keys
                    .issue(TokenUser::from(&user), TokenLifetime::Refresh)?,
            )
        } else {
            None
        };

        Ok(VerifyTokenModel {
            valid: true,
            user,
            token,
        })
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        model: ChangePasswordModel,
    ) -> UseCaseResult<()> {
        ensure_password_length(&model.new_password)?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("user not found".to_string()))?;

        if !verify_password(&model.old_password, &user.password_hash) {
            return Err(UseCaseError::Validation(
                "old password is incorrect".to_string(),
            ));
        }

        let password_hash = hash_password(&model.new_password)?;

        if !self.user_repo.update_password(user_id, password_hash).await? {
            return Err(UseCaseError::NotFound("user not found".to_string()));
        }

        info!(%user_id, "users: password changed");

        Ok(())
    }

    pub async fn list(&self, query: ListUsersQuery) -> UseCaseResult<Paged<UserModel>> {
        let pagination = Pagination::new(query.page, query.limit, DEFAULT_LIMIT);
        let filter = UsersFilter {
            q: query
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
        };

        let (users, total) = self.user_repo.list(filter, pagination).await?;

        Ok(Paged::new(users, total, pagination).map(UserModel::from))
    }

    pub async fn get(&self, user_id: Uuid) -> UseCaseResult<UserModel> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(UserModel::from)
            .ok_or_else(|| UseCaseError::NotFound("user not found".to_string()))
    }

    pub async fn update(
        &self,
        actor: &AuthUser,
        user_id: Uuid,
        model: UpdateUserModel,
    ) -> UseCaseResult<UserModel> {
        actor.require_self_or_admin(user_id)?;

        let mut changes = UpdateUserEntity::default();

        if let Some(username) = model.username.as_deref() {
            changes.username = Some(
                normalize_username(username)
                    .ok_or_else(|| UseCaseError::Validation("username is required".to_string()))?,
            );
        }

        if let Some(email) = model.email.as_deref() {
            changes.email = Some(
                normalize_email(email)
                    .ok_or_else(|| UseCaseError::Validation("email is invalid".to_string()))?,
            );
        }

        if let Some(role) = model.role.as_deref() {
            actor.require_admin()?;
            let role = Role::from_str(&role.trim().to_lowercase())
                .ok_or_else(|| UseCaseError::Validation(format!("unknown role: {role}")))?;
            changes.role = Some(role.to_string());
        }

        if changes.username.is_none() && changes.email.is_none() && changes.role.is_none() {
            return Err(UseCaseError::Validation("nothing to update".to_string()));
        }

        if changes.username.is_some() || changes.email.is_some() {
            let taken = self
                .user_repo
                .exists_by_email_or_username(
                    changes.email.as_deref().unwrap_or_default(),
                    changes.username.as_deref().unwrap_or_default(),
                    Some(user_id),
                )
                .await?;
            if taken {
                return Err(UseCaseError::Conflict(
                    "email or username already registered".to_string(),
                ));
            }
        }

        changes.updated_by = Some(actor.user_id.to_string());
        changes.updated_at = Some(Utc::now());

        let user = self
            .user_repo
            .update(user_id, changes)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to update user");
                UseCaseError::from_write(err, "email or username already registered")
            })?
            .ok_or_else(|| UseCaseError::NotFound("user not found".to_string()))?;

        info!(%user_id, updated_by = %actor.user_id, "users: user updated");

        Ok(user.into())
    }

    pub async fn delete(&self, user_id: Uuid) -> UseCaseResult<DeletedModel> {
        let deleted = self.user_repo.delete(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "users: failed to delete user");
            UseCaseError::from_write(err, "user is still referenced")
        })?;

        if !deleted {
            return Err(UseCaseError::NotFound("user not found".to_string()));
        }

        info!(%user_id, "users: user deleted");

        Ok(DeletedModel { deleted })
    }
}

fn ensure_password_length(password: &str) -> UseCaseResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UseCaseError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crates::domain::{entities::users::UserEntity, repositories::users::MockUserRepository};

    use super::*;

    fn keys() -> Arc<JwtKeys> {
        Arc::new(JwtKeys::new("test-secret", 30, 24))
    }

    fn entity(id: Uuid, password: &str, role: Role) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: hash_password(password).unwrap(),
            role: role.to_string(),
            created_by: "self".to_string(),
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn actor(user_id: Uuid, role: Role) -> AuthUser {
        AuthUser {
            user_id,
            email: "actor@example.com".to_string(),
            role,
            username: "actor".to_string(),
        }
    }

    fn register_model(role: Option<&str>) -> RegisterUserModel {
        RegisterUserModel {
            username: "  Ana ".to_string(),
            email: " Ana@Example.com ".to_string(),
            password: "supersecret".to_string(),
            role: role.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn register_normalizes_and_hashes() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email_or_username()
            .withf(|email, username, exclude| {
                email == "ana@example.com" && username == "ana" && exclude.is_none()
            })
            .returning(|_, _, _| Ok(false));
        repo.expect_create()
            .withf(|user| {
                user.username == "ana"
                    && user.role == "buyer"
                    && user.created_by == "self"
                    && verify_password("supersecret", &user.password_hash)
            })
            .times(1)
            .returning(|user| {
                let now = Utc::now();
                Ok(UserEntity {
                    id: Uuid::new_v4(),
                    username: user.username,
                    email: user.email,
                    password_hash: user.password_hash,
                    role: user.role,
                    created_by: user.created_by,
                    updated_by: None,
                    created_at: now,
                    updated_at: now,
                })
            });

        let user = UserUseCase::new(Arc::new(repo), keys())
            .register(None, register_model(None))
            .await
            .unwrap();

        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.role, Role::Buyer);
    }

    #[tokio::test]
    async fn register_rejects_duplicates_with_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email_or_username()
            .returning(|_, _, _| Ok(true));

        let result = UserUseCase::new(Arc::new(repo), keys())
            .register(None, register_model(None))
            .await;

        assert!(matches!(result, Err(UseCaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn register_validates_input_before_touching_storage() {
        let usecase = UserUseCase::new(Arc::new(MockUserRepository::new()), keys());

        let mut short = register_model(None);
        short.password = "short".to_string();
        assert!(matches!(
            usecase.register(None, short).await,
            Err(UseCaseError::Validation(_))
        ));

        let mut bad_email = register_model(None);
        bad_email.email = "not-an-email".to_string();
        assert!(matches!(
            usecase.register(None, bad_email).await,
            Err(UseCaseError::Validation(_))
        ));

        assert!(matches!(
            usecase.register(None, register_model(Some("guest"))).await,
            Err(UseCaseError::Validation(_))
        ));

        assert!(matches!(
            usecase.register(None, register_model(Some("admin"))).await,
            Err(UseCaseError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn login_distinguishes_unknown_user_and_wrong_password() {
        let user_id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |email| {
                Ok((email == "ana@example.com").then(|| entity(user_id, "supersecret", Role::Buyer)))
            });

        let usecase = UserUseCase::new(Arc::new(repo), keys());

        let missing = usecase
            .login(LoginModel {
                email: "bob@example.com".to_string(),
                password: "supersecret".to_string(),
            })
            .await;
        assert!(matches!(missing, Err(UseCaseError::NotFound(_))));

        let wrong = usecase
            .login(LoginModel {
                email: "ana@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(UseCaseError::Unauthenticated(_))));

        let ok = usecase
            .login(LoginModel {
                email: " ANA@example.com".to_string(),
                password: "supersecret".to_string(),
            })
            .await
            .unwrap();
        let claims = keys().validate(&ok.access_token).unwrap();
        assert_eq!(claims.user.id, user_id.to_string());
    }

    #[tokio::test]
    async fn verify_token_refreshes_on_request() {
        let user_id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(entity(id, "supersecret", Role::Admin))));

        let usecase = UserUseCase::new(Arc::new(repo), keys());
        let auth = actor(user_id, Role::Admin);

        let plain = usecase
            .verify_token(&auth, VerifyTokenQuery::default())
            .await
            .unwrap();
        assert!(plain.valid);
        assert!(plain.token.is_none());

        let refreshed = usecase
            .verify_token(&auth, VerifyTokenQuery { refresh: Some(true) })
            .await
            .unwrap();
        assert!(refreshed.token.is_some());
    }

    #[tokio::test]
    async fn verify_token_for_deleted_user_is_unauthenticated() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = UserUseCase::new(Arc::new(repo), keys())
            .verify_token(&actor(Uuid::new_v4(), Role::Buyer), VerifyTokenQuery::default())
            .await;

        assert!(matches!(result, Err(UseCaseError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn change_password_requires_the_old_password() {
        let user_id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(entity(id, "supersecret", Role::Buyer))));
        repo.expect_update_password()
            .withf(|_, hash| verify_password("brand-new-pass", hash))
            .times(1)
            .returning(|_, _| Ok(true));

        let usecase = UserUseCase::new(Arc::new(repo), keys());

        let wrong = usecase
            .change_password(
                user_id,
                ChangePasswordModel {
                    old_password: "nope-nope".to_string(),
                    new_password: "brand-new-pass".to_string(),
                },
            )
            .await;
        assert!(matches!(wrong, Err(UseCaseError::Validation(_))));

        usecase
            .change_password(
                user_id,
                ChangePasswordModel {
                    old_password: "supersecret".to_string(),
                    new_password: "brand-new-pass".to_string(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn only_admin_changes_roles() {
        let user_id = Uuid::new_v4();
        let usecase = UserUseCase::new(Arc::new(MockUserRepository::new()), keys());

        let result = usecase
            .update(
                &actor(user_id, Role::Buyer),
                user_id,
                UpdateUserModel {
                    role: Some("admin".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(UseCaseError::Forbidden(_))));

        let other = usecase
            .update(
                &actor(Uuid::new_v4(), Role::Buyer),
                user_id,
                UpdateUserModel {
                    username: Some("eve".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(other, Err(UseCaseError::Forbidden(_))));

        let empty = usecase
            .update(&actor(user_id, Role::Buyer), user_id, UpdateUserModel::default())
            .await;
        assert!(matches!(empty, Err(UseCaseError::Validation(_))));
    }

    #[tokio::test]
    async fn admin_updates_role_and_records_actor() {
        let user_id = Uuid::new_v4();
        let admin_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .withf(move |id, changes| {
                *id == user_id
                    && changes.role.as_deref() == Some("admin")
                    && changes.updated_by == Some(admin_id.to_string())
            })
            .times(1)
            .returning(|id, _| Ok(Some(entity(id, "supersecret", Role::Admin))));

        let user = UserUseCase::new(Arc::new(repo), keys())
            .update(
                &actor(admin_id, Role::Admin),
                user_id,
                UpdateUserModel {
                    role: Some("Admin".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let result = UserUseCase::new(Arc::new(repo), keys())
            .delete(Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }
}
