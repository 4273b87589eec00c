use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::users::UserRepository,
        value_objects::{
            acks::DeletedModel,
            pagination::Paged,
            users::{
                ChangePasswordModel, ListUsersQuery, LoginModel, LoginResultModel,
                RegisterUserModel, UpdateUserModel, UserModel, VerifyTokenModel,
                VerifyTokenQuery,
            },
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::users::UserPostgres,
    },
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    auth::{AuthUser, JwtKeys, OptionalAuthUser},
    axum_http::error_responses::ApiResponse,
    usecases::{UseCaseError, users::UserUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>, jwt_keys: Arc<JwtKeys>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let user_usecase = UserUseCase::new(Arc::new(user_repository), jwt_keys);

    Router::new()
        .route("/", post(register).get(list))
        .route("/login", post(login))
        .route("/verify-token", get(verify_token))
        .route("/change-password", post(change_password))
        .route("/:user_id", get(get_user).patch(update).delete(delete_user))
        .with_state(Arc::new(user_usecase))
}

pub async fn register<T>(
    State(user_usecase): State<Arc<UserUseCase<T>>>,
    caller: OptionalAuthUser,
    WithRejection(Json(model), _): WithRejection<Json<RegisterUserModel>, UseCaseError>,
) -> Result<ApiResponse<UserModel>, UseCaseError>
where
    T: UserRepository + Send + Sync + 'static,
{
    let user = user_usecase.register(caller.0.as_ref(), model).await?;

    Ok(ApiResponse::created(user))
}

pub async fn login<T>(
    State(user_usecase): State<Arc<UserUseCase<T>>>,
    WithRejection(Json(model), _): WithRejection<Json<LoginModel>, UseCaseError>,
) -> Result<ApiResponse<LoginResultModel>, UseCaseError>
where
    T: UserRepository + Send + Sync + 'static,
{
    Ok(ApiResponse::ok(user_usecase.login(model).await?))
}

pub async fn verify_token<T>(
    State(user_usecase): State<Arc<UserUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<VerifyTokenQuery>, UseCaseError>,
) -> Result<ApiResponse<VerifyTokenModel>, UseCaseError>
where
    T: UserRepository + Send + Sync + 'static,
{
    Ok(ApiResponse::ok(user_usecase.verify_token(&auth, query).await?))
}

pub async fn change_password<T>(
    State(user_usecase): State<Arc<UserUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Json(model), _): WithRejection<Json<ChangePasswordModel>, UseCaseError>,
) -> Result<ApiResponse<Value>, UseCaseError>
where
    T: UserRepository + Send + Sync + 'static,
{
    user_usecase.change_password(auth.user_id, model).await?;

    Ok(ApiResponse::ok(json!({ "changed": true })))
}

pub async fn list<T>(
    State(user_usecase): State<Arc<UserUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<ListUsersQuery>, UseCaseError>,
) -> Result<ApiResponse<Paged<UserModel>>, UseCaseError>
where
    T: UserRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(user_usecase.list(query).await?))
}

pub async fn get_user<T>(
    State(user_usecase): State<Arc<UserUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<UserModel>, UseCaseError>
where
    T: UserRepository + Send + Sync + 'static,
{
    auth.require_self_or_admin(user_id)?;

    Ok(ApiResponse::ok(user_usecase.get(user_id).await?))
}

pub async fn update<T>(
    State(user_usecase): State<Arc<UserUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, UseCaseError>,
    WithRejection(Json(model), _): WithRejection<Json<UpdateUserModel>, UseCaseError>,
) -> Result<ApiResponse<UserModel>, UseCaseError>
where
    T: UserRepository + Send + Sync + 'static,
{
    Ok(ApiResponse::ok(
        user_usecase.update(&auth, user_id, model).await?,
    ))
}

pub async fn delete_user<T>(
    State(user_usecase): State<Arc<UserUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<DeletedModel>, UseCaseError>
where
    T: UserRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(user_usecase.delete(user_id).await?))
}
