use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::item_types::ItemTypeRepository,
        value_objects::{
            acks::DeletedModel,
            item_types::{CreateItemTypeModel, ItemTypeModel, UpdateItemTypeModel},
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::item_types::ItemTypePostgres,
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::ApiResponse,
    usecases::{UseCaseError, item_types::ItemTypeUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let item_type_repository = ItemTypePostgres::new(Arc::clone(&db_pool));
    let item_type_usecase = ItemTypeUseCase::new(Arc::new(item_type_repository));

    Router::new()
        .route("/", get(list).post(create))
        .route("/:type_id", get(get_type).patch(update).delete(delete_type))
        .with_state(Arc::new(item_type_usecase))
}

pub async fn create<T>(
    State(item_type_usecase): State<Arc<ItemTypeUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Json(model), _): WithRejection<Json<CreateItemTypeModel>, UseCaseError>,
) -> Result<ApiResponse<ItemTypeModel>, UseCaseError>
where
    T: ItemTypeRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::created(
        item_type_usecase.create(auth.user_id, model).await?,
    ))
}

pub async fn list<T>(
    State(item_type_usecase): State<Arc<ItemTypeUseCase<T>>>,
) -> Result<ApiResponse<Vec<ItemTypeModel>>, UseCaseError>
where
    T: ItemTypeRepository + Send + Sync + 'static,
{
    Ok(ApiResponse::ok(item_type_usecase.list().await?))
}

pub async fn get_type<T>(
    State(item_type_usecase): State<Arc<ItemTypeUseCase<T>>>,
    WithRejection(Path(type_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<ItemTypeModel>, UseCaseError>
where
    T: ItemTypeRepository + Send + Sync + 'static,
{
    Ok(ApiResponse::ok(item_type_usecase.get(type_id).await?))
}

pub async fn update<T>(
    State(item_type_usecase): State<Arc<ItemTypeUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Path(type_id), _): WithRejection<Path<Uuid>, UseCaseError>,
    WithRejection(Json(model), _): WithRejection<Json<UpdateItemTypeModel>, UseCaseError>,
) -> Result<ApiResponse<ItemTypeModel>, UseCaseError>
where
    T: ItemTypeRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(
        item_type_usecase
            .update(type_id, auth.user_id, model)
            .await?,
    ))
}

pub async fn delete_type<T>(
    State(item_type_usecase): State<Arc<ItemTypeUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Path(type_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<DeletedModel>, UseCaseError>
where
    T: ItemTypeRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(item_type_usecase.delete(type_id).await?))
}
