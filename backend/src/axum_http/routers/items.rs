use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::{categories::CategoryRepository, items::ItemRepository},
        value_objects::{
            acks::DeletedModel,
            items::{CreateItemModel, ItemModel, ListItemsQuery, UpdateItemModel},
            pagination::Paged,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{categories::CategoryPostgres, items::ItemPostgres},
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::ApiResponse,
    usecases::{UseCaseError, items::ItemUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let item_repository = ItemPostgres::new(Arc::clone(&db_pool));
    let category_repository = CategoryPostgres::new(Arc::clone(&db_pool));
    let item_usecase = ItemUseCase::new(Arc::new(item_repository), Arc::new(category_repository));

    Router::new()
        .route("/", get(list).post(create))
        .route("/categories", get(category_names))
        .route("/types", get(type_names))
        .route("/:item_id", get(get_item).patch(update).delete(delete_item))
        .with_state(Arc::new(item_usecase))
}

pub async fn create<I, C>(
    State(item_usecase): State<Arc<ItemUseCase<I, C>>>,
    auth: AuthUser,
    WithRejection(Json(model), _): WithRejection<Json<CreateItemModel>, UseCaseError>,
) -> Result<ApiResponse<ItemModel>, UseCaseError>
where
    I: ItemRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::created(
        item_usecase.create(auth.user_id, model).await?,
    ))
}

pub async fn list<I, C>(
    State(item_usecase): State<Arc<ItemUseCase<I, C>>>,
    WithRejection(Query(query), _): WithRejection<Query<ListItemsQuery>, UseCaseError>,
) -> Result<ApiResponse<Paged<ItemModel>>, UseCaseError>
where
    I: ItemRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    Ok(ApiResponse::ok(item_usecase.list(query).await?))
}

pub async fn category_names<I, C>(
    State(item_usecase): State<Arc<ItemUseCase<I, C>>>,
) -> Result<ApiResponse<Vec<String>>, UseCaseError>
where
    I: ItemRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    Ok(ApiResponse::ok(item_usecase.category_names().await?))
}

pub async fn type_names<I, C>(
    State(item_usecase): State<Arc<ItemUseCase<I, C>>>,
) -> Result<ApiResponse<Vec<String>>, UseCaseError>
where
    I: ItemRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    Ok(ApiResponse::ok(item_usecase.type_names().await?))
}

pub async fn get_item<I, C>(
    State(item_usecase): State<Arc<ItemUseCase<I, C>>>,
    WithRejection(Path(item_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<ItemModel>, UseCaseError>
where
    I: ItemRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    Ok(ApiResponse::ok(item_usecase.get(item_id).await?))
}

pub async fn update<I, C>(
    State(item_usecase): State<Arc<ItemUseCase<I, C>>>,
    auth: AuthUser,
    WithRejection(Path(item_id), _): WithRejection<Path<Uuid>, UseCaseError>,
    WithRejection(Json(model), _): WithRejection<Json<UpdateItemModel>, UseCaseError>,
) -> Result<ApiResponse<ItemModel>, UseCaseError>
where
    I: ItemRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(
        item_usecase.update(item_id, auth.user_id, model).await?,
    ))
}

pub async fn delete_item<I, C>(
    State(item_usecase): State<Arc<ItemUseCase<I, C>>>,
    auth: AuthUser,
    WithRejection(Path(item_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<DeletedModel>, UseCaseError>
where
    I: ItemRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(item_usecase.delete(item_id).await?))
}
