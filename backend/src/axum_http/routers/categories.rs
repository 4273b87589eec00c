use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::{categories::CategoryRepository, item_types::ItemTypeRepository},
        value_objects::{
            acks::DeletedModel,
            categories::{
                CategoriesQuery, CategoryModel, CreateCategoryModel, UpdateCategoryModel,
            },
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{categories::CategoryPostgres, item_types::ItemTypePostgres},
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::ApiResponse,
    usecases::{UseCaseError, categories::CategoryUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let category_repository = CategoryPostgres::new(Arc::clone(&db_pool));
    let item_type_repository = ItemTypePostgres::new(Arc::clone(&db_pool));
    let category_usecase = CategoryUseCase::new(
        Arc::new(category_repository),
        Arc::new(item_type_repository),
    );

    Router::new()
        .route("/", get(list).post(create))
        .route("/by-type", get(names_by_type))
        .route(
            "/:category_id",
            get(get_category).patch(update).delete(delete_category),
        )
        .with_state(Arc::new(category_usecase))
}

pub async fn create<C, T>(
    State(category_usecase): State<Arc<CategoryUseCase<C, T>>>,
    auth: AuthUser,
    WithRejection(Json(model), _): WithRejection<Json<CreateCategoryModel>, UseCaseError>,
) -> Result<ApiResponse<CategoryModel>, UseCaseError>
where
    C: CategoryRepository + Send + Sync + 'static,
    T: ItemTypeRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::created(
        category_usecase.create(auth.user_id, model).await?,
    ))
}

pub async fn list<C, T>(
    State(category_usecase): State<Arc<CategoryUseCase<C, T>>>,
    WithRejection(Query(query), _): WithRejection<Query<CategoriesQuery>, UseCaseError>,
) -> Result<ApiResponse<Vec<CategoryModel>>, UseCaseError>
where
    C: CategoryRepository + Send + Sync + 'static,
    T: ItemTypeRepository + Send + Sync + 'static,
{
    Ok(ApiResponse::ok(category_usecase.list(query).await?))
}

pub async fn names_by_type<C, T>(
    State(category_usecase): State<Arc<CategoryUseCase<C, T>>>,
    WithRejection(Query(query), _): WithRejection<Query<CategoriesQuery>, UseCaseError>,
) -> Result<ApiResponse<Vec<String>>, UseCaseError>
where
    C: CategoryRepository + Send + Sync + 'static,
    T: ItemTypeRepository + Send + Sync + 'static,
{
    Ok(ApiResponse::ok(category_usecase.names_by_type(query).await?))
}

pub async fn get_category<C, T>(
    State(category_usecase): State<Arc<CategoryUseCase<C, T>>>,
    WithRejection(Path(category_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<CategoryModel>, UseCaseError>
where
    C: CategoryRepository + Send + Sync + 'static,
    T: ItemTypeRepository + Send + Sync + 'static,
{
    Ok(ApiResponse::ok(category_usecase.get(category_id).await?))
}

pub async fn update<C, T>(
    State(category_usecase): State<Arc<CategoryUseCase<C, T>>>,
    auth: AuthUser,
    WithRejection(Path(category_id), _): WithRejection<Path<Uuid>, UseCaseError>,
    WithRejection(Json(model), _): WithRejection<Json<UpdateCategoryModel>, UseCaseError>,
) -> Result<ApiResponse<CategoryModel>, UseCaseError>
where
    C: CategoryRepository + Send + Sync + 'static,
    T: ItemTypeRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(
        category_usecase
            .update(category_id, auth.user_id, model)
            .await?,
    ))
}

pub async fn delete_category<C, T>(
    State(category_usecase): State<Arc<CategoryUseCase<C, T>>>,
    auth: AuthUser,
    WithRejection(Path(category_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<DeletedModel>, UseCaseError>
where
    C: CategoryRepository + Send + Sync + 'static,
    T: ItemTypeRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(category_usecase.delete(category_id).await?))
}
