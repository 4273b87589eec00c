use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::purchases::PurchaseRepository,
        value_objects::{
            pagination::Paged,
            purchases::{CreatePurchaseModel, MyPurchasesQuery, PurchaseModel},
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::purchases::PurchasePostgres,
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::ApiResponse,
    usecases::{UseCaseError, purchases::PurchaseUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let purchase_repository = PurchasePostgres::new(Arc::clone(&db_pool));
    let purchase_usecase = PurchaseUseCase::new(Arc::new(purchase_repository));

    Router::new()
        .route("/", post(create))
        .route("/mine", get(list_mine))
        .route("/mine/:purchase_id", get(get_mine))
        .route("/:purchase_id/cancel", post(cancel))
        .with_state(Arc::new(purchase_usecase))
}

pub async fn list_mine<T>(
    State(purchase_usecase): State<Arc<PurchaseUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<MyPurchasesQuery>, UseCaseError>,
) -> Result<ApiResponse<Paged<PurchaseModel>>, UseCaseError>
where
    T: PurchaseRepository + Send + Sync + 'static,
{
    auth.require_buyer()?;

    Ok(ApiResponse::ok(
        purchase_usecase.list_mine(auth.user_id, query).await?,
    ))
}

pub async fn get_mine<T>(
    State(purchase_usecase): State<Arc<PurchaseUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Path(purchase_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<PurchaseModel>, UseCaseError>
where
    T: PurchaseRepository + Send + Sync + 'static,
{
    auth.require_buyer()?;

    Ok(ApiResponse::ok(
        purchase_usecase.get_mine(auth.user_id, purchase_id).await?,
    ))
}

pub async fn create<T>(
    State(purchase_usecase): State<Arc<PurchaseUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Json(model), _): WithRejection<Json<CreatePurchaseModel>, UseCaseError>,
) -> Result<ApiResponse<PurchaseModel>, UseCaseError>
where
    T: PurchaseRepository + Send + Sync + 'static,
{
    auth.require_buyer()?;

    Ok(ApiResponse::created(
        purchase_usecase.create(auth.user_id, model).await?,
    ))
}

pub async fn cancel<T>(
    State(purchase_usecase): State<Arc<PurchaseUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Path(purchase_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<PurchaseModel>, UseCaseError>
where
    T: PurchaseRepository + Send + Sync + 'static,
{
    auth.require_buyer()?;

    Ok(ApiResponse::ok(
        purchase_usecase.cancel(auth.user_id, purchase_id).await?,
    ))
}
