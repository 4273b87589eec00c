use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::sales::SaleRepository,
        value_objects::{
            pagination::Paged,
            sales::{
                ListSalesQuery, MetricsOverviewModel, MetricsPointModel, MetricsRange,
                MySalesQuery, SaleModel, TimeSeriesQuery, UpdateSaleStatusModel,
            },
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::sales::SalePostgres,
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::ApiResponse,
    usecases::{UseCaseError, sales::SaleUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let sale_repository = SalePostgres::new(Arc::clone(&db_pool));
    let sale_usecase = SaleUseCase::new(Arc::new(sale_repository));

    Router::new()
        .route("/mine", get(list_mine))
        .route("/mine/:sale_id", get(get_mine))
        .route("/metrics/overview", get(metrics_overview))
        .route("/metrics/timeseries", get(metrics_time_series))
        .route("/", get(list))
        .route("/:sale_id", get(get_sale))
        .route("/:sale_id/status", patch(update_status))
        .with_state(Arc::new(sale_usecase))
}

pub async fn list_mine<T>(
    State(sale_usecase): State<Arc<SaleUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<MySalesQuery>, UseCaseError>,
) -> Result<ApiResponse<Paged<SaleModel>>, UseCaseError>
where
    T: SaleRepository + Send + Sync + 'static,
{
    auth.require_buyer()?;

    Ok(ApiResponse::ok(
        sale_usecase.list_mine(auth.user_id, query).await?,
    ))
}

pub async fn get_mine<T>(
    State(sale_usecase): State<Arc<SaleUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Path(sale_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<SaleModel>, UseCaseError>
where
    T: SaleRepository + Send + Sync + 'static,
{
    auth.require_buyer()?;

    Ok(ApiResponse::ok(
        sale_usecase.get_mine(auth.user_id, sale_id).await?,
    ))
}

pub async fn list<T>(
    State(sale_usecase): State<Arc<SaleUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<ListSalesQuery>, UseCaseError>,
) -> Result<ApiResponse<Paged<SaleModel>>, UseCaseError>
where
    T: SaleRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(sale_usecase.list(query).await?))
}

pub async fn get_sale<T>(
    State(sale_usecase): State<Arc<SaleUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Path(sale_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<SaleModel>, UseCaseError>
where
    T: SaleRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(sale_usecase.get(sale_id).await?))
}

pub async fn update_status<T>(
    State(sale_usecase): State<Arc<SaleUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Path(sale_id), _): WithRejection<Path<Uuid>, UseCaseError>,
    WithRejection(Json(model), _): WithRejection<Json<UpdateSaleStatusModel>, UseCaseError>,
) -> Result<ApiResponse<SaleModel>, UseCaseError>
where
    T: SaleRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(
        sale_usecase.update_status(sale_id, model).await?,
    ))
}

pub async fn metrics_overview<T>(
    State(sale_usecase): State<Arc<SaleUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Query(range), _): WithRejection<Query<MetricsRange>, UseCaseError>,
) -> Result<ApiResponse<MetricsOverviewModel>, UseCaseError>
where
    T: SaleRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(sale_usecase.overview(range).await?))
}

pub async fn metrics_time_series<T>(
    State(sale_usecase): State<Arc<SaleUseCase<T>>>,
    auth: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<TimeSeriesQuery>, UseCaseError>,
) -> Result<ApiResponse<Vec<MetricsPointModel>>, UseCaseError>
where
    T: SaleRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(sale_usecase.time_series(query).await?))
}
