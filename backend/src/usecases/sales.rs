use std::sync::Arc;

use chrono::{DateTime, Utc};
use crates::domain::{
    repositories::sales::SaleRepository,
    value_objects::{
        enums::{order_payment_statuses::OrderPaymentStatus, sale_statuses::SaleStatus},
        pagination::{DEFAULT_LIMIT, Paged, Pagination},
        sales::{
            ADMIN_SALES_DEFAULT_LIMIT, ListSalesQuery, MetricsOverviewModel, MetricsPointModel,
            MetricsRange, MySalesQuery, SaleModel, SalesFilter, TimeSeriesQuery,
            UpdateSaleStatusModel, metrics_overview, metrics_time_series,
        },
    },
};
use tracing::{error, info};
use uuid::Uuid;

use super::{UseCaseError, UseCaseResult};

pub struct SaleUseCase<S>
where
    S: SaleRepository + Send + Sync + 'static,
{
    sale_repo: Arc<S>,
}

impl<S> SaleUseCase<S>
where
    S: SaleRepository + Send + Sync + 'static,
{
    pub fn new(sale_repo: Arc<S>) -> Self {
        Self { sale_repo }
    }

    pub async fn list_mine(
        &self,
        user_id: Uuid,
        query: MySalesQuery,
    ) -> UseCaseResult<Paged<SaleModel>> {
        let pagination = Pagination::new(query.page, query.limit, DEFAULT_LIMIT);
        let filter = SalesFilter {
            user_id: Some(user_id),
            ..Default::default()
        };

        let (sales, total) = self.sale_repo.list(filter, pagination).await?;

        Ok(Paged::new(sales, total, pagination).map(SaleModel::from))
    }

    pub async fn get_mine(&self, user_id: Uuid, sale_id: Uuid) -> UseCaseResult<SaleModel> {
        self.sale_repo
            .find_for_user(sale_id, user_id)
            .await?
            .map(SaleModel::from)
            .ok_or_else(|| UseCaseError::NotFound("sale not found".to_string()))
    }

    pub async fn list(&self, query: ListSalesQuery) -> UseCaseResult<Paged<SaleModel>> {
        ensure_range(query.from, query.to)?;

        let status = match non_blank(query.status) {
            Some(status) => Some(
                SaleStatus::from_str(&status)
                    .ok_or_else(|| UseCaseError::Validation(format!("unknown sale status: {status}")))?
                    .to_string(),
            ),
            None => None,
        };

        let payment_status = match non_blank(query.payment_status) {
            Some(status) => Some(
                OrderPaymentStatus::from_str(&status)
                    .ok_or_else(|| {
                        UseCaseError::Validation(format!("unknown payment status: {status}"))
                    })?
                    .to_string(),
            ),
            None => None,
        };

        let pagination = Pagination::new(query.page, query.limit, ADMIN_SALES_DEFAULT_LIMIT);
        let filter = SalesFilter {
            user_id: None,
            from: query.from,
            to: query.to,
            status,
            payment_status,
        };

        let (sales, total) = self.sale_repo.list(filter, pagination).await?;

        Ok(Paged::new(sales, total, pagination).map(SaleModel::from))
    }

    pub async fn get(&self, sale_id: Uuid) -> UseCaseResult<SaleModel> {
        self.sale_repo
            .find_by_id(sale_id)
            .await?
            .map(SaleModel::from)
            .ok_or_else(|| UseCaseError::NotFound("sale not found".to_string()))
    }

    pub async fn update_status(
        &self,
        sale_id: Uuid,
        model: UpdateSaleStatusModel,
    ) -> UseCaseResult<SaleModel> {
        let raw = model.status.trim().to_lowercase();
        let status = SaleStatus::from_str(&raw).ok_or_else(|| {
            UseCaseError::Validation(format!("unknown sale status: {}", model.status))
        })?;

        let sale = self
            .sale_repo
            .update_status(sale_id, status.to_string())
            .await
            .map_err(|err| {
                error!(%sale_id, db_error = ?err, "sales: failed to update status");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("sale not found".to_string()))?;

        info!(%sale_id, %status, "sales: status updated");

        Ok(sale.into())
    }

    pub async fn overview(&self, range: MetricsRange) -> UseCaseResult<MetricsOverviewModel> {
        ensure_range(range.from, range.to)?;

        let rows = self.sale_repo.metric_rows(range).await?;

        Ok(metrics_overview(&rows))
    }

    pub async fn time_series(&self, query: TimeSeriesQuery) -> UseCaseResult<Vec<MetricsPointModel>> {
        ensure_range(query.from, query.to)?;

        let range = MetricsRange {
            from: query.from,
            to: query.to,
        };
        let rows = self.sale_repo.metric_rows(range).await?;

        Ok(metrics_time_series(
            &rows,
            query.interval.unwrap_or_default(),
        ))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
}

fn ensure_range(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> UseCaseResult<()> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(UseCaseError::Validation(
            "`from` must not be after `to`".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use crates::domain::{
        entities::sales::{SaleEntity, SaleMetricRow},
        repositories::sales::MockSaleRepository,
        value_objects::enums::metrics_intervals::MetricsInterval,
    };

    use super::*;

    fn sale(id: Uuid, user_id: Uuid, status: &str) -> SaleEntity {
        let now = Utc::now();
        SaleEntity {
            id,
            preference_id: Some("pref-1".to_string()),
            payment_id: Some("555".to_string()),
            user_id,
            items: Vec::new(),
            subtotal: 2500.0,
            taxes: 0.0,
            total: 2500.0,
            currency: "CLP".to_string(),
            payer_email: None,
            status: status.to_string(),
            payment_status: "paid".to_string(),
            payment_provider: "mercadopago".to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn buyer_listing_is_scoped_to_the_caller() {
        let user_id = Uuid::new_v4();
        let mut repo = MockSaleRepository::new();
        repo.expect_list()
            .withf(move |filter, pagination| {
                filter.user_id == Some(user_id) && pagination.limit == DEFAULT_LIMIT
            })
            .returning(move |_, _| Ok((vec![sale(Uuid::new_v4(), user_id, "new")], 1)));

        let page = SaleUseCase::new(Arc::new(repo))
            .list_mine(user_id, MySalesQuery::default())
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn someone_elses_sale_is_not_found() {
        let mut repo = MockSaleRepository::new();
        repo.expect_find_for_user().returning(|_, _| Ok(None));

        let result = SaleUseCase::new(Arc::new(repo))
            .get_mine(Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn admin_listing_validates_filters_and_uses_default_limit() {
        let mut repo = MockSaleRepository::new();
        repo.expect_list()
            .withf(|filter, pagination| {
                filter.status.as_deref() == Some("completed")
                    && filter.payment_status.as_deref() == Some("paid")
                    && pagination.limit == ADMIN_SALES_DEFAULT_LIMIT
            })
            .times(1)
            .returning(|_, _| Ok((Vec::new(), 0)));

        let usecase = SaleUseCase::new(Arc::new(repo));

        usecase
            .list(ListSalesQuery {
                status: Some("Completed".to_string()),
                payment_status: Some("paid".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let unknown = usecase
            .list(ListSalesQuery {
                status: Some("shipped".to_string()),
                ..Default::default()
            })
            .await;
        assert!(matches!(unknown, Err(UseCaseError::Validation(_))));

        let inverted = usecase
            .list(ListSalesQuery {
                from: Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()),
                to: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
                ..Default::default()
            })
            .await;
        assert!(matches!(inverted, Err(UseCaseError::Validation(_))));
    }

    #[tokio::test]
    async fn update_status_accepts_only_known_statuses() {
        let sale_id = Uuid::new_v4();
        let mut repo = MockSaleRepository::new();
        repo.expect_update_status()
            .withf(|_, status| status == "processing")
            .times(1)
            .returning(|id, status| Ok(Some(sale(id, Uuid::new_v4(), &status))));

        let usecase = SaleUseCase::new(Arc::new(repo));

        let updated = usecase
            .update_status(
                sale_id,
                UpdateSaleStatusModel {
                    status: " Processing ".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, "processing");

        let invalid = usecase
            .update_status(
                sale_id,
                UpdateSaleStatusModel {
                    status: "lost".to_string(),
                },
            )
            .await;
        assert!(matches!(invalid, Err(UseCaseError::Validation(_))));
    }

    #[tokio::test]
    async fn time_series_defaults_to_daily_buckets() {
        let mut repo = MockSaleRepository::new();
        repo.expect_metric_rows().returning(|_| {
            Ok(vec![
                SaleMetricRow {
                    created_at: Utc.with_ymd_and_hms(2025, 3, 2, 10, 0, 0).unwrap(),
                    total: 50.0,
                    payment_status: "paid".to_string(),
                },
                SaleMetricRow {
                    created_at: Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
                    total: 20.0,
                    payment_status: "pending".to_string(),
                },
            ])
        });

        let usecase = SaleUseCase::new(Arc::new(repo));

        let daily = usecase
            .time_series(TimeSeriesQuery::default())
            .await
            .unwrap();
        assert_eq!(
            daily.iter().map(|p| p.bucket.as_str()).collect::<Vec<_>>(),
            vec!["2025-03-01", "2025-03-02"]
        );

        let monthly = usecase
            .time_series(TimeSeriesQuery {
                interval: Some(MetricsInterval::Month),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].revenue, 70.0);
        assert_eq!(monthly[0].count, 2);

        let overview = usecase.overview(MetricsRange::default()).await.unwrap();
        assert_eq!(overview.orders_count, 2);
        assert_eq!(overview.paid_orders, 1);
        assert_eq!(overview.avg_order, 35.0);
    }
}
