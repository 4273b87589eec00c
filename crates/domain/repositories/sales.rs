use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::sales::{InsertSaleEntity, SaleEntity, SaleMetricRow},
    value_objects::{
        pagination::Pagination,
        sales::{MetricsRange, SalesFilter},
    },
};

#[automock]
#[async_trait]
pub trait SaleRepository {
    /// Atomic set-on-insert keyed by preference id. Returns true when a row was created.
    async fn insert_if_absent(&self, sale: InsertSaleEntity) -> Result<bool>;
    async fn list(&self, filter: SalesFilter, pagination: Pagination) -> Result<(Vec<SaleEntity>, i64)>;
    async fn find_by_id(&self, sale_id: Uuid) -> Result<Option<SaleEntity>>;
    async fn find_for_user(&self, sale_id: Uuid, user_id: Uuid) -> Result<Option<SaleEntity>>;
    async fn update_status(&self, sale_id: Uuid, status: String) -> Result<Option<SaleEntity>>;
    async fn metric_rows(&self, range: MetricsRange) -> Result<Vec<SaleMetricRow>>;
}
