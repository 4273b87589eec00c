use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::purchases::{InsertPurchaseEntity, PurchaseEntity},
    value_objects::{pagination::Pagination, purchases::PurchasesFilter},
};

#[automock]
#[async_trait]
pub trait PurchaseRepository {
    /// Atomic set-on-insert keyed by preference id. Returns true when a row was created.
    async fn insert_if_absent(&self, purchase: InsertPurchaseEntity) -> Result<bool>;
    async fn create(&self, purchase: InsertPurchaseEntity) -> Result<PurchaseEntity>;
    async fn list(
        &self,
        filter: PurchasesFilter,
        pagination: Pagination,
    ) -> Result<(Vec<PurchaseEntity>, i64)>;
    async fn find_for_user(&self, purchase_id: Uuid, user_id: Uuid) -> Result<Option<PurchaseEntity>>;
    /// Moves a pending purchase to failed. `None` when the purchase is not the
    /// caller's or is no longer pending.
    async fn cancel_pending(
        &self,
        purchase_id: Uuid,
        user_id: Uuid,
        note: String,
    ) -> Result<Option<PurchaseEntity>>;
}
