use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::payments::{
        GatewayPaymentUpdateEntity, InsertPaymentEntity, PaymentEntity, UpdatePaymentEntity,
    },
    value_objects::{pagination::Pagination, payments::PaymentsFilter},
};

#[automock]
#[async_trait]
pub trait PaymentRepository {
    async fn create(&self, payment: InsertPaymentEntity) -> Result<PaymentEntity>;
    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>>;
    async fn list(
        &self,
        filter: PaymentsFilter,
        pagination: Pagination,
    ) -> Result<(Vec<PaymentEntity>, i64)>;
    async fn update(
        &self,
        payment_id: Uuid,
        changes: UpdatePaymentEntity,
    ) -> Result<Option<PaymentEntity>>;
    /// Single conditional update keyed by preference id. `None` when no payment
    /// carries that preference.
    async fn apply_gateway_update(
        &self,
        preference_id: &str,
        changes: GatewayPaymentUpdateEntity,
    ) -> Result<Option<PaymentEntity>>;
}
