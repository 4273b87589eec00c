use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, pg::Pg, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        errors::map_constraint_error, postgres_connection::PgPoolSquad, schema::payments,
    },
};
use domain::{
    entities::payments::{
        GatewayPaymentUpdateEntity, InsertPaymentEntity, PaymentEntity, PaymentRow,
        UpdatePaymentEntity,
    },
    repositories::payments::PaymentRepository,
    value_objects::{pagination::Pagination, payments::PaymentsFilter},
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn filtered(filter: &PaymentsFilter) -> payments::BoxedQuery<'static, Pg> {
        let mut query = payments::table.into_boxed();

        if let Some(status) = filter.status.clone() {
            query = query.filter(payments::status.eq(status));
        }

        if let Some(user_id) = filter.user_id {
            query = query.filter(payments::user_id.eq(user_id));
        }

        query
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn create(&self, payment: InsertPaymentEntity) -> Result<PaymentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = insert_into(payments::table)
            .values(&payment)
            .returning(PaymentRow::as_returning())
            .get_result::<PaymentRow>(&mut conn)
            .map_err(map_constraint_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = payments::table
            .find(payment_id)
            .select(PaymentRow::as_select())
            .first::<PaymentRow>(&mut conn)
            .optional()?;

        Ok(row.map(PaymentEntity::from))
    }

    async fn list(
        &self,
        filter: PaymentsFilter,
        pagination: Pagination,
    ) -> Result<(Vec<PaymentEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::filtered(&filter)
            .count()
            .get_result::<i64>(&mut conn)?;

        let rows = Self::filtered(&filter)
            .order(payments::created_at.desc())
            .offset(pagination.offset())
            .limit(pagination.limit)
            .select(PaymentRow::as_select())
            .load::<PaymentRow>(&mut conn)?;

        Ok((rows.into_iter().map(PaymentEntity::from).collect(), total))
    }

    async fn update(
        &self,
        payment_id: Uuid,
        changes: UpdatePaymentEntity,
    ) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = update(payments::table.find(payment_id))
            .set(&changes)
            .returning(PaymentRow::as_returning())
            .get_result::<PaymentRow>(&mut conn)
            .optional()?;

        Ok(row.map(PaymentEntity::from))
    }

    async fn apply_gateway_update(
        &self,
        preference_id: &str,
        changes: GatewayPaymentUpdateEntity,
    ) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = update(payments::table.filter(payments::preference_id.eq(preference_id)))
            .set(&changes)
            .returning(PaymentRow::as_returning())
            .get_result::<PaymentRow>(&mut conn)
            .optional()?;

        Ok(row.map(PaymentEntity::from))
    }
}
