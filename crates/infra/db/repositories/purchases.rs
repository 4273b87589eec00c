use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, pg::Pg, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::purchases},
};
use domain::{
    entities::purchases::{InsertPurchaseEntity, PurchaseEntity, PurchaseRow},
    repositories::purchases::PurchaseRepository,
    value_objects::{
        enums::order_payment_statuses::OrderPaymentStatus, pagination::Pagination,
        purchases::PurchasesFilter,
    },
};

pub struct PurchasePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PurchasePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn filtered(filter: &PurchasesFilter) -> purchases::BoxedQuery<'static, Pg> {
        let mut query = purchases::table.into_boxed();

        if let Some(user_id) = filter.user_id {
            query = query.filter(purchases::user_id.eq(user_id));
        }
        if let Some(payment_status) = filter.payment_status.clone() {
            query = query.filter(purchases::payment_status.eq(payment_status));
        }

        query
    }
}

#[async_trait]
impl PurchaseRepository for PurchasePostgres {
    async fn insert_if_absent(&self, purchase: InsertPurchaseEntity) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(purchases::table)
            .values(&purchase)
            .on_conflict(purchases::preference_id)
            .do_nothing()
            .execute(&mut conn)?;

        Ok(inserted == 1)
    }

    async fn create(&self, purchase: InsertPurchaseEntity) -> Result<PurchaseEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = insert_into(purchases::table)
            .values(&purchase)
            .returning(PurchaseRow::as_returning())
            .get_result::<PurchaseRow>(&mut conn)?;

        Ok(row.into())
    }

    async fn list(
        &self,
        filter: PurchasesFilter,
        pagination: Pagination,
    ) -> Result<(Vec<PurchaseEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::filtered(&filter)
            .count()
            .get_result::<i64>(&mut conn)?;

        let rows = Self::filtered(&filter)
            .order(purchases::created_at.desc())
            .offset(pagination.offset())
            .limit(pagination.limit)
            .select(PurchaseRow::as_select())
            .load::<PurchaseRow>(&mut conn)?;

        Ok((rows.into_iter().map(PurchaseEntity::from).collect(), total))
    }

    async fn find_for_user(
        &self,
        purchase_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<PurchaseEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = purchases::table
            .filter(purchases::id.eq(purchase_id))
            .filter(purchases::user_id.eq(user_id))
            .select(PurchaseRow::as_select())
            .first::<PurchaseRow>(&mut conn)
            .optional()?;

        Ok(row.map(PurchaseEntity::from))
    }

    async fn cancel_pending(
        &self,
        purchase_id: Uuid,
        user_id: Uuid,
        note: String,
    ) -> Result<Option<PurchaseEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = update(
            purchases::table
                .filter(purchases::id.eq(purchase_id))
                .filter(purchases::user_id.eq(user_id))
                .filter(purchases::payment_status.eq(OrderPaymentStatus::Pending.as_str())),
        )
        .set((
            purchases::payment_status.eq(OrderPaymentStatus::Failed.as_str()),
            purchases::notes.eq(Some(note)),
            purchases::updated_at.eq(Utc::now()),
        ))
        .returning(PurchaseRow::as_returning())
        .get_result::<PurchaseRow>(&mut conn)
        .optional()?;

        Ok(row.map(PurchaseEntity::from))
    }
}
