use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, pg::Pg, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::sales},
};
use domain::{
    entities::sales::{InsertSaleEntity, SaleEntity, SaleMetricRow, SaleRow},
    repositories::sales::SaleRepository,
    value_objects::{
        pagination::Pagination,
        sales::{MetricsRange, SalesFilter},
    },
};

pub struct SalePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SalePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn filtered(filter: &SalesFilter) -> sales::BoxedQuery<'static, Pg> {
        let mut query = sales::table.into_boxed();

        if let Some(user_id) = filter.user_id {
            query = query.filter(sales::user_id.eq(user_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(sales::created_at.ge(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(sales::created_at.le(to));
        }
        if let Some(status) = filter.status.clone() {
            query = query.filter(sales::status.eq(status));
        }
        if let Some(payment_status) = filter.payment_status.clone() {
            query = query.filter(sales::payment_status.eq(payment_status));
        }

        query
    }
}

#[async_trait]
impl SaleRepository for SalePostgres {
    async fn insert_if_absent(&self, sale: InsertSaleEntity) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(sales::table)
            .values(&sale)
            .on_conflict(sales::preference_id)
            .do_nothing()
            .execute(&mut conn)?;

        Ok(inserted == 1)
    }

    async fn list(
        &self,
        filter: SalesFilter,
        pagination: Pagination,
    ) -> Result<(Vec<SaleEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::filtered(&filter)
            .count()
            .get_result::<i64>(&mut conn)?;

        let rows = Self::filtered(&filter)
            .order(sales::created_at.desc())
            .offset(pagination.offset())
            .limit(pagination.limit)
            .select(SaleRow::as_select())
            .load::<SaleRow>(&mut conn)?;

        Ok((rows.into_iter().map(SaleEntity::from).collect(), total))
    }

    async fn find_by_id(&self, sale_id: Uuid) -> Result<Option<SaleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = sales::table
            .find(sale_id)
            .select(SaleRow::as_select())
            .first::<SaleRow>(&mut conn)
            .optional()?;

        Ok(row.map(SaleEntity::from))
    }

    async fn find_for_user(&self, sale_id: Uuid, user_id: Uuid) -> Result<Option<SaleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = sales::table
            .filter(sales::id.eq(sale_id))
            .filter(sales::user_id.eq(user_id))
            .select(SaleRow::as_select())
            .first::<SaleRow>(&mut conn)
            .optional()?;

        Ok(row.map(SaleEntity::from))
    }

    async fn update_status(&self, sale_id: Uuid, status: String) -> Result<Option<SaleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = update(sales::table.find(sale_id))
            .set((sales::status.eq(status), sales::updated_at.eq(Utc::now())))
            .returning(SaleRow::as_returning())
            .get_result::<SaleRow>(&mut conn)
            .optional()?;

        Ok(row.map(SaleEntity::from))
    }

    async fn metric_rows(&self, range: MetricsRange) -> Result<Vec<SaleMetricRow>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let filter = SalesFilter {
            from: range.from,
            to: range.to,
            ..Default::default()
        };

        let rows = Self::filtered(&filter)
            .select((sales::created_at, sales::total, sales::payment_status))
            .load::<SaleMetricRow>(&mut conn)?;

        Ok(rows)
    }
}
