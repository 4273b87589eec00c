use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, pg::Pg, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        errors::{contains_pattern, map_constraint_error},
        postgres_connection::PgPoolSquad,
        schema::{categories, item_types, items},
    },
};
use domain::{
    entities::items::{InsertItemEntity, ItemEntity, UpdateItemEntity},
    repositories::items::ItemRepository,
    value_objects::{items::ItemsFilter, pagination::Pagination},
};

pub struct ItemPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ItemPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn filtered(filter: &ItemsFilter) -> items::BoxedQuery<'static, Pg> {
        let mut query = items::table.into_boxed();

        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = contains_pattern(q);
            query = query.filter(
                items::name
                    .ilike(pattern.clone())
                    .or(items::description.ilike(pattern)),
            );
        }

        if let Some(type_id) = filter.type_id {
            query = query.filter(items::type_id.eq(type_id));
        }

        if let Some(category_id) = filter.category_id {
            query = query.filter(items::category_id.eq(category_id));
        }

        query
    }
}

#[async_trait]
impl ItemRepository for ItemPostgres {
    async fn create(&self, item: InsertItemEntity) -> Result<ItemEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let created = insert_into(items::table)
            .values(&item)
            .returning(ItemEntity::as_returning())
            .get_result::<ItemEntity>(&mut conn)
            .map_err(map_constraint_error)?;

        Ok(created)
    }

    async fn list(
        &self,
        filter: ItemsFilter,
        pagination: Pagination,
    ) -> Result<(Vec<ItemEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::filtered(&filter)
            .count()
            .get_result::<i64>(&mut conn)?;

        let results = Self::filtered(&filter)
            .order(items::created_at.desc())
            .offset(pagination.offset())
            .limit(pagination.limit)
            .select(ItemEntity::as_select())
            .load::<ItemEntity>(&mut conn)?;

        Ok((results, total))
    }

    async fn find_by_id(&self, item_id: Uuid) -> Result<Option<ItemEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = items::table
            .find(item_id)
            .select(ItemEntity::as_select())
            .first::<ItemEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update(&self, item_id: Uuid, changes: UpdateItemEntity) -> Result<Option<ItemEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(items::table.find(item_id))
            .set(&changes)
            .returning(ItemEntity::as_returning())
            .get_result::<ItemEntity>(&mut conn)
            .optional()
            .map_err(map_constraint_error)?;

        Ok(updated)
    }

    async fn delete(&self, item_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(items::table.find(item_id)).execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn distinct_category_names(&self) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let names = items::table
            .inner_join(categories::table)
            .select(categories::name)
            .distinct()
            .order(categories::name.asc())
            .load::<String>(&mut conn)?;

        Ok(names)
    }

    async fn distinct_type_names(&self) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let names = items::table
            .inner_join(item_types::table)
            .select(item_types::name)
            .distinct()
            .order(item_types::name.asc())
            .load::<String>(&mut conn)?;

        Ok(names)
    }
}
