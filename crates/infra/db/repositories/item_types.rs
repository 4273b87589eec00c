use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        errors::map_constraint_error, postgres_connection::PgPoolSquad, schema::item_types,
    },
};
use domain::{
    entities::item_types::{InsertItemTypeEntity, ItemTypeEntity, UpdateItemTypeEntity},
    repositories::item_types::ItemTypeRepository,
};

pub struct ItemTypePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ItemTypePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ItemTypeRepository for ItemTypePostgres {
    async fn create(&self, item_type: InsertItemTypeEntity) -> Result<ItemTypeEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let created = insert_into(item_types::table)
            .values(&item_type)
            .returning(ItemTypeEntity::as_returning())
            .get_result::<ItemTypeEntity>(&mut conn)
            .map_err(map_constraint_error)?;

        Ok(created)
    }

    async fn list(&self) -> Result<Vec<ItemTypeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = item_types::table
            .order(item_types::name.asc())
            .select(ItemTypeEntity::as_select())
            .load::<ItemTypeEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, type_id: Uuid) -> Result<Option<ItemTypeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = item_types::table
            .find(type_id)
            .select(ItemTypeEntity::as_select())
            .first::<ItemTypeEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ItemTypeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = item_types::table
            .filter(item_types::slug.eq(slug))
            .select(ItemTypeEntity::as_select())
            .first::<ItemTypeEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn exists_by_name_or_slug(
        &self,
        name: &str,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = item_types::table
            .filter(item_types::name.eq(name).or(item_types::slug.eq(slug)))
            .select(item_types::id)
            .into_boxed();

        if let Some(exclude_id) = exclude_id {
            query = query.filter(item_types::id.ne(exclude_id));
        }

        Ok(query.first::<Uuid>(&mut conn).optional()?.is_some())
    }

    async fn update(
        &self,
        type_id: Uuid,
        changes: UpdateItemTypeEntity,
    ) -> Result<Option<ItemTypeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(item_types::table.find(type_id))
            .set(&changes)
            .returning(ItemTypeEntity::as_returning())
            .get_result::<ItemTypeEntity>(&mut conn)
            .optional()
            .map_err(map_constraint_error)?;

        Ok(updated)
    }

    async fn delete(&self, type_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(item_types::table.find(type_id))
            .execute(&mut conn)
            .map_err(map_constraint_error)?;

        Ok(affected > 0)
    }
}
