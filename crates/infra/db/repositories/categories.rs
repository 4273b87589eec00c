use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        errors::map_constraint_error, postgres_connection::PgPoolSquad, schema::categories,
    },
};
use domain::{
    entities::categories::{CategoryEntity, InsertCategoryEntity, UpdateCategoryEntity},
    repositories::categories::CategoryRepository,
};

pub struct CategoryPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CategoryPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CategoryRepository for CategoryPostgres {
    async fn create(&self, category: InsertCategoryEntity) -> Result<CategoryEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let created = insert_into(categories::table)
            .values(&category)
            .returning(CategoryEntity::as_returning())
            .get_result::<CategoryEntity>(&mut conn)
            .map_err(map_constraint_error)?;

        Ok(created)
    }

    async fn list(&self, type_id: Option<Uuid>) -> Result<Vec<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = categories::table
            .select(CategoryEntity::as_select())
            .order(categories::name.asc())
            .into_boxed();

        if let Some(type_id) = type_id {
            query = query.filter(categories::type_id.eq(type_id));
        }

        Ok(query.load::<CategoryEntity>(&mut conn)?)
    }

    async fn find_by_id(&self, category_id: Uuid) -> Result<Option<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = categories::table
            .find(category_id)
            .select(CategoryEntity::as_select())
            .first::<CategoryEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn exists_by_slug(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = categories::table
            .filter(categories::slug.eq(slug))
            .select(categories::id)
            .into_boxed();

        if let Some(exclude_id) = exclude_id {
            query = query.filter(categories::id.ne(exclude_id));
        }

        Ok(query.first::<Uuid>(&mut conn).optional()?.is_some())
    }

    async fn distinct_names(&self, type_id: Option<Uuid>) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = categories::table
            .select(categories::name)
            .distinct()
            .order(categories::name.asc())
            .into_boxed();

        if let Some(type_id) = type_id {
            query = query.filter(categories::type_id.eq(type_id));
        }

        Ok(query.load::<String>(&mut conn)?)
    }

    async fn update(
        &self,
        category_id: Uuid,
        changes: UpdateCategoryEntity,
    ) -> Result<Option<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(categories::table.find(category_id))
            .set(&changes)
            .returning(CategoryEntity::as_returning())
            .get_result::<CategoryEntity>(&mut conn)
            .optional()
            .map_err(map_constraint_error)?;

        Ok(updated)
    }

    async fn delete(&self, category_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(categories::table.find(category_id))
            .execute(&mut conn)
            .map_err(map_constraint_error)?;

        Ok(affected > 0)
    }
}
