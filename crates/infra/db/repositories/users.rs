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
        schema::users,
    },
};
use domain::{
    entities::users::{InsertUserEntity, UpdateUserEntity, UserEntity},
    repositories::users::UserRepository,
    value_objects::{pagination::Pagination, users::UsersFilter},
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn filtered(filter: &UsersFilter) -> users::BoxedQuery<'static, Pg> {
        let mut query = users::table.into_boxed();

        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = contains_pattern(q);
            query = query.filter(
                users::username
                    .ilike(pattern.clone())
                    .or(users::email.ilike(pattern)),
            );
        }

        query
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn create(&self, user: InsertUserEntity) -> Result<UserEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let created = insert_into(users::table)
            .values(&user)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn)
            .map_err(map_constraint_error)?;

        Ok(created)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user = users::table
            .find(user_id)
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user = users::table
            .filter(users::email.eq(email))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(user)
    }

    async fn exists_by_email_or_username(
        &self,
        email: &str,
        username: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = users::table
            .filter(users::email.eq(email).or(users::username.eq(username)))
            .select(users::id)
            .into_boxed();

        if let Some(exclude_id) = exclude_id {
            query = query.filter(users::id.ne(exclude_id));
        }

        let found = query.first::<Uuid>(&mut conn).optional()?;

        Ok(found.is_some())
    }

    async fn list(
        &self,
        filter: UsersFilter,
        pagination: Pagination,
    ) -> Result<(Vec<UserEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::filtered(&filter)
            .count()
            .get_result::<i64>(&mut conn)?;

        let results = Self::filtered(&filter)
            .order(users::created_at.desc())
            .offset(pagination.offset())
            .limit(pagination.limit)
            .select(UserEntity::as_select())
            .load::<UserEntity>(&mut conn)?;

        Ok((results, total))
    }

    async fn update(&self, user_id: Uuid, changes: UpdateUserEntity) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(users::table.find(user_id))
            .set(&changes)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn)
            .optional()
            .map_err(map_constraint_error)?;

        Ok(updated)
    }

    async fn update_password(&self, user_id: Uuid, password_hash: String) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(users::table.find(user_id))
            .set((
                users::password_hash.eq(password_hash),
                users::updated_by.eq(Some(user_id.to_string())),
                users::updated_at.eq(chrono::Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn delete(&self, user_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(users::table.find(user_id))
            .execute(&mut conn)
            .map_err(map_constraint_error)?;

        Ok(affected > 0)
    }
}
