use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::users::{InsertUserEntity, UpdateUserEntity, UserEntity},
    value_objects::{pagination::Pagination, users::UsersFilter},
};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn create(&self, user: InsertUserEntity) -> Result<UserEntity>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>>;
    async fn exists_by_email_or_username(
        &self,
        email: &str,
        username: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool>;
    async fn list(&self, filter: UsersFilter, pagination: Pagination) -> Result<(Vec<UserEntity>, i64)>;
    async fn update(&self, user_id: Uuid, changes: UpdateUserEntity) -> Result<Option<UserEntity>>;
    async fn update_password(&self, user_id: Uuid, password_hash: String) -> Result<bool>;
    async fn delete(&self, user_id: Uuid) -> Result<bool>;
}
