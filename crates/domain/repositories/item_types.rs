use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::item_types::{
    InsertItemTypeEntity, ItemTypeEntity, UpdateItemTypeEntity,
};

#[automock]
#[async_trait]
pub trait ItemTypeRepository {
    async fn create(&self, item_type: InsertItemTypeEntity) -> Result<ItemTypeEntity>;
    async fn list(&self) -> Result<Vec<ItemTypeEntity>>;
    async fn find_by_id(&self, type_id: Uuid) -> Result<Option<ItemTypeEntity>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ItemTypeEntity>>;
    /// True when another type already uses `name` or `slug`.
    async fn exists_by_name_or_slug(
        &self,
        name: &str,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool>;
    async fn update(
        &self,
        type_id: Uuid,
        changes: UpdateItemTypeEntity,
    ) -> Result<Option<ItemTypeEntity>>;
    async fn delete(&self, type_id: Uuid) -> Result<bool>;
}
