use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::items::{InsertItemEntity, ItemEntity, UpdateItemEntity},
    value_objects::{items::ItemsFilter, pagination::Pagination},
};

#[automock]
#[async_trait]
pub trait ItemRepository {
    async fn create(&self, item: InsertItemEntity) -> Result<ItemEntity>;
    async fn list(&self, filter: ItemsFilter, pagination: Pagination) -> Result<(Vec<ItemEntity>, i64)>;
    async fn find_by_id(&self, item_id: Uuid) -> Result<Option<ItemEntity>>;
    async fn update(&self, item_id: Uuid, changes: UpdateItemEntity) -> Result<Option<ItemEntity>>;
    async fn delete(&self, item_id: Uuid) -> Result<bool>;
    /// Sorted names of the categories referenced by at least one item.
    async fn distinct_category_names(&self) -> Result<Vec<String>>;
    /// Sorted names of the types referenced by at least one item.
    async fn distinct_type_names(&self) -> Result<Vec<String>>;
}
