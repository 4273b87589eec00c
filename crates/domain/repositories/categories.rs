use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::categories::{
    CategoryEntity, InsertCategoryEntity, UpdateCategoryEntity,
};

#[automock]
#[async_trait]
pub trait CategoryRepository {
    async fn create(&self, category: InsertCategoryEntity) -> Result<CategoryEntity>;
    async fn list(&self, type_id: Option<Uuid>) -> Result<Vec<CategoryEntity>>;
    async fn find_by_id(&self, category_id: Uuid) -> Result<Option<CategoryEntity>>;
    async fn exists_by_slug(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool>;
    async fn distinct_names(&self, type_id: Option<Uuid>) -> Result<Vec<String>>;
    async fn update(
        &self,
        category_id: Uuid,
        changes: UpdateCategoryEntity,
    ) -> Result<Option<CategoryEntity>>;
    async fn delete(&self, category_id: Uuid) -> Result<bool>;
}
