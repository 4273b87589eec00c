use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::categories::CategoryEntity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryModel {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub type_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryEntity> for CategoryModel {
    fn from(entity: CategoryEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            slug: entity.slug,
            type_id: entity.type_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryModel {
    pub name: String,
    pub type_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryModel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub type_id: Option<Uuid>,
}

/// `type_id` wins over `type_slug` when both are given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesQuery {
    #[serde(default)]
    pub type_id: Option<Uuid>,
    #[serde(default)]
    pub type_slug: Option<String>,
}
