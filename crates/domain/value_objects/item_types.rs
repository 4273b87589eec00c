use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::item_types::ItemTypeEntity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemTypeModel {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemTypeEntity> for ItemTypeModel {
    fn from(entity: ItemTypeEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            slug: entity.slug,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemTypeModel {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemTypeModel {
    #[serde(default)]
    pub name: Option<String>,
}
