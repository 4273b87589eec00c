use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::items::ItemEntity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemModel {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub type_id: Uuid,
    pub category_id: Uuid,
    pub stock: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemEntity> for ItemModel {
    fn from(entity: ItemEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            price: entity.price,
            type_id: entity.type_id,
            category_id: entity.category_id,
            stock: entity.stock,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemModel {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub type_id: Uuid,
    pub category_id: Uuid,
    #[serde(default)]
    pub stock: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemModel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub type_id: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub stock: Option<i32>,
}

impl UpdateItemModel {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.type_id.is_none()
            && self.category_id.is_none()
            && self.stock.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListItemsQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub type_id: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemsFilter {
    pub q: Option<String>,
    pub type_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}
