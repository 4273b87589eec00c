use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::items;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = items)]
pub struct ItemEntity {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub type_id: Uuid,
    pub category_id: Uuid,
    pub stock: Option<i32>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = items)]
pub struct InsertItemEntity {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub type_id: Uuid,
    pub category_id: Uuid,
    pub stock: Option<i32>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = items)]
pub struct UpdateItemEntity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub type_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub stock: Option<i32>,
    pub updated_by: Uuid,
    pub updated_at: DateTime<Utc>,
}
