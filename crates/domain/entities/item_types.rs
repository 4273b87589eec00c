use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::item_types;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = item_types)]
pub struct ItemTypeEntity {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = item_types)]
pub struct InsertItemTypeEntity {
    pub name: String,
    pub slug: String,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = item_types)]
pub struct UpdateItemTypeEntity {
    pub name: String,
    pub slug: String,
    pub updated_by: Uuid,
    pub updated_at: DateTime<Utc>,
}
