use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::categories;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = categories)]
pub struct CategoryEntity {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub type_id: Uuid,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub struct InsertCategoryEntity {
    pub name: String,
    pub slug: String,
    pub type_id: Uuid,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = categories)]
pub struct UpdateCategoryEntity {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub type_id: Option<Uuid>,
    pub updated_by: Uuid,
    pub updated_at: DateTime<Utc>,
}
