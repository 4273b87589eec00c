use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::line_items::LineItem,
    infra::db::postgres::schema::purchases,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseEntity {
    pub id: Uuid,
    pub preference_id: Option<String>,
    pub payment_id: Option<String>,
    pub user_id: Uuid,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub total: f64,
    pub currency: String,
    pub payer_email: Option<String>,
    pub payment_status: String,
    pub payment_provider: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = purchases)]
pub struct PurchaseRow {
    pub id: Uuid,
    pub preference_id: Option<String>,
    pub payment_id: Option<String>,
    pub user_id: Uuid,
    pub items: serde_json::Value,
    pub subtotal: f64,
    pub total: f64,
    pub currency: String,
    pub payer_email: Option<String>,
    pub payment_status: String,
    pub payment_provider: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PurchaseRow> for PurchaseEntity {
    fn from(value: PurchaseRow) -> Self {
        Self {
            id: value.id,
            preference_id: value.preference_id,
            payment_id: value.payment_id,
            user_id: value.user_id,
            items: serde_json::from_value(value.items).unwrap_or_default(),
            subtotal: value.subtotal,
            total: value.total,
            currency: value.currency,
            payer_email: value.payer_email,
            payment_status: value.payment_status,
            payment_provider: value.payment_provider,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = purchases)]
pub struct InsertPurchaseEntity {
    pub preference_id: Option<String>,
    pub payment_id: Option<String>,
    pub user_id: Uuid,
    pub items: serde_json::Value,
    pub subtotal: f64,
    pub total: f64,
    pub currency: String,
    pub payer_email: Option<String>,
    pub payment_status: String,
    pub payment_provider: String,
    pub notes: Option<String>,
}
