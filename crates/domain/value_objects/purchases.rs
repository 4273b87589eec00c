use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::purchases::PurchaseEntity,
    value_objects::enums::payment_providers::PaymentProvider,
    value_objects::line_items::LineItem,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseModel {
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

impl From<PurchaseEntity> for PurchaseModel {
    fn from(entity: PurchaseEntity) -> Self {
        Self {
            id: entity.id,
            preference_id: entity.preference_id,
            payment_id: entity.payment_id,
            user_id: entity.user_id,
            items: entity.items,
            subtotal: entity.subtotal,
            total: entity.total,
            currency: entity.currency,
            payer_email: entity.payer_email,
            payment_status: entity.payment_status,
            payment_provider: entity.payment_provider,
            notes: entity.notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseItemInput {
    #[serde(default)]
    pub item_id: Option<Uuid>,
    pub title: String,
    pub unit_price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePurchaseModel {
    #[serde(default)]
    pub items: Vec<PurchaseItemInput>,
    #[serde(default = "default_provider")]
    pub payment_provider: PaymentProvider,
}

fn default_provider() -> PaymentProvider {
    PaymentProvider::Manual
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MyPurchasesQuery {
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchasesFilter {
    pub user_id: Option<Uuid>,
    pub payment_status: Option<String>,
}
