use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::line_items::{LineItem, compute_totals},
    infra::db::postgres::schema::payments,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub items: Vec<LineItem>,
    pub amount: f64,
    pub currency: String,
    pub preference_id: String,
    pub payment_id: Option<String>,
    pub status: String,
    pub payer_email: Option<String>,
    pub external_reference: Option<String>,
    pub created_by: Uuid,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw row used for Diesel queries. Items stay as JSON and are parsed into LineItem.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub items: serde_json::Value,
    pub amount: f64,
    pub currency: String,
    pub preference_id: String,
    pub payment_id: Option<String>,
    pub status: String,
    pub payer_email: Option<String>,
    pub external_reference: Option<String>,
    pub created_by: Uuid,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentRow> for PaymentEntity {
    fn from(value: PaymentRow) -> Self {
        let items = serde_json::from_value(value.items).unwrap_or_default();

        Self {
            id: value.id,
            user_id: value.user_id,
            items,
            amount: value.amount,
            currency: value.currency,
            preference_id: value.preference_id,
            payment_id: value.payment_id,
            status: value.status,
            payer_email: value.payer_email,
            external_reference: value.external_reference,
            created_by: value.created_by,
            updated_by: value.updated_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub user_id: Option<Uuid>,
    items: serde_json::Value,
    amount: f64,
    currency: String,
    pub preference_id: String,
    pub status: String,
    pub payer_email: Option<String>,
    pub external_reference: Option<String>,
    pub created_by: Uuid,
}

impl InsertPaymentEntity {
    /// Amount and currency are always derived from `items`.
    pub fn new(
        items: &[LineItem],
        preference_id: String,
        status: String,
        created_by: Uuid,
    ) -> Self {
        let totals = compute_totals(items);

        Self {
            user_id: Some(created_by),
            items: serde_json::to_value(items).unwrap_or_default(),
            amount: totals.amount,
            currency: totals.currency,
            preference_id,
            status,
            payer_email: None,
            external_reference: None,
            created_by,
        }
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        serde_json::from_value(self.items.clone()).unwrap_or_default()
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

/// Administrative edit. `preference_id` and `created_by` are not part of the changeset.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = payments)]
pub struct UpdatePaymentEntity {
    pub status: Option<String>,
    items: Option<serde_json::Value>,
    amount: Option<f64>,
    currency: Option<String>,
    pub payer_email: Option<String>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UpdatePaymentEntity {
    pub fn with_items(mut self, items: &[LineItem]) -> Self {
        let totals = compute_totals(items);
        self.items = Some(serde_json::to_value(items).unwrap_or_default());
        self.amount = Some(totals.amount);
        self.currency = Some(totals.currency);
        self
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.items.is_none() && self.payer_email.is_none()
    }
}

/// Fields written by reconciliation against the gateway's charge.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = payments)]
pub struct GatewayPaymentUpdateEntity {
    pub payment_id: Option<String>,
    pub status: String,
    pub payer_email: Option<String>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32, unit_price: f64) -> LineItem {
        LineItem {
            item_id: None,
            title: "A".to_string(),
            quantity,
            unit_price,
            currency: "CLP".to_string(),
        }
    }

    #[test]
    fn insert_derives_amount_from_items() {
        let insert = InsertPaymentEntity::new(
            &[line(2, 1000.0), line(1, 500.0)],
            "pref-1".to_string(),
            "pending".to_string(),
            Uuid::new_v4(),
        );

        assert_eq!(insert.amount(), 2500.0);
        assert_eq!(insert.currency(), "CLP");
        assert_eq!(insert.line_items().len(), 2);
    }

    #[test]
    fn update_with_items_recomputes_amount() {
        let update = UpdatePaymentEntity::default().with_items(&[line(3, 10.0)]);

        assert_eq!(update.amount(), Some(30.0));
        assert_eq!(update.currency(), Some("CLP"));
        assert!(!update.is_empty());
        assert!(UpdatePaymentEntity::default().is_empty());
    }
}
