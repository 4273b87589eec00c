use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::payments::PaymentEntity,
    value_objects::line_items::{LineItem, LineItemInput},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentModel {
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

impl From<PaymentEntity> for PaymentModel {
    fn from(entity: PaymentEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            items: entity.items,
            amount: entity.amount,
            currency: entity.currency,
            preference_id: entity.preference_id,
            payment_id: entity.payment_id,
            status: entity.status,
            payer_email: entity.payer_email,
            external_reference: entity.external_reference,
            created_by: entity.created_by,
            updated_by: entity.updated_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PayerModel {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePreferenceModel {
    #[serde(default)]
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub payer: Option<PayerModel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreferenceCreatedModel {
    pub preference_id: String,
    pub redirect_url: String,
    pub payment: PaymentModel,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePaymentModel {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<LineItemInput>>,
    #[serde(default)]
    pub payer_email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPaymentsQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentsFilter {
    pub status: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmPaymentQuery {
    #[serde(default)]
    pub payment_id: Option<String>,
}

/// Result of applying a gateway charge to local state. Never an error.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    NoPaymentId,
    NoPreferenceId,
    PaymentNotFound { preference_id: String },
    Updated {
        payment: PaymentModel,
        status: String,
        fulfilled: bool,
    },
    Failed { reason: String },
}

impl ReconcileOutcome {
    pub fn payment(&self) -> Option<&PaymentModel> {
        match self {
            ReconcileOutcome::Updated { payment, .. } => Some(payment),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ReconcileOutcome::NoPaymentId => "no_payment_id",
            ReconcileOutcome::NoPreferenceId => "no_preference_id",
            ReconcileOutcome::PaymentNotFound { .. } => "payment_not_found",
            ReconcileOutcome::Updated { .. } => "updated",
            ReconcileOutcome::Failed { .. } => "failed",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ReconcileOutcome::NoPaymentId => "Webhook received: no payment id",
            ReconcileOutcome::NoPreferenceId => "Webhook received: no preference id",
            ReconcileOutcome::PaymentNotFound { .. } => "Webhook received: payment not found",
            ReconcileOutcome::Updated { .. } => "Webhook processed",
            ReconcileOutcome::Failed { .. } => "Webhook received: processing failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebhookAckModel {
    pub received: bool,
    pub outcome: &'static str,
    #[serde(skip)]
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentModel>,
}

impl From<ReconcileOutcome> for WebhookAckModel {
    fn from(outcome: ReconcileOutcome) -> Self {
        Self {
            received: true,
            outcome: outcome.tag(),
            message: outcome.message(),
            payment: outcome.payment().cloned(),
        }
    }
}

pub fn normalize_payer_email(value: &str) -> Option<String> {
    let email = value.trim().to_lowercase();
    (!email.is_empty()).then_some(email)
}
