use std::{collections::HashMap, sync::Arc};

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::Utc;
use crates::{
    domain::{
        entities::{
            payments::{
                GatewayPaymentUpdateEntity, InsertPaymentEntity, PaymentEntity,
                UpdatePaymentEntity,
            },
            purchases::InsertPurchaseEntity,
            sales::InsertSaleEntity,
        },
        repositories::{
            payments::PaymentRepository, purchases::PurchaseRepository, sales::SaleRepository,
        },
        value_objects::{
            enums::{
                order_payment_statuses::OrderPaymentStatus, payment_providers::PaymentProvider,
                payment_statuses::PaymentStatus, sale_statuses::SaleStatus,
            },
            line_items::normalize_line_items,
            pagination::{Paged, Pagination},
            payments::{
                ConfirmPaymentQuery, CreatePreferenceModel, ListPaymentsQuery, PaymentModel,
                PaymentsFilter, PreferenceCreatedModel, ReconcileOutcome, UpdatePaymentModel,
                WebhookAckModel, normalize_payer_email,
            },
        },
    },
    payments::{
        mercadopago_client::{
            BackUrls, MercadoPagoClient, PreferenceItem, PreferenceMetadata, PreferencePayer,
            PreferenceRequest,
        },
        parsers::{
            GatewayCharge, charge_id_from_notification, preference_id_from_response,
            redirect_url_from_response, topic_from_notification,
        },
    },
};
use serde_json::Value;
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

use super::{UseCaseError, UseCaseResult};
use crate::config::config_model::DotEnvyConfig;

pub const WEBHOOK_PATH: &str = "/api/payments/webhook";
pub const SYSTEM_ACTOR: &str = "system";
const PAYMENTS_DEFAULT_LIMIT: i64 = 20;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_preference(&self, request: PreferenceRequest) -> AnyResult<Value>;

    async fn get_payment(&self, charge_id: &str) -> AnyResult<Value>;
}

#[async_trait]
impl PaymentGateway for MercadoPagoClient {
    async fn create_preference(&self, request: PreferenceRequest) -> AnyResult<Value> {
        self.create_preference(&request).await
    }

    async fn get_payment(&self, charge_id: &str) -> AnyResult<Value> {
        self.get_payment(charge_id).await
    }
}

/// Deployment values the checkout flow needs, handed over at construction.
#[derive(Debug, Clone, Default)]
pub struct PaymentSettings {
    pub access_token: Option<String>,
    pub front_url: Option<String>,
    pub base_url: Option<String>,
    pub sandbox: bool,
    pub statement_descriptor: String,
}

impl PaymentSettings {
    pub fn from_config(config: &DotEnvyConfig) -> Self {
        Self {
            access_token: config.mercadopago.access_token.clone(),
            front_url: config.public_urls.front_url.clone(),
            base_url: config.public_urls.base_url.clone(),
            sandbox: config.mercadopago.sandbox,
            statement_descriptor: config.mercadopago.statement_descriptor.clone(),
        }
    }
}

/// Absolute http(s) URL without trailing slashes, or `None`.
pub fn ensure_http_url(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).ok()?;

    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Some(trimmed.to_string()),
        _ => None,
    }
}

pub struct PaymentUseCase<P, S, Pu, G>
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SaleRepository + Send + Sync + 'static,
    Pu: PurchaseRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    payment_repo: Arc<P>,
    sale_repo: Arc<S>,
    purchase_repo: Arc<Pu>,
    gateway: Arc<G>,
    settings: PaymentSettings,
}

impl<P, S, Pu, G> PaymentUseCase<P, S, Pu, G>
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SaleRepository + Send + Sync + 'static,
    Pu: PurchaseRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    pub fn new(
        payment_repo: Arc<P>,
        sale_repo: Arc<S>,
        purchase_repo: Arc<Pu>,
        gateway: Arc<G>,
        settings: PaymentSettings,
    ) -> Self {
        Self {
            payment_repo,
            sale_repo,
            purchase_repo,
            gateway,
            settings,
        }
    }

    pub async fn create_preference(
        &self,
        created_by: Uuid,
        model: CreatePreferenceModel,
    ) -> UseCaseResult<PreferenceCreatedModel> {
        if model.items.is_empty() {
            return Err(UseCaseError::Validation("items are required".to_string()));
        }

        let front_url = ensure_http_url(self.settings.front_url.as_deref()).ok_or_else(|| {
            error!("payments: FRONT_URL is missing or not an absolute http(s) url");
            UseCaseError::Configuration(
                "FRONT_URL is missing or invalid (must include http/https)".to_string(),
            )
        })?;

        if self.settings.access_token.is_none() {
            error!("payments: MP_ACCESS_TOKEN is not configured");
            return Err(UseCaseError::Configuration(
                "MP_ACCESS_TOKEN is not configured".to_string(),
            ));
        }

        let items = normalize_line_items(&model.items);
        let notification_url = ensure_http_url(self.settings.base_url.as_deref())
            .map(|base_url| format!("{base_url}{WEBHOOK_PATH}"));
        let external_reference = Uuid::new_v4().to_string();

        let request = PreferenceRequest {
            items: items
                .iter()
                .map(|item| PreferenceItem {
                    id: Uuid::new_v4().to_string(),
                    title: item.title.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    currency_id: item.currency.clone(),
                })
                .collect(),
            payer: model.payer.as_ref().map(|payer| PreferencePayer {
                email: payer.email.as_deref().and_then(normalize_payer_email),
                name: payer.name.clone(),
                surname: payer.surname.clone(),
            }),
            back_urls: BackUrls {
                success: format!("{front_url}/checkout/success"),
                failure: format!("{front_url}/checkout/failure"),
                pending: format!("{front_url}/checkout/pending"),
            },
            auto_return: "approved".to_string(),
            binary_mode: false,
            statement_descriptor: self.settings.statement_descriptor.clone(),
            notification_url,
            external_reference: external_reference.clone(),
            metadata: PreferenceMetadata {
                created_by: created_by.to_string(),
            },
        };

        info!(
            %created_by,
            item_count = items.len(),
            notification_url = ?request.notification_url,
            "payments: creating preference"
        );

        let response = self
            .gateway
            .create_preference(request)
            .await
            .map_err(|err| {
                error!(%created_by, gateway_error = ?err, "payments: preference creation failed");
                UseCaseError::Upstream("could not create payment preference".to_string())
            })?;

        let (Some(preference_id), Some(redirect_url)) = (
            preference_id_from_response(&response),
            redirect_url_from_response(&response, self.settings.sandbox),
        ) else {
            error!(%created_by, response = %response, "payments: preference response missing id or redirect url");
            return Err(UseCaseError::Upstream(
                "payment gateway returned no preference id or redirect url".to_string(),
            ));
        };

        let mut insert = InsertPaymentEntity::new(
            &items,
            preference_id.clone(),
            PaymentStatus::Pending.to_string(),
            created_by,
        );
        insert.payer_email = model
            .payer
            .as_ref()
            .and_then(|payer| payer.email.as_deref())
            .and_then(normalize_payer_email);
        insert.external_reference = Some(external_reference);

        let payment = self.payment_repo.create(insert).await.map_err(|err| {
            error!(%created_by, %preference_id, db_error = ?err, "payments: failed to record payment");
            UseCaseError::from_write(err, "payment preference already recorded")
        })?;

        info!(
            %created_by,
            %preference_id,
            amount = payment.amount,
            currency = %payment.currency,
            "payments: preference created"
        );

        Ok(PreferenceCreatedModel {
            preference_id,
            redirect_url,
            payment: payment.into(),
        })
    }

    pub async fn list(&self, query: ListPaymentsQuery) -> UseCaseResult<Paged<PaymentModel>> {
        let pagination = Pagination::new(query.page, query.limit, PAYMENTS_DEFAULT_LIMIT);
        let filter = PaymentsFilter {
            status: query.status.filter(|status| !status.trim().is_empty()),
            user_id: query.user_id,
        };

        let (payments, total) = self
            .payment_repo
            .list(filter, pagination)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "payments: failed to list payments");
                UseCaseError::Internal(err)
            })?;

        Ok(Paged::new(payments, total, pagination).map(PaymentModel::from))
    }

    pub async fn get(&self, payment_id: Uuid) -> UseCaseResult<PaymentModel> {
        self.payment_repo
            .find_by_id(payment_id)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: failed to load payment");
                UseCaseError::Internal(err)
            })?
            .map(PaymentModel::from)
            .ok_or_else(|| UseCaseError::NotFound("payment not found".to_string()))
    }

    pub async fn update(
        &self,
        payment_id: Uuid,
        updated_by: Uuid,
        model: UpdatePaymentModel,
    ) -> UseCaseResult<PaymentModel> {
        let mut changes = UpdatePaymentEntity::default();

        if let Some(status) = model.status.as_deref() {
            let status = PaymentStatus::from_str(status.trim()).ok_or_else(|| {
                UseCaseError::Validation(format!("unknown payment status: {status}"))
            })?;
            changes.status = Some(status.to_string());
        }

        if let Some(items) = model.items.as_ref() {
            if items.is_empty() {
                return Err(UseCaseError::Validation(
                    "items must not be empty".to_string(),
                ));
            }
            changes = changes.with_items(&normalize_line_items(items));
        }

        if let Some(email) = model.payer_email.as_deref() {
            changes.payer_email = Some(normalize_payer_email(email).ok_or_else(|| {
                UseCaseError::Validation("payer_email must not be blank".to_string())
            })?);
        }

        if changes.is_empty() {
            return Err(UseCaseError::Validation("nothing to update".to_string()));
        }

        changes.updated_by = Some(updated_by.to_string());
        changes.updated_at = Some(Utc::now());

        let updated = self
            .payment_repo
            .update(payment_id, changes)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: failed to update payment");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("payment not found".to_string()))?;

        info!(%payment_id, %updated_by, status = %updated.status, "payments: payment updated by admin");

        Ok(updated.into())
    }

    /// Gateway notification entry point. Always acknowledges.
    pub async fn process_webhook(
        &self,
        query: HashMap<String, String>,
        body: Value,
    ) -> WebhookAckModel {
        let topic = topic_from_notification(&query, &body);
        let charge_id = charge_id_from_notification(&query, &body);

        info!(topic = ?topic, charge_id = ?charge_id, "payments: webhook received");

        let Some(charge_id) = charge_id else {
            return ReconcileOutcome::NoPaymentId.into();
        };

        let charge = match self.gateway.get_payment(&charge_id).await {
            Ok(charge) => charge,
            Err(err) => {
                warn!(%charge_id, gateway_error = ?err, "payments: webhook charge lookup failed");
                return ReconcileOutcome::Failed {
                    reason: "gateway lookup failed".to_string(),
                }
                .into();
            }
        };

        self.reconcile(GatewayCharge::from_value(&charge), &charge_id)
            .await
            .into()
    }

    /// Return-redirect entry point.
    pub async fn confirm_from_return(
        &self,
        query: ConfirmPaymentQuery,
    ) -> UseCaseResult<ReconcileOutcome> {
        let charge_id = query
            .payment_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| UseCaseError::Validation("payment_id is required".to_string()))?;

        let charge = self.gateway.get_payment(&charge_id).await.map_err(|err| {
            error!(%charge_id, gateway_error = ?err, "payments: confirm charge lookup failed");
            UseCaseError::Upstream("could not fetch payment from gateway".to_string())
        })?;

        Ok(self
            .reconcile(GatewayCharge::from_value(&charge), &charge_id)
            .await)
    }

    /// Applies a gateway charge to the local payment keyed by preference id and,
    /// on approval, materializes the sale and purchase once.
    pub async fn reconcile(&self, charge: GatewayCharge, charge_id: &str) -> ReconcileOutcome {
        let Some(preference_id) = charge.preference_id.clone() else {
            info!(%charge_id, "payments: charge carries no preference id");
            return ReconcileOutcome::NoPreferenceId;
        };

        let status = charge
            .status
            .clone()
            .unwrap_or_else(|| PaymentStatus::Pending.to_string());
        if PaymentStatus::from_str(&status).is_none() {
            warn!(%preference_id, %status, "payments: storing unrecognized gateway status");
        }

        let changes = GatewayPaymentUpdateEntity {
            payment_id: Some(charge.id.clone().unwrap_or_else(|| charge_id.to_string())),
            status: status.clone(),
            payer_email: charge.payer_email.clone(),
            updated_by: Some(SYSTEM_ACTOR.to_string()),
            updated_at: Utc::now(),
        };

        let payment = match self
            .payment_repo
            .apply_gateway_update(&preference_id, changes)
            .await
        {
            Ok(Some(payment)) => payment,
            Ok(None) => {
                warn!(%preference_id, "payments: no local payment for preference");
                return ReconcileOutcome::PaymentNotFound { preference_id };
            }
            Err(err) => {
                error!(%preference_id, db_error = ?err, "payments: failed to apply gateway update");
                return ReconcileOutcome::Failed {
                    reason: "payment update failed".to_string(),
                };
            }
        };

        let fulfilled = if status == PaymentStatus::Approved.as_str() {
            self.fulfill(&payment).await
        } else {
            false
        };

        info!(%preference_id, %status, fulfilled, "payments: payment reconciled");

        ReconcileOutcome::Updated {
            payment: payment.into(),
            status,
            fulfilled,
        }
    }

    /// Set-on-insert of the sale and purchase for an approved payment.
    /// True when both records exist afterwards.
    async fn fulfill(&self, payment: &PaymentEntity) -> bool {
        let preference_id = payment.preference_id.as_str();
        let buyer_id = payment.user_id.unwrap_or(payment.created_by);
        let items = serde_json::to_value(&payment.items).unwrap_or(Value::Array(Vec::new()));

        let sale = InsertSaleEntity {
            preference_id: Some(payment.preference_id.clone()),
            payment_id: payment.payment_id.clone(),
            user_id: buyer_id,
            items: items.clone(),
            subtotal: payment.amount,
            taxes: 0.0,
            total: payment.amount,
            currency: payment.currency.clone(),
            payer_email: payment.payer_email.clone(),
            status: SaleStatus::New.to_string(),
            payment_status: OrderPaymentStatus::Paid.to_string(),
            payment_provider: PaymentProvider::MercadoPago.to_string(),
            notes: None,
        };

        let purchase = InsertPurchaseEntity {
            preference_id: Some(payment.preference_id.clone()),
            payment_id: payment.payment_id.clone(),
            user_id: buyer_id,
            items,
            subtotal: payment.amount,
            total: payment.amount,
            currency: payment.currency.clone(),
            payer_email: payment.payer_email.clone(),
            payment_status: OrderPaymentStatus::Paid.to_string(),
            payment_provider: PaymentProvider::MercadoPago.to_string(),
            notes: None,
        };

        let sale_ok = match self.sale_repo.insert_if_absent(sale).await {
            Ok(created) => {
                info!(%preference_id, created, "payments: sale materialized");
                true
            }
            Err(err) => {
                error!(%preference_id, db_error = ?err, "payments: failed to insert sale");
                false
            }
        };

        let purchase_ok = match self.purchase_repo.insert_if_absent(purchase).await {
            Ok(created) => {
                info!(%preference_id, created, "payments: purchase materialized");
                true
            }
            Err(err) => {
                error!(%preference_id, db_error = ?err, "payments: failed to insert purchase");
                false
            }
        };

        sale_ok && purchase_ok
    }
}
