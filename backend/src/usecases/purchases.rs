use std::sync::Arc;

use crates::domain::{
    entities::purchases::InsertPurchaseEntity,
    repositories::purchases::PurchaseRepository,
    value_objects::{
        enums::order_payment_statuses::OrderPaymentStatus,
        line_items::{LineItemInput, compute_totals, normalize_line_items},
        pagination::{DEFAULT_LIMIT, Paged, Pagination},
        purchases::{
            CreatePurchaseModel, MyPurchasesQuery, PurchaseItemInput, PurchaseModel,
            PurchasesFilter,
        },
    },
};
use tracing::{error, info};
use uuid::Uuid;

use super::{UseCaseError, UseCaseResult};

const BUYER_CANCEL_NOTE: &str = "cancelled by buyer";

pub struct PurchaseUseCase<P>
where
    P: PurchaseRepository + Send + Sync + 'static,
{
    purchase_repo: Arc<P>,
}

impl<P> PurchaseUseCase<P>
where
    P: PurchaseRepository + Send + Sync + 'static,
{
    pub fn new(purchase_repo: Arc<P>) -> Self {
        Self { purchase_repo }
    }

    pub async fn list_mine(
        &self,
        user_id: Uuid,
        query: MyPurchasesQuery,
    ) -> UseCaseResult<Paged<PurchaseModel>> {
        let payment_status = match query
            .payment_status
            .map(|status| status.trim().to_lowercase())
            .filter(|status| !status.is_empty())
        {
            Some(status) => Some(
                OrderPaymentStatus::from_str(&status)
                    .ok_or_else(|| {
                        UseCaseError::Validation(format!("unknown payment status: {status}"))
                    })?
                    .to_string(),
            ),
            None => None,
        };

        let pagination = Pagination::new(query.page, query.limit, DEFAULT_LIMIT);
        let filter = PurchasesFilter {
            user_id: Some(user_id),
            payment_status,
        };

        let (purchases, total) = self.purchase_repo.list(filter, pagination).await?;

        Ok(Paged::new(purchases, total, pagination).map(PurchaseModel::from))
    }

    pub async fn get_mine(&self, user_id: Uuid, purchase_id: Uuid) -> UseCaseResult<PurchaseModel> {
        self.purchase_repo
            .find_for_user(purchase_id, user_id)
            .await?
            .map(PurchaseModel::from)
            .ok_or_else(|| UseCaseError::NotFound("purchase not found".to_string()))
    }

    /// Manual purchase. Totals are derived from the lines the same way payment
    /// amounts are.
    pub async fn create(
        &self,
        user_id: Uuid,
        model: CreatePurchaseModel,
    ) -> UseCaseResult<PurchaseModel> {
        if model.items.is_empty() {
            return Err(UseCaseError::Validation("items are required".to_string()));
        }

        let inputs = model
            .items
            .iter()
            .map(validate_line)
            .collect::<UseCaseResult<Vec<_>>>()?;
        let items = normalize_line_items(&inputs);
        let totals = compute_totals(&items);

        let purchase = self
            .purchase_repo
            .create(InsertPurchaseEntity {
                preference_id: None,
                payment_id: None,
                user_id,
                items: serde_json::to_value(&items)
                    .map_err(|err| UseCaseError::Internal(err.into()))?,
                subtotal: totals.amount,
                total: totals.amount,
                currency: totals.currency,
                payer_email: None,
                payment_status: OrderPaymentStatus::Pending.to_string(),
                payment_provider: model.payment_provider.to_string(),
                notes: None,
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "purchases: failed to create purchase");
                UseCaseError::from_write(err, "purchase already recorded")
            })?;

        info!(%user_id, purchase_id = %purchase.id, total = purchase.total, "purchases: manual purchase created");

        Ok(purchase.into())
    }

    /// Only pending purchases can be cancelled; they end up `failed`.
    pub async fn cancel(&self, user_id: Uuid, purchase_id: Uuid) -> UseCaseResult<PurchaseModel> {
        if let Some(purchase) = self
            .purchase_repo
            .cancel_pending(purchase_id, user_id, BUYER_CANCEL_NOTE.to_string())
            .await?
        {
            info!(%user_id, %purchase_id, "purchases: purchase cancelled");
            return Ok(purchase.into());
        }

        match self.purchase_repo.find_for_user(purchase_id, user_id).await? {
            Some(purchase) => Err(UseCaseError::Validation(format!(
                "only pending purchases can be cancelled (current: {})",
                purchase.payment_status
            ))),
            None => Err(UseCaseError::NotFound("purchase not found".to_string())),
        }
    }
}

fn validate_line(line: &PurchaseItemInput) -> UseCaseResult<LineItemInput> {
    if line.quantity < 1 {
        return Err(UseCaseError::Validation("quantity must be >= 1".to_string()));
    }
    if !line.unit_price.is_finite() || line.unit_price < 0.0 {
        return Err(UseCaseError::Validation(
            "unit_price must be a number >= 0".to_string(),
        ));
    }

    Ok(LineItemInput {
        item_id: line.item_id,
        title: Some(line.title.clone()),
        quantity: Some(line.quantity),
        unit_price: Some(line.unit_price),
        currency: line.currency.clone(),
    })
}
