use std::{collections::HashMap, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::{
            payments::PaymentRepository, purchases::PurchaseRepository, sales::SaleRepository,
        },
        value_objects::{
            pagination::Paged,
            payments::{
                ConfirmPaymentQuery, CreatePreferenceModel, ListPaymentsQuery, PaymentModel,
                PreferenceCreatedModel, ReconcileOutcome, UpdatePaymentModel, WebhookAckModel,
            },
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            payments::PaymentPostgres, purchases::PurchasePostgres, sales::SalePostgres,
        },
    },
    payments::mercadopago_client::MercadoPagoClient,
};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::ApiResponse,
    config::config_model::DotEnvyConfig,
    usecases::{
        UseCaseError,
        payments::{PaymentGateway, PaymentSettings, PaymentUseCase},
    },
};

type PaymentState<P, S, Pu, G> = State<Arc<PaymentUseCase<P, S, Pu, G>>>;

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Result<Router> {
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));
    let sale_repository = SalePostgres::new(Arc::clone(&db_pool));
    let purchase_repository = PurchasePostgres::new(Arc::clone(&db_pool));

    // The token is checked when a preference is built, so a missing one only
    // disables checkout.
    let gateway = MercadoPagoClient::new(
        config.mercadopago.access_token.clone().unwrap_or_default(),
        config.mercadopago.api_base_url.clone(),
        Duration::from_secs(config.mercadopago.timeout_secs),
    )?;

    let payment_usecase = PaymentUseCase::new(
        Arc::new(payment_repository),
        Arc::new(sale_repository),
        Arc::new(purchase_repository),
        Arc::new(gateway),
        PaymentSettings::from_config(&config),
    );

    Ok(Router::new()
        .route("/create-preference", post(create_preference))
        .route("/webhook", post(webhook))
        .route("/confirm", get(confirm))
        .route("/", get(list))
        .route("/:payment_id", get(get_payment).patch(update))
        .with_state(Arc::new(payment_usecase)))
}

pub async fn create_preference<P, S, Pu, G>(
    State(payment_usecase): PaymentState<P, S, Pu, G>,
    auth: AuthUser,
    WithRejection(Json(model), _): WithRejection<Json<CreatePreferenceModel>, UseCaseError>,
) -> Result<ApiResponse<PreferenceCreatedModel>, UseCaseError>
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SaleRepository + Send + Sync + 'static,
    Pu: PurchaseRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let created = payment_usecase
        .create_preference(auth.user_id, model)
        .await?;

    Ok(ApiResponse::created(created))
}

/// Always answers 200 so the gateway stops retrying; malformed input is
/// treated as empty.
pub async fn webhook<P, S, Pu, G>(
    State(payment_usecase): PaymentState<P, S, Pu, G>,
    RawQuery(raw_query): RawQuery,
    body: Bytes,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SaleRepository + Send + Sync + 'static,
    Pu: PurchaseRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let query = webhook_query(raw_query);
    let body = webhook_body(&body);

    let ack: WebhookAckModel = payment_usecase.process_webhook(query, body).await;
    info!(
        outcome = ack.outcome,
        has_payment = ack.payment.is_some(),
        "payments router: webhook acknowledged"
    );

    ApiResponse::new(StatusCode::OK, ack.message, ack)
}

fn webhook_query(raw_query: Option<String>) -> HashMap<String, String> {
    raw_query
        .map(|raw| {
            url::form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

/// Empty or invalid JSON reads as `Null`.
fn webhook_body(body: &Bytes) -> Value {
    if body.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(body).unwrap_or_else(|err| {
        warn!(error = %err, "payments router: webhook body is not valid JSON");
        Value::Null
    })
}

pub async fn confirm<P, S, Pu, G>(
    State(payment_usecase): PaymentState<P, S, Pu, G>,
    WithRejection(Query(query), _): WithRejection<Query<ConfirmPaymentQuery>, UseCaseError>,
) -> Result<ApiResponse<ReconcileOutcome>, UseCaseError>
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SaleRepository + Send + Sync + 'static,
    Pu: PurchaseRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let outcome = payment_usecase.confirm_from_return(query).await?;

    Ok(ApiResponse::ok(outcome))
}

pub async fn list<P, S, Pu, G>(
    State(payment_usecase): PaymentState<P, S, Pu, G>,
    auth: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<ListPaymentsQuery>, UseCaseError>,
) -> Result<ApiResponse<Paged<PaymentModel>>, UseCaseError>
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SaleRepository + Send + Sync + 'static,
    Pu: PurchaseRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(payment_usecase.list(query).await?))
}

pub async fn get_payment<P, S, Pu, G>(
    State(payment_usecase): PaymentState<P, S, Pu, G>,
    auth: AuthUser,
    WithRejection(Path(payment_id), _): WithRejection<Path<Uuid>, UseCaseError>,
) -> Result<ApiResponse<PaymentModel>, UseCaseError>
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SaleRepository + Send + Sync + 'static,
    Pu: PurchaseRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    auth.require_admin()?;

    Ok(ApiResponse::ok(payment_usecase.get(payment_id).await?))
}

pub async fn update<P, S, Pu, G>(
    State(payment_usecase): PaymentState<P, S, Pu, G>,
    auth: AuthUser,
    WithRejection(Path(payment_id), _): WithRejection<Path<Uuid>, UseCaseError>,
    WithRejection(Json(model), _): WithRejection<Json<UpdatePaymentModel>, UseCaseError>,
) -> Result<ApiResponse<PaymentModel>, UseCaseError>
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SaleRepository + Send + Sync + 'static,
    Pu: PurchaseRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    auth.require_admin()?;

    let payment = payment_usecase
        .update(payment_id, auth.user_id, model)
        .await?;

    Ok(ApiResponse::ok(payment))
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, response::Response};
    use crates::domain::repositories::{
        payments::MockPaymentRepository, purchases::MockPurchaseRepository,
        sales::MockSaleRepository,
    };

    use super::*;
    use crate::usecases::payments::MockPaymentGateway;

    type TestUseCase = PaymentUseCase<
        MockPaymentRepository,
        MockSaleRepository,
        MockPurchaseRepository,
        MockPaymentGateway,
    >;

    fn usecase(gateway: MockPaymentGateway) -> Arc<TestUseCase> {
        Arc::new(PaymentUseCase::new(
            Arc::new(MockPaymentRepository::new()),
            Arc::new(MockSaleRepository::new()),
            Arc::new(MockPurchaseRepository::new()),
            Arc::new(gateway),
            PaymentSettings {
                access_token: Some("TEST-token".to_string()),
                front_url: Some("https://shop.example".to_string()),
                base_url: None,
                sandbox: false,
                statement_descriptor: "STOREFRONT".to_string(),
            },
        ))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn webhook_input_is_parsed_leniently() {
        let query = webhook_query(Some("data.id=123&type=payment".to_string()));
        assert_eq!(query.get("data.id").map(String::as_str), Some("123"));
        assert!(webhook_query(None).is_empty());

        assert_eq!(webhook_body(&Bytes::new()), Value::Null);
        assert_eq!(webhook_body(&Bytes::from_static(b"<xml/>")), Value::Null);
        assert_eq!(
            webhook_body(&Bytes::from_static(br#"{"data":{"id":9}}"#))["data"]["id"],
            9
        );
    }

    #[tokio::test]
    async fn non_json_webhook_body_is_acknowledged() {
        for body in [Bytes::new(), Bytes::from_static(b"not json {")] {
            let response = webhook(State(usecase(MockPaymentGateway::new())), RawQuery(None), body)
                .await
                .into_response();
            assert_eq!(response.status(), StatusCode::OK);

            let body = body_json(response).await;
            assert_eq!(body["code"], 200);
            assert_eq!(body["message"], "Webhook received: no payment id");
            assert_eq!(body["data"]["received"], true);
            assert_eq!(body["data"]["outcome"], "no_payment_id");
        }
    }

    #[tokio::test]
    async fn webhook_gateway_failure_still_answers_ok() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_get_payment()
            .withf(|charge_id| charge_id == "77")
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("gateway down")));

        let response = webhook(
            State(usecase(gateway)),
            RawQuery(Some("data.id=77".to_string())),
            Bytes::from_static(b"garbage"),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["outcome"], "failed");
    }
}
