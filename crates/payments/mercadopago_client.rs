use std::time::Duration;

use anyhow::Result;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

pub const DEFAULT_API_BASE_URL: &str = "https://api.mercadopago.com";

/// Minimal MercadoPago client built on reqwest.
pub struct MercadoPagoClient {
    http: reqwest::Client,
    access_token: String,
    api_base_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PreferenceItem {
    pub id: String,
    pub title: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub currency_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PreferencePayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PreferenceMetadata {
    pub created_by: String,
}

/// Body of `POST /checkout/preferences`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<PreferencePayer>,
    pub back_urls: BackUrls,
    pub auto_return: String,
    pub binary_mode: bool,
    pub statement_descriptor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_url: Option<String>,
    pub external_reference: String,
    pub metadata: PreferenceMetadata,
}

#[derive(Debug, Deserialize)]
struct MercadoPagoErrorBody {
    message: Option<String>,
    error: Option<String>,
    status: Option<Value>,
}

impl MercadoPagoClient {
    pub fn new(access_token: String, api_base_url: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            access_token,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let (mp_error, mp_message, mp_status) =
            match serde_json::from_str::<MercadoPagoErrorBody>(&body) {
                Ok(details) => (details.error, details.message, details.status),
                Err(_) => (None, None, None),
            };

        error!(
            status = %status,
            mp_request_id = ?request_id,
            mp_error = ?mp_error,
            mp_message = ?mp_message,
            mp_status = ?mp_status,
            response_body = %body,
            context = %context,
            "mercadopago api request failed"
        );

        anyhow::bail!(
            "MercadoPago API request failed: {} (status {}, request_id={:?})",
            context,
            status,
            request_id
        );
    }

    /// Creates a checkout preference and returns the raw response body.
    pub async fn create_preference(&self, request: &PreferenceRequest) -> Result<Value> {
        // https://www.mercadopago.com/developers/en/reference/preferences/_checkout_preferences/post
        let resp = self
            .http
            .post(format!("{}/checkout/preferences", self.api_base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header("X-Idempotency-Key", request.external_reference.as_str())
            .json(request)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create preference").await?;

        let body: Value = resp.json().await?;
        Ok(body)
    }

    /// Fetches a charge by its gateway id and returns the raw response body.
    pub async fn get_payment(&self, charge_id: &str) -> Result<Value> {
        // https://www.mercadopago.com/developers/en/reference/payments/_payments_id/get
        let resp = self
            .http
            .get(format!("{}/v1/payments/{}", self.api_base_url, charge_id))
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "get payment").await?;

        let body: Value = resp.json().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn preference_request_omits_missing_optional_fields() {
        let request = PreferenceRequest {
            items: vec![PreferenceItem {
                id: "i-1".to_string(),
                title: "A".to_string(),
                quantity: 2,
                unit_price: 1000.0,
                currency_id: "CLP".to_string(),
            }],
            payer: None,
            back_urls: BackUrls {
                success: "https://shop.example/checkout/success".to_string(),
                failure: "https://shop.example/checkout/failure".to_string(),
                pending: "https://shop.example/checkout/pending".to_string(),
            },
            auto_return: "approved".to_string(),
            binary_mode: false,
            statement_descriptor: "STOREFRONT".to_string(),
            notification_url: None,
            external_reference: "ref-1".to_string(),
            metadata: PreferenceMetadata {
                created_by: "user-1".to_string(),
            },
        };

        let body = serde_json::to_value(&request).unwrap();

        assert!(body.get("payer").is_none());
        assert!(body.get("notification_url").is_none());
        assert_eq!(body["items"][0]["currency_id"], json!("CLP"));
        assert_eq!(body["metadata"]["created_by"], json!("user-1"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = MercadoPagoClient::new(
            "token".to_string(),
            "https://api.example.com///".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(client.api_base_url, "https://api.example.com");
    }
}
