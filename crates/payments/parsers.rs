//! Readers for the loosely shaped JSON the gateway returns. Each lookup tries a
//! fixed list of locations in order and takes the first usable value.

use std::collections::HashMap;

use serde_json::Value;

/// A string that is not blank, or a number rendered as a string.
pub fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_id(root: &Value, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|path| {
        path.iter()
            .try_fold(root, |node, key| node.get(key))
            .and_then(value_as_id)
    })
}

/// Preference id of a create-preference response: `id`, `body.id`, `response.id`.
pub fn preference_id_from_response(response: &Value) -> Option<String> {
    first_id(response, &[&["id"], &["body", "id"], &["response", "id"]])
}

/// Redirect URL of a create-preference response: `init_point`, `body.init_point`,
/// `response.init_point`, then the sandbox URL. In sandbox mode the sandbox URL
/// is tried first.
pub fn redirect_url_from_response(response: &Value, sandbox: bool) -> Option<String> {
    let sandbox_paths: [&[&str]; 3] = [
        &["sandbox_init_point"],
        &["body", "sandbox_init_point"],
        &["response", "sandbox_init_point"],
    ];
    let live_paths: [&[&str]; 3] = [
        &["init_point"],
        &["body", "init_point"],
        &["response", "init_point"],
    ];

    if sandbox {
        first_id(response, &sandbox_paths).or_else(|| first_id(response, &live_paths))
    } else {
        first_id(response, &live_paths).or_else(|| first_id(response, &sandbox_paths))
    }
}

/// Charge id of a webhook delivery: `query["data.id"]`, `body.data.id`, `body.id`.
pub fn charge_id_from_notification(query: &HashMap<String, String>, body: &Value) -> Option<String> {
    query
        .get("data.id")
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| first_id(body, &[&["data", "id"], &["id"]]))
}

/// Notification topic, for logging only.
pub fn topic_from_notification(query: &HashMap<String, String>, body: &Value) -> Option<String> {
    query
        .get("topic")
        .or_else(|| query.get("type"))
        .cloned()
        .or_else(|| body.get("type").and_then(Value::as_str).map(str::to_string))
}

/// The fields of a gateway charge that reconciliation reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayCharge {
    pub id: Option<String>,
    pub status: Option<String>,
    pub preference_id: Option<String>,
    pub payer_email: Option<String>,
}

impl GatewayCharge {
    /// Preference id is read from `preference_id`, `order.id`, `metadata.preference_id`.
    pub fn from_value(charge: &Value) -> Self {
        Self {
            id: charge.get("id").and_then(value_as_id),
            status: charge
                .get("status")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|status| !status.is_empty())
                .map(str::to_string),
            preference_id: first_id(
                charge,
                &[&["preference_id"], &["order", "id"], &["metadata", "preference_id"]],
            ),
            payer_email: charge
                .get("payer")
                .and_then(|payer| payer.get("email"))
                .and_then(Value::as_str)
                .map(|email| email.trim().to_lowercase())
                .filter(|email| !email.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn preference_id_falls_back_through_wrappers() {
        assert_eq!(preference_id_from_response(&json!({"id": "p-1"})), Some("p-1".into()));
        assert_eq!(
            preference_id_from_response(&json!({"body": {"id": "p-2"}})),
            Some("p-2".into())
        );
        assert_eq!(
            preference_id_from_response(&json!({"id": "", "response": {"id": "p-3"}})),
            Some("p-3".into())
        );
        assert_eq!(preference_id_from_response(&json!({"other": 1})), None);
    }

    #[test]
    fn redirect_prefers_live_url_outside_sandbox() {
        let response = json!({
            "init_point": "https://live.example/checkout",
            "sandbox_init_point": "https://sandbox.example/checkout"
        });

        assert_eq!(
            redirect_url_from_response(&response, false).as_deref(),
            Some("https://live.example/checkout")
        );
        assert_eq!(
            redirect_url_from_response(&response, true).as_deref(),
            Some("https://sandbox.example/checkout")
        );
    }

    #[test]
    fn redirect_uses_sandbox_url_when_it_is_the_only_one() {
        let response = json!({"body": {"sandbox_init_point": "https://sandbox.example/c"}});
        assert_eq!(
            redirect_url_from_response(&response, false).as_deref(),
            Some("https://sandbox.example/c")
        );
    }

    #[test]
    fn charge_id_prefers_query_then_body() {
        let mut query = HashMap::new();
        query.insert("data.id".to_string(), "111".to_string());
        let body = json!({"data": {"id": "222"}, "id": 333});

        assert_eq!(charge_id_from_notification(&query, &body), Some("111".into()));
        assert_eq!(charge_id_from_notification(&HashMap::new(), &body), Some("222".into()));
        assert_eq!(
            charge_id_from_notification(&HashMap::new(), &json!({"id": 333})),
            Some("333".into())
        );
    }

    #[test]
    fn charge_id_is_absent_for_malformed_payloads() {
        let empty = HashMap::new();
        for body in [
            Value::Null,
            json!({}),
            json!({"data": {"id": null}}),
            json!({"data": "x"}),
            json!({"id": {"nested": true}}),
            json!([1, 2, 3]),
        ] {
            assert_eq!(charge_id_from_notification(&empty, &body), None, "{body}");
        }
    }

    #[test]
    fn charge_reads_preference_id_fallbacks() {
        let charge = GatewayCharge::from_value(&json!({
            "id": 987,
            "status": "approved",
            "order": {"id": 55},
            "metadata": {"preference_id": "meta-pref"},
            "payer": {"email": " Buyer@Mail.COM "}
        }));

        assert_eq!(charge.id.as_deref(), Some("987"));
        assert_eq!(charge.status.as_deref(), Some("approved"));
        assert_eq!(charge.preference_id.as_deref(), Some("55"));
        assert_eq!(charge.payer_email.as_deref(), Some("buyer@mail.com"));

        let charge = GatewayCharge::from_value(&json!({
            "metadata": {"preference_id": "meta-pref"}
        }));
        assert_eq!(charge.preference_id.as_deref(), Some("meta-pref"));
    }

    #[test]
    fn topic_comes_from_query_or_body() {
        let mut query = HashMap::new();
        query.insert("type".to_string(), "payment".to_string());
        assert_eq!(topic_from_notification(&query, &Value::Null), Some("payment".into()));
        assert_eq!(
            topic_from_notification(&HashMap::new(), &json!({"type": "merchant_order"})),
            Some("merchant_order".into())
        );
    }
}
