use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const DEFAULT_CURRENCY: &str = "CLP";
pub const DEFAULT_ITEM_TITLE: &str = "Item";

/// Normalized line of a checkout. Stored as JSONB on payments, sales and purchases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<Uuid>,
    pub title: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub currency: String,
}

/// Line as submitted by a client. Every field is optional and gets normalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItemInput {
    #[serde(default)]
    pub item_id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl LineItemInput {
    pub fn normalize(&self) -> LineItem {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(DEFAULT_ITEM_TITLE)
            .to_string();

        let quantity = self
            .quantity
            .unwrap_or(1)
            .clamp(1, i32::MAX as i64) as i32;

        let unit_price = self
            .unit_price
            .filter(|price| price.is_finite())
            .unwrap_or(0.0)
            .max(0.0);

        let currency = self
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|currency| !currency.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_uppercase();

        LineItem {
            item_id: self.item_id,
            title,
            quantity,
            unit_price,
            currency,
        }
    }
}

/// Numbers or numeric strings. Anything else is treated as absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };

    Ok(number.filter(|number| number.is_finite()))
}

/// Fractional quantities are floored.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.map(|quantity| quantity.floor() as i64))
}

pub fn normalize_line_items(inputs: &[LineItemInput]) -> Vec<LineItem> {
    inputs.iter().map(LineItemInput::normalize).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItemTotals {
    pub amount: f64,
    pub currency: String,
}

/// Sum of quantity x unit price. Currency is taken from the first line.
pub fn compute_totals(items: &[LineItem]) -> LineItemTotals {
    let amount = items
        .iter()
        .map(|item| item.quantity as f64 * item.unit_price)
        .sum();

    let currency = items
        .first()
        .map(|item| item.currency.clone())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    LineItemTotals { amount, currency }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, quantity: i64, unit_price: f64) -> LineItemInput {
        LineItemInput {
            title: Some(title.to_string()),
            quantity: Some(quantity),
            unit_price: Some(unit_price),
            ..Default::default()
        }
    }

    #[test]
    fn totals_sum_quantity_times_price() {
        let items = normalize_line_items(&[input("A", 2, 1000.0), input("B", 1, 500.0)]);
        let totals = compute_totals(&items);

        assert_eq!(totals.amount, 2500.0);
        assert_eq!(totals.currency, "CLP");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let item = LineItemInput::default().normalize();

        assert_eq!(item.title, "Item");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price, 0.0);
        assert_eq!(item.currency, "CLP");
    }

    #[test]
    fn quantity_and_price_are_clamped() {
        let item = input("Widget", -4, -10.0).normalize();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price, 0.0);

        let item = input("Widget", 0, f64::NAN).normalize();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price, 0.0);
    }

    #[test]
    fn numeric_strings_and_fractions_are_coerced() {
        let fractional: LineItemInput = serde_json::from_value(serde_json::json!({
            "title": "A",
            "quantity": 1.5,
            "unit_price": 1000
        }))
        .unwrap();
        assert_eq!(fractional.normalize().quantity, 1);

        let strings: LineItemInput = serde_json::from_value(serde_json::json!({
            "title": "B",
            "quantity": "2",
            "unit_price": "1000"
        }))
        .unwrap();
        let item = strings.normalize();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price, 1000.0);

        let garbage: LineItemInput = serde_json::from_value(serde_json::json!({
            "quantity": "many",
            "unit_price": null
        }))
        .unwrap();
        let item = garbage.normalize();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price, 0.0);
    }

    #[test]
    fn currency_comes_from_first_line() {
        let mut first = input("A", 1, 10.0);
        first.currency = Some("usd".to_string());
        let items = normalize_line_items(&[first, input("B", 1, 5.0)]);

        assert_eq!(compute_totals(&items).currency, "USD");
    }

    #[test]
    fn empty_cart_totals_zero() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.amount, 0.0);
        assert_eq!(totals.currency, DEFAULT_CURRENCY);
    }
}
