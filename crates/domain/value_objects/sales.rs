use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::sales::{SaleEntity, SaleMetricRow},
    value_objects::{
        enums::{metrics_intervals::MetricsInterval, order_payment_statuses::OrderPaymentStatus},
        line_items::LineItem,
    },
};

pub const ADMIN_SALES_DEFAULT_LIMIT: i64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleModel {
    pub id: Uuid,
    pub preference_id: Option<String>,
    pub payment_id: Option<String>,
    pub user_id: Uuid,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub taxes: f64,
    pub total: f64,
    pub currency: String,
    pub payer_email: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub payment_provider: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SaleEntity> for SaleModel {
    fn from(entity: SaleEntity) -> Self {
        Self {
            id: entity.id,
            preference_id: entity.preference_id,
            payment_id: entity.payment_id,
            user_id: entity.user_id,
            items: entity.items,
            subtotal: entity.subtotal,
            taxes: entity.taxes,
            total: entity.total,
            currency: entity.currency,
            payer_email: entity.payer_email,
            status: entity.status,
            payment_status: entity.payment_status,
            payment_provider: entity.payment_provider,
            notes: entity.notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MySalesQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSalesQuery {
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesFilter {
    pub user_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSaleStatusModel {
    pub status: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
pub struct MetricsRange {
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeSeriesQuery {
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub interval: Option<MetricsInterval>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MetricsOverviewModel {
    pub orders_count: i64,
    pub total_revenue: f64,
    pub paid_orders: i64,
    pub avg_order: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricsPointModel {
    pub bucket: String,
    pub revenue: f64,
    pub count: i64,
}

pub fn metrics_overview(rows: &[SaleMetricRow]) -> MetricsOverviewModel {
    let orders_count = rows.len() as i64;
    let total_revenue: f64 = rows.iter().map(|row| row.total).sum();
    let paid_orders = rows
        .iter()
        .filter(|row| row.payment_status == OrderPaymentStatus::Paid.as_str())
        .count() as i64;

    let avg_order = if orders_count > 0 {
        total_revenue / orders_count as f64
    } else {
        0.0
    };

    MetricsOverviewModel {
        orders_count,
        total_revenue,
        paid_orders,
        avg_order,
    }
}

/// Buckets are labelled in UTC and returned in ascending label order.
pub fn metrics_time_series(
    rows: &[SaleMetricRow],
    interval: MetricsInterval,
) -> Vec<MetricsPointModel> {
    let mut buckets: BTreeMap<String, (f64, i64)> = BTreeMap::new();

    for row in rows {
        let label = row.created_at.format(interval.bucket_format()).to_string();
        let bucket = buckets.entry(label).or_insert((0.0, 0));
        bucket.0 += row.total;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(bucket, (revenue, count))| MetricsPointModel {
            bucket,
            revenue,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn row(y: i32, m: u32, d: u32, total: f64, payment_status: &str) -> SaleMetricRow {
        SaleMetricRow {
            created_at: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            total,
            payment_status: payment_status.to_string(),
        }
    }

    #[test]
    fn overview_of_no_sales_is_zeroed() {
        assert_eq!(metrics_overview(&[]), MetricsOverviewModel::default());
    }

    #[test]
    fn overview_counts_paid_orders_and_averages_revenue() {
        let rows = vec![
            row(2025, 1, 1, 100.0, "paid"),
            row(2025, 1, 2, 300.0, "paid"),
            row(2025, 1, 3, 200.0, "pending"),
        ];

        let overview = metrics_overview(&rows);

        assert_eq!(overview.orders_count, 3);
        assert_eq!(overview.paid_orders, 2);
        assert_eq!(overview.total_revenue, 600.0);
        assert_eq!(overview.avg_order, 200.0);
    }

    #[test]
    fn daily_series_is_sorted_ascending() {
        let rows = vec![
            row(2025, 3, 2, 50.0, "paid"),
            row(2025, 3, 1, 10.0, "paid"),
            row(2025, 3, 2, 25.0, "paid"),
        ];

        let series = metrics_time_series(&rows, MetricsInterval::Day);

        assert_eq!(
            series,
            vec![
                MetricsPointModel { bucket: "2025-03-01".to_string(), revenue: 10.0, count: 1 },
                MetricsPointModel { bucket: "2025-03-02".to_string(), revenue: 75.0, count: 2 },
            ]
        );
    }

    #[test]
    fn weekly_buckets_use_iso_week_year() {
        // 2024-12-30 belongs to ISO week 1 of 2025.
        let rows = vec![row(2024, 12, 30, 10.0, "paid"), row(2025, 1, 2, 5.0, "paid")];

        let series = metrics_time_series(&rows, MetricsInterval::Week);

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].bucket, "2025-01");
        assert_eq!(series[0].count, 2);
    }

    #[test]
    fn monthly_buckets_group_by_month() {
        let rows = vec![row(2025, 1, 31, 1.0, "paid"), row(2025, 2, 1, 2.0, "paid")];

        let buckets: Vec<_> = metrics_time_series(&rows, MetricsInterval::Month)
            .into_iter()
            .map(|point| point.bucket)
            .collect();

        assert_eq!(buckets, vec!["2025-01", "2025-02"]);
    }
}
