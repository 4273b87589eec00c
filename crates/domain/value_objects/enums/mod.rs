pub mod metrics_intervals;
pub mod order_payment_statuses;
pub mod payment_providers;
pub mod payment_statuses;
pub mod roles;
pub mod sale_statuses;
