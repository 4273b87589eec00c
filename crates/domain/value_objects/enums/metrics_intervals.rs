use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MetricsInterval {
    #[default]
    Day,
    Week,
    Month,
}

impl MetricsInterval {
    /// chrono format string used to label a bucket. Weeks use ISO week-numbering years.
    pub fn bucket_format(&self) -> &'static str {
        match self {
            MetricsInterval::Day => "%Y-%m-%d",
            MetricsInterval::Week => "%G-%V",
            MetricsInterval::Month => "%Y-%m",
        }
    }
}
