//! Daily metric records
//!
//! Row types shared by the backend, the dashboard and the CLI.

mod types;

pub use types::{
    round_liquidity, FieldValue, MetricField, MetricPatch, MetricRecord, NewMetricRecord, RecordId,
};
