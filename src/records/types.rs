//! Core data types for daily metric rows
//!
//! - `MetricRecord`: a stored row, as returned by the backend
//! - `NewMetricRecord`: insert payload (the backend assigns `id` and `created_at`)
//! - `MetricPatch`: partial update merged server-side by id
//! - `MetricField`: the four editable counters

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque record identifier assigned by the backend.
///
/// Hosted tables use either uuid or bigint keys; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => RecordId(s),
            RawId::Number(n) => RecordId(n.to_string()),
        })
    }
}

/// One stored row of daily business counters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRecord {
    /// Backend-assigned, immutable
    pub id: RecordId,
    /// Backend-assigned at insert time
    pub created_at: DateTime<Utc>,
    /// The day the metrics describe
    pub metric_date: NaiveDate,
    pub website_visits: u64,
    pub app_downloads: u64,
    pub finished_operations: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub liquidity: Decimal,
}

impl MetricRecord {
    /// Current value of an editable field
    pub fn field(&self, field: MetricField) -> FieldValue {
        match field {
            MetricField::WebsiteVisits => FieldValue::Count(self.website_visits),
            MetricField::AppDownloads => FieldValue::Count(self.app_downloads),
            MetricField::FinishedOperations => FieldValue::Count(self.finished_operations),
            MetricField::Liquidity => FieldValue::Amount(self.liquidity),
        }
    }
}

/// Insert payload for a new row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMetricRecord {
    pub metric_date: NaiveDate,
    pub website_visits: u64,
    pub app_downloads: u64,
    pub finished_operations: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub liquidity: Decimal,
}

impl NewMetricRecord {
    /// A zeroed row for the given day
    pub fn zeroed(metric_date: NaiveDate) -> Self {
        Self {
            metric_date,
            website_visits: 0,
            app_downloads: 0,
            finished_operations: 0,
            liquidity: Decimal::ZERO,
        }
    }

    /// Attach backend-assigned identity
    pub fn into_record(self, id: RecordId, created_at: DateTime<Utc>) -> MetricRecord {
        MetricRecord {
            id,
            created_at,
            metric_date: self.metric_date,
            website_visits: self.website_visits,
            app_downloads: self.app_downloads,
            finished_operations: self.finished_operations,
            liquidity: round_liquidity(self.liquidity),
        }
    }
}

/// Partial update; absent fields are left untouched by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetricPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_visits: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_downloads: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_operations: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub liquidity: Option<Decimal>,
}

impl MetricPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.website_visits.is_none()
            && self.app_downloads.is_none()
            && self.finished_operations.is_none()
            && self.liquidity.is_none()
    }

    /// Builder method: set one field
    pub fn with(mut self, field: MetricField, value: FieldValue) -> Self {
        self.set(field, value);
        self
    }

    /// Set one field. Mismatched value kinds are ignored.
    pub fn set(&mut self, field: MetricField, value: FieldValue) {
        match (field, value) {
            (MetricField::WebsiteVisits, FieldValue::Count(v)) => self.website_visits = Some(v),
            (MetricField::AppDownloads, FieldValue::Count(v)) => self.app_downloads = Some(v),
            (MetricField::FinishedOperations, FieldValue::Count(v)) => {
                self.finished_operations = Some(v)
            }
            (MetricField::Liquidity, FieldValue::Amount(v)) => {
                self.liquidity = Some(round_liquidity(v))
            }
            _ => {}
        }
    }

    /// Merge into a record the way the backend does: present fields win
    pub fn apply_to(&self, record: &mut MetricRecord) {
        if let Some(v) = self.website_visits {
            record.website_visits = v;
        }
        if let Some(v) = self.app_downloads {
            record.app_downloads = v;
        }
        if let Some(v) = self.finished_operations {
            record.finished_operations = v;
        }
        if let Some(v) = self.liquidity {
            record.liquidity = round_liquidity(v);
        }
    }
}

/// Editable numeric fields of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricField {
    WebsiteVisits,
    AppDownloads,
    FinishedOperations,
    Liquidity,
}

impl MetricField {
    pub fn all() -> &'static [MetricField] {
        &[
            MetricField::WebsiteVisits,
            MetricField::AppDownloads,
            MetricField::FinishedOperations,
            MetricField::Liquidity,
        ]
    }

    /// Column name in the `daily_metrics` table
    pub fn column(&self) -> &'static str {
        match self {
            MetricField::WebsiteVisits => "website_visits",
            MetricField::AppDownloads => "app_downloads",
            MetricField::FinishedOperations => "finished_operations",
            MetricField::Liquidity => "liquidity",
        }
    }

    /// Parse user input for this field
    pub fn parse(&self, input: &str) -> Option<FieldValue> {
        let input = input.trim();
        match self {
            MetricField::Liquidity => input.parse::<Decimal>().ok().map(FieldValue::Amount),
            _ => input.parse::<u64>().ok().map(FieldValue::Count),
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Value of an editable field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Count(u64),
    Amount(Decimal),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Count(v) => write!(f, "{}", v),
            FieldValue::Amount(v) => write!(f, "{:.2}", v),
        }
    }
}

/// Round a liquidity amount to cents
pub fn round_liquidity(value: Decimal) -> Decimal {
    value.round_dp(2)
}
