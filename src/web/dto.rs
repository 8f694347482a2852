//! Form and query payloads
//!
//! Fields arrive as strings from HTML forms and are parsed explicitly so a
//! bad value yields a validation error naming the field.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{WebError, WebResult};
use crate::dashboard::EntryDraft;
use crate::records::{FieldValue, MetricField, MetricRecord};

/// POST /navigate
#[derive(Debug, Deserialize)]
pub struct NavigateForm {
    pub days: i64,
}

/// POST /entries
#[derive(Debug, Deserialize)]
pub struct EntryForm {
    pub metric_date: String,
    pub website_visits: String,
    pub app_downloads: String,
    pub finished_operations: String,
    pub liquidity: String,
}

impl EntryForm {
    pub fn to_draft(&self) -> WebResult<EntryDraft> {
        let metric_date = parse_date(&self.metric_date)?;
        Ok(EntryDraft {
            metric_date,
            website_visits: parse_count(MetricField::WebsiteVisits, &self.website_visits)?,
            app_downloads: parse_count(MetricField::AppDownloads, &self.app_downloads)?,
            finished_operations: parse_count(
                MetricField::FinishedOperations,
                &self.finished_operations,
            )?,
            liquidity: parse_amount(&self.liquidity)?,
        })
    }
}

/// POST /rows/:id/save
#[derive(Debug, Deserialize)]
pub struct RowEditForm {
    pub website_visits: String,
    pub app_downloads: String,
    pub finished_operations: String,
    pub liquidity: String,
}

impl RowEditForm {
    /// Parsed values for every editable field
    pub fn values(&self) -> WebResult<Vec<(MetricField, FieldValue)>> {
        MetricField::all()
            .iter()
            .map(|field| {
                let raw = match field {
                    MetricField::WebsiteVisits => &self.website_visits,
                    MetricField::AppDownloads => &self.app_downloads,
                    MetricField::FinishedOperations => &self.finished_operations,
                    MetricField::Liquidity => &self.liquidity,
                };
                field
                    .parse(raw)
                    .map(|value| (*field, value))
                    .ok_or_else(|| invalid(*field, raw))
            })
            .collect()
    }
}

/// POST /rows/:id/delete
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirmed: bool,
}

/// POST /language
#[derive(Debug, Deserialize)]
pub struct LanguageForm {
    pub lang: String,
}

/// GET /api/v1/records
#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub date: String,
}

/// GET /api/v1/records response
#[derive(Debug, Serialize)]
pub struct RecordListResponse {
    pub date: NaiveDate,
    pub total: usize,
    pub records: Vec<MetricRecord>,
}

/// GET /health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub backend_kind: String,
    pub uptime_seconds: u64,
    pub version: String,
}

pub fn parse_date(raw: &str) -> WebResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| WebError::Validation(format!("Invalid date: {:?}", raw)))
}

fn parse_count(field: MetricField, raw: &str) -> WebResult<u64> {
    match field.parse(raw) {
        Some(FieldValue::Count(v)) => Ok(v),
        _ => Err(invalid(field, raw)),
    }
}

fn parse_amount(raw: &str) -> WebResult<Decimal> {
    match MetricField::Liquidity.parse(raw) {
        Some(FieldValue::Amount(v)) => Ok(v),
        _ => Err(invalid(MetricField::Liquidity, raw)),
    }
}

fn invalid(field: MetricField, raw: &str) -> WebError {
    WebError::Validation(format!("Invalid value for {}: {:?}", field, raw))
}
