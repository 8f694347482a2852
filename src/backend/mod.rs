//! Metrics Backend
//!
//! The remote tabular store holding the `daily_metrics` collection.
//!
//! ## Operations
//!
//! - **query**: rows whose `metric_date` equals a day, newest `created_at` first
//! - **insert**: one row without `id`/`created_at`; the backend assigns both
//! - **update**: partial field set merged into the row with the given id
//! - **delete**: remove the row with the given id
//!
//! [`RestBackend`] talks to a hosted PostgREST endpoint; [`InMemoryBackend`]
//! keeps rows in process for offline use and tests.

mod error;
mod memory;
mod rest;

pub use error::{BackendError, BackendResult};
pub use memory::{InMemoryBackend, Operation};
pub use rest::{RestBackend, RestConfig};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::records::{MetricPatch, MetricRecord, NewMetricRecord, RecordId};

/// Common trait for metric stores
#[async_trait]
pub trait MetricsBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// All rows for a day, ordered by `created_at` descending
    async fn fetch_by_date(&self, date: NaiveDate) -> BackendResult<Vec<MetricRecord>>;

    /// Insert one row and return it with its assigned identity
    async fn insert(&self, record: NewMetricRecord) -> BackendResult<MetricRecord>;

    /// Merge a partial update into the row with `id`
    async fn update(&self, id: &RecordId, patch: &MetricPatch) -> BackendResult<MetricRecord>;

    /// Remove the row with `id`
    async fn delete(&self, id: &RecordId) -> BackendResult<()>;
}
