//! In-process metrics table
//!
//! Behaves like the hosted table: assigns ids and `created_at`, orders by
//! `created_at` descending, merges partial updates. Used for offline runs
//! and tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::VecDeque;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BackendError, BackendResult, MetricsBackend};
use crate::records::{MetricPatch, MetricRecord, NewMetricRecord, RecordId};

/// Operation kinds, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Insert,
    Update,
    Delete,
}

#[derive(Default)]
struct Table {
    rows: Vec<MetricRecord>,
    last_created: Option<DateTime<Utc>>,
    failures: VecDeque<Operation>,
    calls: usize,
}

impl Table {
    /// Strictly increasing creation timestamps, so ordering is total
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let created = match self.last_created {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created = Some(created);
        created
    }

    fn check(&mut self, op: Operation) -> BackendResult<()> {
        self.calls += 1;
        if self.failures.front() == Some(&op) {
            self.failures.pop_front();
            return Err(BackendError::Injected(format!("{:?}", op)));
        }
        Ok(())
    }
}

/// In-memory `daily_metrics` table
#[derive(Default)]
pub struct InMemoryBackend {
    table: RwLock<Table>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of kind `op` fail
    pub async fn fail_next(&self, op: Operation) {
        self.table.write().await.failures.push_back(op);
    }

    /// Number of backend calls issued so far (including failed ones)
    pub async fn call_count(&self) -> usize {
        self.table.read().await.calls
    }

    /// Total rows across all dates
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MetricsBackend for InMemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_by_date(&self, date: NaiveDate) -> BackendResult<Vec<MetricRecord>> {
        let mut table = self.table.write().await;
        table.check(Operation::Fetch)?;

        let mut rows: Vec<MetricRecord> = table
            .rows
            .iter()
            .filter(|r| r.metric_date == date)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, record: NewMetricRecord) -> BackendResult<MetricRecord> {
        let mut table = self.table.write().await;
        table.check(Operation::Insert)?;

        let created_at = table.next_created_at();
        let stored = record.into_record(RecordId::new(Uuid::new_v4().to_string()), created_at);
        table.rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &RecordId, patch: &MetricPatch) -> BackendResult<MetricRecord> {
        let mut table = self.table.write().await;
        table.check(Operation::Update)?;

        let row = table
            .rows
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| BackendError::NotFound(id.to_string()))?;
        patch.apply_to(row);
        Ok(row.clone())
    }

    async fn delete(&self, id: &RecordId) -> BackendResult<()> {
        let mut table = self.table.write().await;
        table.check(Operation::Delete)?;

        let before = table.rows.len();
        table.rows.retain(|r| &r.id != id);
        if table.rows.len() == before {
            return Err(BackendError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
