//! Entry Form
//!
//! Draft values for a new row. Dates default to today, counters to zero.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::records::{round_liquidity, NewMetricRecord};

/// Unsaved values of the entry form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub metric_date: NaiveDate,
    pub website_visits: u64,
    pub app_downloads: u64,
    pub finished_operations: u64,
    pub liquidity: Decimal,
}

impl EntryDraft {
    /// Defaults: the given day and zeroes
    pub fn new(today: NaiveDate) -> Self {
        Self {
            metric_date: today,
            website_visits: 0,
            app_downloads: 0,
            finished_operations: 0,
            liquidity: Decimal::ZERO,
        }
    }

    /// Insert payload for these values
    pub fn to_new_record(&self) -> NewMetricRecord {
        NewMetricRecord {
            metric_date: self.metric_date,
            website_visits: self.website_visits,
            app_downloads: self.app_downloads,
            finished_operations: self.finished_operations,
            liquidity: round_liquidity(self.liquidity),
        }
    }
}

/// The entry form and its draft
#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    draft: EntryDraft,
}

impl EntryForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            draft: EntryDraft::new(today),
        }
    }

    pub fn draft(&self) -> &EntryDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut EntryDraft {
        &mut self.draft
    }

    /// Replace every field at once
    pub fn fill(&mut self, draft: EntryDraft) {
        self.draft = draft;
    }

    /// Back to defaults after a successful submit
    pub fn reset(&mut self, today: NaiveDate) {
        self.draft = EntryDraft::new(today);
    }
}
