//! Metrics Table
//!
//! Rows for the viewed day, newest first, each either viewed or edited.
//! At most one row is edited at a time: the edit session lives in a single
//! `Option`, and replacing it reports which row's draft was discarded.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::records::{FieldValue, MetricField, MetricPatch, MetricRecord, RecordId};

/// In-progress edit of one row
#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    original: MetricRecord,
    values: MetricRecord,
    touched: BTreeSet<MetricField>,
}

impl EditDraft {
    /// Seed the draft with the record's current values
    pub fn seed(record: &MetricRecord) -> Self {
        Self {
            original: record.clone(),
            values: record.clone(),
            touched: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.original.id
    }

    pub fn value(&self, field: MetricField) -> FieldValue {
        self.values.field(field)
    }

    /// Record an edit. Mismatched value kinds are ignored.
    pub fn set(&mut self, field: MetricField, value: FieldValue) {
        let mut single = MetricPatch::new();
        single.set(field, value);
        if single.is_empty() {
            return;
        }
        single.apply_to(&mut self.values);
        self.touched.insert(field);
    }

    pub fn touched(&self) -> impl Iterator<Item = &MetricField> {
        self.touched.iter()
    }

    /// Partial update carrying only the fields that were edited
    pub fn patch(&self) -> MetricPatch {
        self.touched
            .iter()
            .fold(MetricPatch::new(), |patch, field| {
                patch.with(*field, self.values.field(*field))
            })
    }
}

/// Display state of one row
#[derive(Debug, Clone, PartialEq)]
pub enum RowState {
    Viewing,
    Editing(EditDraft),
}

/// A row as the renderer sees it
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub record: MetricRecord,
    pub state: RowState,
}

/// Outcome of entering edit state
#[derive(Debug, Clone, PartialEq)]
pub enum EditTransition {
    /// No other row was being edited
    Started,
    /// The same row was already being edited; its draft is kept
    AlreadyEditing,
    /// Another row's draft was discarded
    Replaced { discarded: RecordId },
    /// No displayed row has that id
    UnknownRow,
}

/// Rows of the viewed day plus the single edit session
#[derive(Debug, Clone, Default)]
pub struct MetricsTable {
    records: Vec<MetricRecord>,
    editing: Option<EditDraft>,
}

impl MetricsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace rows with a fresh fetch result. An edit session survives
    /// only if its row is still present.
    pub fn replace(&mut self, mut records: Vec<MetricRecord>) {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(draft) = &self.editing {
            if !records.iter().any(|r| &r.id == draft.id()) {
                tracing::debug!(id = %draft.id(), "Edited row vanished after refresh");
                self.editing = None;
            }
        }
        self.records = records;
    }

    /// Drop rows that belong to another day, returning how many went
    pub fn retain_date(&mut self, date: NaiveDate) -> usize {
        let before = self.records.len();
        let kept: Vec<MetricRecord> = self
            .records
            .drain(..)
            .filter(|r| r.metric_date == date)
            .collect();
        self.replace(kept);
        before - self.records.len()
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: &RecordId) -> Option<&MetricRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut EditDraft> {
        self.editing.as_mut()
    }

    pub fn begin_edit(&mut self, id: &RecordId) -> EditTransition {
        let Some(record) = self.find(id) else {
            return EditTransition::UnknownRow;
        };
        let draft = EditDraft::seed(record);

        match self.editing.replace(draft) {
            None => EditTransition::Started,
            Some(previous) if previous.id() == id => {
                self.editing = Some(previous);
                EditTransition::AlreadyEditing
            }
            Some(previous) => EditTransition::Replaced {
                discarded: previous.id().clone(),
            },
        }
    }

    /// Leave edit state, returning the discarded draft
    pub fn cancel_edit(&mut self) -> Option<EditDraft> {
        self.editing.take()
    }

    pub fn rows(&self) -> Vec<RowView> {
        self.records
            .iter()
            .map(|record| {
                let state = match &self.editing {
                    Some(draft) if draft.id() == &record.id => RowState::Editing(draft.clone()),
                    _ => RowState::Viewing,
                };
                RowView {
                    record: record.clone(),
                    state,
                }
            })
            .collect()
    }
}
