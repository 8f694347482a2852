//! Dashboard View
//!
//! Ties the date cursor, entry form and metrics table to a backend.
//! Backend failures are logged and reported as [`ActionOutcome::Failed`] /
//! [`FetchOutcome::Failed`]; they never surface as errors.

use chrono::NaiveDate;
use std::sync::Arc;

use super::cursor::DateCursor;
use super::effects::{PageMeta, PresentationHook, TracingHook};
use super::form::{EntryDraft, EntryForm};
use super::table::{EditTransition, MetricsTable, RowView};
use crate::backend::{BackendResult, MetricsBackend};
use crate::i18n::{Language, TextKey};
use crate::records::{FieldValue, MetricField, MetricRecord, RecordId};

/// Source of "today"
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Today in the local timezone
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Interactive confirmation gate for destructive actions
pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// An answer collected before the call
impl Confirmation for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}

/// Dashboard behaviour switches
#[derive(Debug, Clone, Default)]
pub struct DashboardOptions {
    pub language: Language,
    /// Move the cursor to a submitted row's date when it differs
    pub follow_submitted_date: bool,
}

/// Identifies one in-flight fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub date: NaiveDate,
    pub seq: u64,
}

/// What happened to a fetch result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Rows replaced the table
    Applied(usize),
    /// The cursor moved on or a newer fetch already landed
    Stale,
    /// The backend call failed
    Failed,
}

/// Result of a user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// Nothing was sent (declined confirmation, no edit in progress, no changes)
    Skipped,
    Failed,
}

/// Snapshot of everything a renderer needs
#[derive(Debug, Clone)]
pub struct DashboardPage {
    pub meta: PageMeta,
    pub form: EntryDraft,
    pub rows: Vec<RowView>,
}

/// The single-page dashboard
pub struct Dashboard {
    backend: Arc<dyn MetricsBackend>,
    hook: Arc<dyn PresentationHook>,
    clock: Clock,
    cursor: DateCursor,
    form: EntryForm,
    table: MetricsTable,
    language: Language,
    follow_submitted_date: bool,
    issued_seq: u64,
    applied_seq: u64,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn MetricsBackend>, options: DashboardOptions) -> Self {
        let today = local_today();
        Self {
            backend,
            hook: Arc::new(TracingHook),
            clock: Arc::new(local_today),
            cursor: DateCursor::new(today),
            form: EntryForm::new(today),
            table: MetricsTable::new(),
            language: options.language,
            follow_submitted_date: options.follow_submitted_date,
            issued_seq: 0,
            applied_seq: 0,
        }
    }

    /// Builder method: replace the presentation hook
    pub fn with_hook(mut self, hook: Arc<dyn PresentationHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Builder method: replace the clock; cursor and form restart at its today
    pub fn with_clock(mut self, clock: Clock) -> Self {
        let today = clock();
        self.cursor = DateCursor::new(today);
        self.form = EntryForm::new(today);
        self.clock = clock;
        self
    }

    pub fn backend(&self) -> Arc<dyn MetricsBackend> {
        Arc::clone(&self.backend)
    }

    pub fn date(&self) -> NaiveDate {
        self.cursor.date()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EntryForm {
        &mut self.form
    }

    pub fn table(&self) -> &MetricsTable {
        &self.table
    }

    pub fn meta(&self) -> PageMeta {
        PageMeta::new(self.language, self.cursor.date())
    }

    pub fn page(&self) -> DashboardPage {
        DashboardPage {
            meta: self.meta(),
            form: self.form.draft().clone(),
            rows: self.table.rows(),
        }
    }

    fn publish(&self) {
        self.hook.apply(&self.meta());
    }

    // ---------- fetching ----------

    /// Initial render: publish presentation state and fetch today
    pub async fn load(&mut self) -> FetchOutcome {
        self.publish();
        self.refresh().await
    }

    /// Start a fetch for the current date
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued_seq += 1;
        FetchTicket {
            date: self.cursor.date(),
            seq: self.issued_seq,
        }
    }

    /// Apply a fetch result unless it is out of date
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: BackendResult<Vec<MetricRecord>>,
    ) -> FetchOutcome {
        let rows = match result {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(date = %ticket.date, error = %e, "Error fetching daily metrics");
                // Rows of the previous day must not show under the new one
                if ticket.date == self.cursor.date() {
                    let dropped = self.table.retain_date(ticket.date);
                    if dropped > 0 {
                        tracing::debug!(date = %ticket.date, dropped, "Cleared rows of another day");
                    }
                }
                return FetchOutcome::Failed;
            }
        };

        if ticket.date != self.cursor.date() || ticket.seq <= self.applied_seq {
            tracing::debug!(
                requested = %ticket.date,
                current = %self.cursor.date(),
                seq = ticket.seq,
                "Discarding stale fetch result"
            );
            return FetchOutcome::Stale;
        }

        let count = rows.len();
        self.table.replace(rows);
        self.applied_seq = ticket.seq;
        FetchOutcome::Applied(count)
    }

    /// Fetch and apply rows for the current date
    pub async fn refresh(&mut self) -> FetchOutcome {
        let ticket = self.begin_fetch();
        let result = self.backend.fetch_by_date(ticket.date).await;
        self.complete_fetch(ticket, result)
    }

    // ---------- date cursor ----------

    /// Move the cursor without fetching; the caller runs the returned fetch
    pub fn shift_cursor(&mut self, days: i64) -> FetchTicket {
        self.cursor.shift(days);
        self.publish();
        self.begin_fetch()
    }

    /// Point the cursor at a date without fetching
    pub fn set_cursor(&mut self, date: NaiveDate) -> FetchTicket {
        self.cursor.set(date);
        self.publish();
        self.begin_fetch()
    }

    pub async fn shift(&mut self, days: i64) -> FetchOutcome {
        let ticket = self.shift_cursor(days);
        let result = self.backend.fetch_by_date(ticket.date).await;
        self.complete_fetch(ticket, result)
    }

    pub async fn navigate_to(&mut self, date: NaiveDate) -> FetchOutcome {
        let ticket = self.set_cursor(date);
        let result = self.backend.fetch_by_date(ticket.date).await;
        self.complete_fetch(ticket, result)
    }

    // ---------- entry form ----------

    /// Create a row from the form draft
    pub async fn submit(&mut self) -> ActionOutcome {
        let record = self.form.draft().to_new_record();

        match self.backend.insert(record).await {
            Ok(row) => {
                tracing::info!(id = %row.id, date = %row.metric_date, "Daily metric inserted");
                self.form.reset((self.clock)());

                if self.follow_submitted_date && row.metric_date != self.cursor.date() {
                    self.navigate_to(row.metric_date).await;
                } else {
                    self.refresh().await;
                }
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!(error = %e, "Error inserting daily metric");
                ActionOutcome::Failed
            }
        }
    }

    // ---------- table ----------

    pub fn begin_edit(&mut self, id: &RecordId) -> EditTransition {
        let transition = self.table.begin_edit(id);
        match &transition {
            EditTransition::Replaced { discarded } => {
                tracing::warn!(discarded = %discarded, editing = %id, "Discarded unsaved row edit");
            }
            EditTransition::UnknownRow => {
                tracing::warn!(id = %id, "Edit requested for a row that is not displayed");
            }
            _ => {}
        }
        transition
    }

    /// Change a field of the row being edited; false if no row is in edit state
    pub fn set_edit_field(&mut self, field: MetricField, value: FieldValue) -> bool {
        match self.table.editing_mut() {
            Some(draft) => {
                draft.set(field, value);
                true
            }
            None => false,
        }
    }

    /// Send the edited fields, leave edit state and refetch
    pub async fn save_edit(&mut self) -> ActionOutcome {
        let Some(draft) = self.table.editing() else {
            return ActionOutcome::Skipped;
        };
        let id = draft.id().clone();
        let patch = draft.patch();

        if patch.is_empty() {
            self.table.cancel_edit();
            return ActionOutcome::Skipped;
        }

        match self.backend.update(&id, &patch).await {
            Ok(row) => {
                tracing::info!(id = %row.id, "Daily metric updated");
                self.table.cancel_edit();
                self.refresh().await;
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!(id = %id, error = %e, "Error updating daily metric");
                ActionOutcome::Failed
            }
        }
    }

    /// Discard the draft without contacting the backend
    pub fn cancel_edit(&mut self) -> bool {
        self.table.cancel_edit().is_some()
    }

    /// Delete a row once the user confirms
    pub async fn delete_row(&mut self, id: &RecordId, confirm: &dyn Confirmation) -> ActionOutcome {
        if !confirm.confirm(self.language.text(TextKey::ConfirmDelete)) {
            tracing::debug!(id = %id, "Delete not confirmed");
            return ActionOutcome::Skipped;
        }

        match self.backend.delete(id).await {
            Ok(()) => {
                tracing::info!(id = %id, "Daily metric deleted");
                if self.table.editing().map(|d| d.id() == id).unwrap_or(false) {
                    self.table.cancel_edit();
                }
                self.refresh().await;
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!(id = %id, error = %e, "Error deleting daily metric");
                ActionOutcome::Failed
            }
        }
    }

    // ---------- language ----------

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.publish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{InMemoryBackend, Operation};
    use crate::dashboard::effects::DocumentMeta;
    use crate::dashboard::table::RowState;
    use crate::i18n::Direction;
    use crate::records::NewMetricRecord;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Mutex;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dashboard_at(
        backend: &Arc<InMemoryBackend>,
        today: NaiveDate,
    ) -> Dashboard {
        let backend: Arc<dyn MetricsBackend> = backend.clone();
        Dashboard::new(backend, DashboardOptions::default()).with_clock(Arc::new(move || today))
    }

    fn scenario_draft() -> EntryDraft {
        EntryDraft {
            metric_date: ymd(2024, 1, 1),
            website_visits: 10,
            app_downloads: 5,
            finished_operations: 3,
            liquidity: Decimal::from_str("12.50").unwrap(),
        }
    }

    /// Records every prompt it is asked
    struct Scripted {
        answer: bool,
        prompts: Mutex<Vec<String>>,
    }

    impl Confirmation for Scripted {
        fn confirm(&self, prompt: &str) -> bool {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.answer
        }
    }

    #[tokio::test]
    async fn test_submit_scenario_shows_row() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 1));
        assert_eq!(dash.load().await, FetchOutcome::Applied(0));

        dash.form_mut().fill(scenario_draft());
        assert_eq!(dash.submit().await, ActionOutcome::Completed);

        let rows = dash.table().records();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].website_visits, 10);
        assert_eq!(rows[0].app_downloads, 5);
        assert_eq!(rows[0].finished_operations, 3);
        assert_eq!(rows[0].liquidity, Decimal::from_str("12.50").unwrap());
        assert_eq!(rows[0].metric_date, ymd(2024, 1, 1));
    }

    #[tokio::test]
    async fn test_submit_resets_form() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 1));
        dash.form_mut().fill(EntryDraft {
            metric_date: ymd(2023, 12, 25),
            ..scenario_draft()
        });

        dash.submit().await;
        assert_eq!(dash.form().draft(), &EntryDraft::new(ymd(2024, 1, 1)));
    }

    #[tokio::test]
    async fn test_submit_for_other_date_keeps_view() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 2));
        dash.load().await;

        dash.form_mut().fill(scenario_draft());
        dash.submit().await;

        assert_eq!(dash.date(), ymd(2024, 1, 2));
        assert!(dash.table().is_empty());

        dash.shift(-1).await;
        assert_eq!(dash.table().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_can_follow_submitted_date() {
        let backend = Arc::new(InMemoryBackend::new());
        let dyn_backend: Arc<dyn MetricsBackend> = backend.clone();
        let options = DashboardOptions {
            follow_submitted_date: true,
            ..Default::default()
        };
        let mut dash = Dashboard::new(dyn_backend, options)
            .with_clock(Arc::new(|| NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));

        dash.form_mut().fill(scenario_draft());
        dash.submit().await;

        assert_eq!(dash.date(), ymd(2024, 1, 1));
        assert_eq!(dash.table().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 1));
        dash.form_mut().fill(scenario_draft());

        backend.fail_next(Operation::Insert).await;
        assert_eq!(dash.submit().await, ActionOutcome::Failed);
        assert_eq!(dash.form().draft(), &scenario_draft());
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_partial_update_changes_one_field() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 1));
        dash.form_mut().fill(scenario_draft());
        dash.submit().await;

        let original = dash.table().records()[0].clone();
        assert_eq!(dash.begin_edit(&original.id), EditTransition::Started);
        assert!(dash.set_edit_field(MetricField::AppDownloads, FieldValue::Count(42)));
        assert_eq!(dash.save_edit().await, ActionOutcome::Completed);

        let updated = &dash.table().records()[0];
        assert_eq!(updated.app_downloads, 42);
        assert_eq!(updated.website_visits, original.website_visits);
        assert_eq!(updated.finished_operations, original.finished_operations);
        assert_eq!(updated.liquidity, original.liquidity);
        assert_eq!(updated.created_at, original.created_at);
        assert!(dash.table().editing().is_none());
    }

    #[tokio::test]
    async fn test_cancel_edit_sends_nothing() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 1));
        dash.form_mut().fill(scenario_draft());
        dash.submit().await;

        let id = dash.table().records()[0].id.clone();
        dash.begin_edit(&id);
        dash.set_edit_field(MetricField::WebsiteVisits, FieldValue::Count(1000));

        let calls = backend.call_count().await;
        assert!(dash.cancel_edit());
        assert_eq!(backend.call_count().await, calls);

        let rows = dash.page().rows;
        assert_eq!(rows[0].state, RowState::Viewing);
        assert_eq!(rows[0].record.website_visits, 10);
    }

    #[tokio::test]
    async fn test_save_without_changes_skips_request() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 1));
        dash.form_mut().fill(scenario_draft());
        dash.submit().await;

        let id = dash.table().records()[0].id.clone();
        dash.begin_edit(&id);
        let calls = backend.call_count().await;

        assert_eq!(dash.save_edit().await, ActionOutcome::Skipped);
        assert_eq!(backend.call_count().await, calls);
        assert!(dash.table().editing().is_none());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_edit_state() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 1));
        dash.form_mut().fill(scenario_draft());
        dash.submit().await;

        let id = dash.table().records()[0].id.clone();
        dash.begin_edit(&id);
        dash.set_edit_field(MetricField::FinishedOperations, FieldValue::Count(8));

        backend.fail_next(Operation::Update).await;
        assert_eq!(dash.save_edit().await, ActionOutcome::Failed);
        assert!(dash.table().editing().is_some());
    }

    #[tokio::test]
    async fn test_delete_confirmed_and_declined() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 1));
        dash.form_mut().fill(scenario_draft());
        dash.submit().await;
        let id = dash.table().records()[0].id.clone();

        let decline = Scripted {
            answer: false,
            prompts: Mutex::new(Vec::new()),
        };
        assert_eq!(dash.delete_row(&id, &decline).await, ActionOutcome::Skipped);
        assert_eq!(dash.table().len(), 1);
        assert_eq!(
            decline.prompts.lock().unwrap().as_slice(),
            ["هل أنت متأكد أنك تريد حذف هذا السجل؟"]
        );

        assert_eq!(dash.delete_row(&id, &true).await, ActionOutcome::Completed);
        assert!(dash.table().is_empty());
        assert!(backend.fetch_by_date(ymd(2024, 1, 1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_fetch_is_discarded() {
        let backend = Arc::new(InMemoryBackend::new());
        backend
            .insert(NewMetricRecord::zeroed(ymd(2024, 1, 1)))
            .await
            .unwrap();
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 2));

        // Slow fetch for Jan 1 is overtaken by navigation to Jan 3
        let slow = dash.shift_cursor(-1);
        let slow_rows = backend.fetch_by_date(slow.date).await;
        let fast = dash.shift_cursor(2);
        let fast_rows = backend.fetch_by_date(fast.date).await;

        assert_eq!(dash.complete_fetch(fast, fast_rows), FetchOutcome::Applied(0));
        assert_eq!(dash.complete_fetch(slow, slow_rows), FetchOutcome::Stale);
        assert!(dash.table().is_empty());
        assert_eq!(dash.date(), ymd(2024, 1, 3));
    }

    #[tokio::test]
    async fn test_older_fetch_for_same_date_is_discarded() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 1));

        let first = dash.begin_fetch();
        let first_rows = backend.fetch_by_date(first.date).await;
        backend
            .insert(NewMetricRecord::zeroed(ymd(2024, 1, 1)))
            .await
            .unwrap();
        let second = dash.begin_fetch();
        let second_rows = backend.fetch_by_date(second.date).await;

        assert_eq!(dash.complete_fetch(second, second_rows), FetchOutcome::Applied(1));
        assert_eq!(dash.complete_fetch(first, first_rows), FetchOutcome::Stale);
        assert_eq!(dash.table().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_rows() {
        let backend = Arc::new(InMemoryBackend::new());
        backend
            .insert(NewMetricRecord::zeroed(ymd(2024, 1, 1)))
            .await
            .unwrap();
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 1));
        dash.load().await;

        backend.fail_next(Operation::Fetch).await;
        assert_eq!(dash.refresh().await, FetchOutcome::Failed);
        assert_eq!(dash.table().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_after_navigation_clears_old_rows() {
        let backend = Arc::new(InMemoryBackend::new());
        backend
            .insert(NewMetricRecord::zeroed(ymd(2024, 1, 1)))
            .await
            .unwrap();
        let mut dash = dashboard_at(&backend, ymd(2024, 1, 1));
        dash.load().await;
        let id = dash.table().records()[0].id.clone();
        dash.begin_edit(&id);

        backend.fail_next(Operation::Fetch).await;
        assert_eq!(dash.shift(1).await, FetchOutcome::Failed);

        assert_eq!(dash.date(), ymd(2024, 1, 2));
        assert!(dash.table().is_empty());
        assert!(dash.table().editing().is_none());
        assert!(dash.page().rows.is_empty());
    }

    #[tokio::test]
    async fn test_hook_sees_date_and_language_changes() {
        let backend = Arc::new(InMemoryBackend::new());
        let doc = DocumentMeta::new();
        let mut dash = dashboard_at(&backend, ymd(2024, 3, 1)).with_hook(Arc::new(doc.clone()));

        dash.load().await;
        let meta = doc.current().unwrap();
        assert_eq!(meta.direction, Direction::Rtl);
        assert_eq!(meta.date, ymd(2024, 3, 1));

        dash.shift(-1).await;
        assert_eq!(doc.current().unwrap().date, ymd(2024, 2, 29));

        dash.set_language(Language::English);
        let meta = doc.current().unwrap();
        assert_eq!(meta.direction, Direction::Ltr);
        assert_eq!(meta.title, "Abwaab Dashboard");
    }
}
