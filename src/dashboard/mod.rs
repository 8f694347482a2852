//! Dashboard
//!
//! The single-page view for recording and reviewing daily metrics.
//!
//! ## Architecture
//!
//! - **DateCursor**: the day being viewed; shifting it refetches
//! - **EntryForm**: draft of a new row; submit creates it and resets
//! - **MetricsTable**: rows of the viewed day with per-row view/edit state
//! - **Dashboard**: wires the three to a [`MetricsBackend`](crate::backend::MetricsBackend)
//!
//! ## Data Flow
//!
//! 1. Cursor change → fetch rows for the new date → table
//! 2. Form submit → insert → refetch the viewed date
//! 3. Row save → partial update → refetch
//! 4. Row delete (confirmed) → delete → refetch
//!
//! Fetch results are tagged with a [`FetchTicket`]; results for a date that is
//! no longer viewed, or older than the last applied fetch, are dropped.

mod cursor;
mod effects;
mod form;
mod table;
mod view;

pub use cursor::DateCursor;
pub use effects::{DocumentMeta, PageMeta, PresentationHook, TracingHook};
pub use form::{EntryDraft, EntryForm};
pub use table::{EditDraft, EditTransition, MetricsTable, RowState, RowView};
pub use view::{
    local_today, ActionOutcome, Clock, Confirmation, Dashboard, DashboardOptions, DashboardPage,
    FetchOutcome, FetchTicket,
};
