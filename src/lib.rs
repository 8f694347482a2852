//! # Daily Metrics
//!
//! A dashboard for recording and reviewing daily business metrics: website
//! visits, app downloads, finished operations and liquidity, one or more
//! rows per calendar day.
//!
//! ## Features
//!
//! - **Date navigation**: view any day, step one day back or forward
//! - **Create, edit, delete**: per-row edit state, confirmation before delete
//! - **Stale-safe fetching**: results for a day that is no longer viewed are dropped
//! - **Bilingual**: Arabic (right-to-left) by default, English fallback
//!
//! ## Modules
//!
//! - [`records`]: Row types and partial updates
//! - [`backend`]: Hosted REST table and in-memory store
//! - [`dashboard`]: Date cursor, entry form, metrics table and their wiring
//! - [`i18n`]: Languages, text direction and the message catalog
//! - [`web`]: Server-rendered HTML dashboard with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use daily_metrics::backend::{InMemoryBackend, MetricsBackend};
//! use daily_metrics::dashboard::{Dashboard, DashboardOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend: Arc<dyn MetricsBackend> = Arc::new(InMemoryBackend::new());
//!     let mut dashboard = Dashboard::new(backend, DashboardOptions::default());
//!
//!     // Fetch today's rows
//!     dashboard.load().await;
//!
//!     // Record a day
//!     dashboard.form_mut().draft_mut().website_visits = 10;
//!     dashboard.submit().await;
//!
//!     println!("{} rows", dashboard.table().len());
//! }
//! ```

pub mod backend;
pub mod config;
pub mod dashboard;
pub mod i18n;
pub mod logging;
pub mod records;
pub mod web;

// Re-export top-level types for convenience
pub use records::{FieldValue, MetricField, MetricPatch, MetricRecord, NewMetricRecord, RecordId};

pub use backend::{BackendError, BackendResult, InMemoryBackend, MetricsBackend, RestBackend};

pub use dashboard::{ActionOutcome, Dashboard, DashboardOptions, FetchOutcome};

pub use i18n::{Direction, Language, LanguagePreference, TextKey};

pub use web::{build_router, serve, AppState, WebError};

pub use config::{Config, ConfigError};
