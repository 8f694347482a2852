//! Application State
//!
//! Shared state accessible by all handlers. The dashboard sits behind an
//! async mutex; fetches release it while waiting on the backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::backend::MetricsBackend;
use crate::dashboard::{Dashboard, DashboardOptions, DocumentMeta, PageMeta};
use crate::i18n::{Language, LanguagePreference};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// The single dashboard view
    pub dashboard: Arc<Mutex<Dashboard>>,
    /// Document attributes published by the dashboard
    pub document: DocumentMeta,
    /// Backend handle for read-only endpoints
    pub backend: Arc<dyn MetricsBackend>,
    /// How the display language is chosen
    pub language_preference: LanguagePreference,
    /// Set once a user picks a language explicitly
    language_chosen: Arc<AtomicBool>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state around a fresh dashboard
    pub fn new(
        backend: Arc<dyn MetricsBackend>,
        options: DashboardOptions,
        language_preference: LanguagePreference,
    ) -> Self {
        let dashboard = Dashboard::new(Arc::clone(&backend), options);
        Self::with_dashboard(dashboard, language_preference)
    }

    /// Create state around an existing dashboard; its hook is replaced
    pub fn with_dashboard(dashboard: Dashboard, language_preference: LanguagePreference) -> Self {
        let document = DocumentMeta::new();
        let backend = dashboard.backend();
        let dashboard = dashboard.with_hook(Arc::new(document.clone()));

        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
            document,
            backend,
            language_preference,
            language_chosen: Arc::new(AtomicBool::new(false)),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Language for a client that has not picked one explicitly
    pub fn detected_language(&self, accept_language: Option<&str>) -> Option<Language> {
        if self.language_chosen.load(Ordering::Relaxed) {
            return None;
        }
        match self.language_preference {
            LanguagePreference::Auto => Some(self.language_preference.resolve(accept_language)),
            LanguagePreference::Fixed(_) => None,
        }
    }

    pub fn mark_language_chosen(&self) {
        self.language_chosen.store(true, Ordering::Relaxed);
    }

    /// Latest published document attributes, or the dashboard's own
    pub async fn page_meta(&self) -> PageMeta {
        match self.document.current() {
            Some(meta) => meta,
            None => self.dashboard.lock().await.meta(),
        }
    }
}
