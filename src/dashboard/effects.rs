//! Presentation side effects
//!
//! Page-level state (language, text direction, title) is pushed to a hook
//! after each successful language or date change instead of being mutated
//! globally.

use chrono::NaiveDate;
use std::sync::{Arc, RwLock};

use crate::i18n::{Direction, Language, TextKey};

/// Document-level presentation state
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub language: Language,
    pub direction: Direction,
    pub title: String,
    pub date: NaiveDate,
}

impl PageMeta {
    pub fn new(language: Language, date: NaiveDate) -> Self {
        Self {
            language,
            direction: language.direction(),
            title: language.text(TextKey::DashboardTitle).to_string(),
            date,
        }
    }
}

/// Receiver of presentation changes
pub trait PresentationHook: Send + Sync {
    fn apply(&self, meta: &PageMeta);
}

/// Logs presentation changes
#[derive(Debug, Default)]
pub struct TracingHook;

impl PresentationHook for TracingHook {
    fn apply(&self, meta: &PageMeta) {
        tracing::debug!(
            lang = meta.language.code(),
            dir = meta.direction.as_str(),
            date = %meta.date,
            "Presentation updated"
        );
    }
}

/// Shared document attributes read by page renderers
#[derive(Debug, Clone, Default)]
pub struct DocumentMeta {
    current: Arc<RwLock<Option<PageMeta>>>,
}

impl DocumentMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest applied state, if any
    pub fn current(&self) -> Option<PageMeta> {
        self.current.read().ok().and_then(|meta| meta.clone())
    }
}

impl PresentationHook for DocumentMeta {
    fn apply(&self, meta: &PageMeta) {
        if let Ok(mut current) = self.current.write() {
            *current = Some(meta.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_meta_follows_language() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let meta = PageMeta::new(Language::Arabic, date);
        assert_eq!(meta.direction, Direction::Rtl);
        assert_eq!(meta.title, "لوحة التحكم أبواب");

        let meta = PageMeta::new(Language::English, date);
        assert_eq!(meta.direction, Direction::Ltr);
        assert_eq!(meta.title, "Abwaab Dashboard");
    }

    #[test]
    fn test_document_meta_keeps_latest() {
        let doc = DocumentMeta::new();
        assert!(doc.current().is_none());

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        doc.apply(&PageMeta::new(Language::Arabic, date));
        doc.apply(&PageMeta::new(Language::English, date));

        assert_eq!(doc.current().unwrap().language, Language::English);
    }
}
