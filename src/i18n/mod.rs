//! Display language and message catalog
//!
//! Arabic is the default language and is rendered right-to-left; English is
//! both the alternative and the fallback for any message missing from the
//! Arabic catalog.

mod catalog;

pub use catalog::TextKey;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported display languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "en")]
    English,
}

/// Text direction of a rendered page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[Language::Arabic, Language::English]
    }

    /// BCP 47 primary tag
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Language::Arabic => Direction::Rtl,
            Language::English => Direction::Ltr,
        }
    }

    /// Look up a message, falling back to English
    pub fn text(&self, key: TextKey) -> &'static str {
        match self {
            Language::Arabic => catalog::arabic(key).unwrap_or_else(|| catalog::english(key)),
            Language::English => catalog::english(key),
        }
    }

    /// Match a language tag such as `ar-EG` or `en_US.UTF-8`
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .split(|c| c == '-' || c == '_' || c == '.')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match primary.as_str() {
            "ar" => Some(Language::Arabic),
            "en" => Some(Language::English),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_tag(s).ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

/// Pick the supported language with the highest quality from an
/// `Accept-Language` header value
pub fn detect(accept_language: &str) -> Option<Language> {
    let mut best: Option<(Language, f32)> = None;

    for part in accept_language.split(',') {
        let mut pieces = part.split(';');
        let tag = pieces.next().unwrap_or("").trim();
        // A malformed or out-of-range weight disqualifies the entry
        let quality = match pieces.find_map(|p| p.trim().strip_prefix("q=")) {
            None => 1.0,
            Some(q) => match q.trim().parse::<f32>() {
                Ok(q) if (0.0..=1.0).contains(&q) => q,
                _ => continue,
            },
        };

        if let Some(lang) = Language::from_tag(tag) {
            if best.map(|(_, q)| quality > q).unwrap_or(true) {
                best = Some((lang, quality));
            }
        }
    }

    best.filter(|(_, q)| *q > 0.0).map(|(lang, _)| lang)
}

/// Configured language choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguagePreference {
    Fixed(Language),
    /// Detect from the client, Arabic when nothing matches
    Auto,
}

impl Default for LanguagePreference {
    fn default() -> Self {
        LanguagePreference::Fixed(Language::Arabic)
    }
}

impl LanguagePreference {
    pub fn resolve(&self, accept_language: Option<&str>) -> Language {
        match self {
            LanguagePreference::Fixed(lang) => *lang,
            LanguagePreference::Auto => accept_language.and_then(detect).unwrap_or_default(),
        }
    }
}

impl FromStr for LanguagePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(LanguagePreference::Auto)
        } else {
            s.parse().map(LanguagePreference::Fixed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arabic_is_default_and_rtl() {
        assert_eq!(Language::default(), Language::Arabic);
        assert_eq!(Language::Arabic.direction(), Direction::Rtl);
        assert_eq!(Language::English.direction(), Direction::Ltr);
    }

    #[test]
    fn test_text_lookup() {
        assert_eq!(Language::English.text(TextKey::Delete), "Delete");
        assert_eq!(Language::Arabic.text(TextKey::Delete), "حذف");
    }

    #[test]
    fn test_arabic_falls_back_to_english() {
        assert_eq!(
            Language::Arabic.text(TextKey::BackToDashboard),
            Language::English.text(TextKey::BackToDashboard)
        );
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Language::from_tag("ar-EG"), Some(Language::Arabic));
        assert_eq!(Language::from_tag("en_US.UTF-8"), Some(Language::English));
        assert_eq!(Language::from_tag("fr"), None);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_detect_uses_quality() {
        assert_eq!(detect("fr-FR,en;q=0.5,ar;q=0.8"), Some(Language::Arabic));
        assert_eq!(detect("en-US,en;q=0.9"), Some(Language::English));
        assert_eq!(detect("fr,de"), None);
        assert_eq!(detect("en;q=0"), None);
    }

    #[test]
    fn test_detect_skips_malformed_quality() {
        assert_eq!(detect("ar;q=abc, en;q=0.5"), Some(Language::English));
        assert_eq!(detect("ar;q=7, en;q=0.2"), Some(Language::English));
        assert_eq!(detect("en;q="), None);
    }

    #[test]
    fn test_preference_resolution() {
        let fixed: LanguagePreference = "en".parse().unwrap();
        assert_eq!(fixed.resolve(Some("ar")), Language::English);

        let auto: LanguagePreference = "auto".parse().unwrap();
        assert_eq!(auto.resolve(Some("en-GB")), Language::English);
        assert_eq!(auto.resolve(Some("fr")), Language::Arabic);
        assert_eq!(auto.resolve(None), Language::Arabic);
    }
}
