use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LanguageCodeError {
    #[error("language code is empty")]
    Empty,
    #[error("invalid language code: {0}")]
    Invalid(String),
}

/// Primary language subtag, lowercased (`en`, `fi`, `pt`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse a language tag or POSIX locale, keeping the primary subtag.
    ///
    /// `en-US`, `en_US.UTF-8` and `EN` all yield `en`.
    ///
    /// # Errors
    ///
    /// Returns `LanguageCodeError` if no alphabetic primary subtag is present.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LanguageCodeError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            return Err(LanguageCodeError::Empty);
        }
        let primary = raw
            .split(['.', '@'])
            .next()
            .and_then(|tag| tag.split(['-', '_']).next())
            .unwrap_or_default();
        let valid = (2..=8).contains(&primary.len())
            && primary.chars().all(|ch| ch.is_ascii_alphabetic());
        if !valid {
            return Err(LanguageCodeError::Invalid(raw.to_owned()));
        }
        Ok(Self(primary.to_ascii_lowercase()))
    }

    /// Interpret a runtime locale string; `C`/`POSIX` and garbage yield `None`.
    #[must_use]
    pub fn from_locale(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" | "C" | "POSIX" => None,
            other => Self::new(other).ok(),
        }
    }

    #[must_use]
    pub fn english() -> Self {
        Self("en".into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Asset path of the language's translation file.
    #[must_use]
    pub fn translation_path(&self) -> String {
        format!("translations/{}.json", self.0)
    }
}

impl fmt::Debug for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageCode({})", self.0)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = LanguageCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LanguageCode> for String {
    fn from(value: LanguageCode) -> Self {
        value.0
    }
}

/// Flat key → text mapping of one language.
pub type Translations = HashMap<String, String>;

/// Loaded translation tables by language.
///
/// A language is either absent (not loaded yet) or present with its full
/// table; tables are swapped whole, never merged.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    languages: HashMap<LanguageCode, Arc<Translations>>,
}

impl TranslationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, language: LanguageCode, translations: Translations) {
        self.languages.insert(language, Arc::new(translations));
    }

    /// With `None`, reports whether any language is loaded.
    #[must_use]
    pub fn is_loaded(&self, language: Option<&LanguageCode>) -> bool {
        match language {
            Some(language) => self.languages.contains_key(language),
            None => !self.languages.is_empty(),
        }
    }

    #[must_use]
    pub fn lookup(&self, language: &LanguageCode, key: &str) -> Option<&str> {
        self.languages
            .get(language)
            .and_then(|table| table.get(key))
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    /// Current language first, then the fallback language, then the key itself.
    #[must_use]
    pub fn translate(&self, current: &LanguageCode, fallback: &LanguageCode, key: &str) -> String {
        self.lookup(current, key)
            .or_else(|| self.lookup(fallback, key))
            .unwrap_or(key)
            .to_owned()
    }
}
