//! Translation tables: language resolution, loading and lookup.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use qshell_core::model::{LanguageCode, TranslationTable, Translations};
use tracing::{debug, error, info, warn};

use crate::assets::AssetFetcher;
use crate::cookies::{CookieStore, DEFAULT_COOKIE_DAYS};
use crate::error::{FetchError, TranslationError};
use crate::events::{EventBus, ShellEvent};

/// Cookie holding the user's language preference.
pub const LANGUAGE_COOKIE: &str = "userLanguage";

#[derive(Default)]
struct LanguageState {
    current: Option<LanguageCode>,
    table: TranslationTable,
}

pub struct TranslationCache {
    assets: Arc<dyn AssetFetcher>,
    cookies: CookieStore,
    events: EventBus,
    default_language: LanguageCode,
    system_locale: Option<LanguageCode>,
    state: RwLock<LanguageState>,
}

impl TranslationCache {
    #[must_use]
    pub fn new(
        assets: Arc<dyn AssetFetcher>,
        cookies: CookieStore,
        events: EventBus,
        default_language: LanguageCode,
        system_locale: Option<LanguageCode>,
    ) -> Self {
        Self {
            assets,
            cookies,
            events,
            default_language,
            system_locale,
            state: RwLock::new(LanguageState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, LanguageState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LanguageState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn default_language(&self) -> &LanguageCode {
        &self.default_language
    }

    /// Language currently in effect, without consulting the cookie.
    #[must_use]
    pub fn language(&self) -> LanguageCode {
        self.read()
            .current
            .clone()
            .unwrap_or_else(|| self.default_language.clone())
    }

    /// Resolve the language and verify its table in the background.
    ///
    /// The returned code is not checked yet; if its table turns out to be
    /// missing the default language is selected and persisted later.
    pub async fn current_language(self: &Arc<Self>) -> LanguageCode {
        let language = self.resolve_language().await;
        let cache = Arc::clone(self);
        let verified = language.clone();
        tokio::spawn(async move { cache.verify_language(&verified).await });
        language
    }

    /// Cookie preference, then the reported locale, then the default.
    pub async fn resolve_language(&self) -> LanguageCode {
        let preferred = match self.cookies.get(LANGUAGE_COOKIE).await {
            Ok(value) => value.and_then(|raw| LanguageCode::new(raw).ok()),
            Err(err) => {
                warn!(error = %err, "failed to read language preference");
                None
            }
        };
        let language = preferred
            .or_else(|| self.system_locale.clone())
            .unwrap_or_else(|| self.default_language.clone());
        self.write().current = Some(language.clone());
        language
    }

    /// Load `language` if its table exists on the asset host; otherwise
    /// fall back to the default language and remember that choice.
    pub async fn verify_language(&self, language: &LanguageCode) {
        match self.assets.exists(&language.translation_path()).await {
            Ok(true) => {
                if *language != self.default_language {
                    self.load_language_data(&self.default_language, false).await;
                }
                self.load_language_data(language, false).await;
            }
            Ok(false) => {
                warn!(%language, "no translations available, using default language");
                let fallback = self.default_language.clone();
                if let Err(err) = self.set_current_language(&fallback).await {
                    error!(error = %err, "failed to persist default language");
                }
            }
            Err(err) => error!(%language, error = %err, "failed to check translations"),
        }
    }

    /// Fetch and cache the table of `language` unless it is already loaded
    /// (or `force_reload` is set). Failures are logged, not returned.
    pub async fn load_language_data(&self, language: &LanguageCode, force_reload: bool) {
        if !force_reload && self.is_language_loaded(Some(language)) {
            debug!(%language, "translations already cached");
            return;
        }
        match self.fetch_table(language).await {
            Ok(translations) => {
                self.write().table.insert(language.clone(), translations);
                info!(%language, "translations loaded");
                self.events
                    .publish(ShellEvent::LanguageLoaded(language.clone()));
            }
            Err(err) => error!(%language, error = %err, "failed to load translations"),
        }
    }

    async fn fetch_table(&self, language: &LanguageCode) -> Result<Translations, FetchError> {
        let body = self
            .assets
            .fetch_text(&language.translation_path())
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Persist `language` as the preference and load its table.
    ///
    /// # Errors
    ///
    /// Returns `TranslationError::Storage` if the preference cannot be
    /// stored; the language is not switched in that case.
    pub async fn set_current_language(
        &self,
        language: &LanguageCode,
    ) -> Result<(), TranslationError> {
        self.cookies
            .set(LANGUAGE_COOKIE, language.as_str(), DEFAULT_COOKIE_DAYS)
            .await?;
        self.write().current = Some(language.clone());
        if *language != self.default_language {
            self.load_language_data(&self.default_language, false).await;
        }
        self.load_language_data(language, false).await;
        Ok(())
    }

    /// With `None`, whether any language is loaded at all.
    #[must_use]
    pub fn is_language_loaded(&self, language: Option<&LanguageCode>) -> bool {
        self.read().table.is_loaded(language)
    }

    /// Current language text, then default language text, then `key`.
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        let state = self.read();
        let current = state.current.as_ref().unwrap_or(&self.default_language);
        state.table.translate(current, &self.default_language, key)
    }
}
