use std::sync::Arc;

use qshell_core::model::{LanguageCode, PageName};
use services::{
    AppServices, AuthSession, EventBus, PageNavigator, SessionHistory, ShellDocument,
    TranslationCache,
};

/// What the shell views need from the composition root.
pub trait UiApp: Send + Sync {
    fn navigator(&self) -> Arc<PageNavigator>;
    fn auth(&self) -> Arc<AuthSession>;
    fn translations(&self) -> Arc<TranslationCache>;
    fn history(&self) -> Arc<SessionHistory>;
    fn document(&self) -> ShellDocument;
    fn events(&self) -> EventBus;

    /// Pages linked from the navigation bar.
    fn navigation(&self) -> Vec<PageName>;
    /// Languages offered by the picker.
    fn languages(&self) -> Vec<LanguageCode>;
}

impl UiApp for AppServices {
    fn navigator(&self) -> Arc<PageNavigator> {
        AppServices::navigator(self)
    }

    fn auth(&self) -> Arc<AuthSession> {
        AppServices::auth(self)
    }

    fn translations(&self) -> Arc<TranslationCache> {
        AppServices::translations(self)
    }

    fn history(&self) -> Arc<SessionHistory> {
        AppServices::history(self)
    }

    fn document(&self) -> ShellDocument {
        AppServices::document(self)
    }

    fn events(&self) -> EventBus {
        AppServices::events(self)
    }

    fn navigation(&self) -> Vec<PageName> {
        self.config().navigation.clone()
    }

    fn languages(&self) -> Vec<LanguageCode> {
        self.config().languages.clone()
    }
}

#[derive(Clone)]
pub struct AppContext {
    navigator: Arc<PageNavigator>,
    auth: Arc<AuthSession>,
    translations: Arc<TranslationCache>,
    history: Arc<SessionHistory>,
    document: ShellDocument,
    events: EventBus,
    navigation: Arc<[PageName]>,
    languages: Arc<[LanguageCode]>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            navigator: app.navigator(),
            auth: app.auth(),
            translations: app.translations(),
            history: app.history(),
            document: app.document(),
            events: app.events(),
            navigation: app.navigation().into(),
            languages: app.languages().into(),
        }
    }

    #[must_use]
    pub fn navigator(&self) -> Arc<PageNavigator> {
        Arc::clone(&self.navigator)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthSession> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn translations(&self) -> Arc<TranslationCache> {
        Arc::clone(&self.translations)
    }

    #[must_use]
    pub fn history(&self) -> Arc<SessionHistory> {
        Arc::clone(&self.history)
    }

    #[must_use]
    pub fn document(&self) -> &ShellDocument {
        &self.document
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    #[must_use]
    pub fn navigation(&self) -> &[PageName] {
        &self.navigation
    }

    #[must_use]
    pub fn languages(&self) -> &[LanguageCode] {
        &self.languages
    }

    /// Shorthand for a lookup in the translation cache.
    #[must_use]
    pub fn tr(&self, key: &str) -> String {
        self.translations.translate(key)
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
