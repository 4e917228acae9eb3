use std::sync::Arc;

use qshell_core::model::PageName;
use reqwest::Client;
use storage::repository::Storage;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::Clock;
use crate::api::QuestionnaireApi;
use crate::assets::{AssetFetcher, HttpAssets};
use crate::auth::AuthSession;
use crate::behavior::BehaviorRegistry;
use crate::config::ShellConfig;
use crate::cookies::CookieStore;
use crate::document::ShellDocument;
use crate::error::AppServicesError;
use crate::events::{EventBus, ShellEvent};
use crate::history::SessionHistory;
use crate::i18n::TranslationCache;
use crate::navigator::PageNavigator;
use crate::questionnaire::{QUESTIONNAIRE_PAGE, QuestionnaireBehavior, QuestionnaireRenderer};

/// Location the shell starts on before any navigation.
pub const SHELL_ENTRY_URL: &str = "index.html";

/// Assembles the shell's services around one document and event bus.
#[derive(Clone)]
pub struct AppServices {
    config: ShellConfig,
    events: EventBus,
    document: ShellDocument,
    history: Arc<SessionHistory>,
    behaviors: BehaviorRegistry,
    navigator: Arc<PageNavigator>,
    auth: Arc<AuthSession>,
    translations: Arc<TranslationCache>,
    questionnaire: Arc<QuestionnaireRenderer>,
    api: Arc<QuestionnaireApi>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// configured endpoints are unusable.
    pub async fn new_sqlite(
        db_url: &str,
        config: ShellConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::new(config, storage, clock)
    }

    /// Build services over the shell's HTTP endpoints and `storage`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the configured endpoints are unusable.
    pub fn new(
        config: ShellConfig,
        storage: Storage,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let client = Client::new();
        let assets: Arc<dyn AssetFetcher> = Arc::new(HttpAssets::new(
            client.clone(),
            config.assets_url.clone(),
        ));
        Self::with_assets(config, storage, clock, client, assets)
    }

    /// Build services with a custom asset source.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the configured endpoints are unusable.
    pub fn with_assets(
        config: ShellConfig,
        storage: Storage,
        clock: Clock,
        client: Client,
        assets: Arc<dyn AssetFetcher>,
    ) -> Result<Self, AppServicesError> {
        let events = EventBus::new();
        let document = ShellDocument::new();
        let history = Arc::new(SessionHistory::new(SHELL_ENTRY_URL));
        let behaviors = BehaviorRegistry::new();

        let auth = Arc::new(AuthSession::new(
            client.clone(),
            config.api_endpoint("token")?,
            Arc::clone(&storage.tokens),
            document.clone(),
            events.clone(),
            clock,
        ));
        let translations = Arc::new(TranslationCache::new(
            Arc::clone(&assets),
            CookieStore::new(clock, Arc::clone(&storage.cookies)),
            events.clone(),
            config.default_language.clone(),
            config.system_locale.clone(),
        ));
        let questionnaire = Arc::new(QuestionnaireRenderer::new(
            client.clone(),
            config.api_endpoint("get_data")?,
            Arc::clone(&assets),
            Arc::clone(&auth),
        ));
        behaviors.register(
            PageName::new(QUESTIONNAIRE_PAGE)?,
            Arc::new(QuestionnaireBehavior::new(Arc::clone(&questionnaire))),
        );
        let api = Arc::new(QuestionnaireApi::new(
            client,
            config.clone(),
            Arc::clone(&auth),
        ));
        let navigator = Arc::new(PageNavigator::new(
            assets,
            history.clone(),
            document.clone(),
            behaviors.clone(),
            events.clone(),
        ));

        Ok(Self {
            config,
            events,
            document,
            history,
            behaviors,
            navigator,
            auth,
            translations,
            questionnaire,
            api,
        })
    }

    /// Re-sync the session view after every page-ready signal.
    #[must_use]
    pub fn spawn_listeners(&self) -> JoinHandle<()> {
        let mut events = self.events.subscribe();
        let auth = Arc::clone(&self.auth);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(ShellEvent::PageReady(page)) => {
                        debug!(%page, "syncing session view");
                        auth.sync_ui();
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    #[must_use]
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    #[must_use]
    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    #[must_use]
    pub fn document(&self) -> ShellDocument {
        self.document.clone()
    }

    #[must_use]
    pub fn history(&self) -> Arc<SessionHistory> {
        Arc::clone(&self.history)
    }

    #[must_use]
    pub fn behaviors(&self) -> BehaviorRegistry {
        self.behaviors.clone()
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
    pub fn questionnaire(&self) -> Arc<QuestionnaireRenderer> {
        Arc::clone(&self.questionnaire)
    }

    #[must_use]
    pub fn api(&self) -> Arc<QuestionnaireApi> {
        Arc::clone(&self.api)
    }
}
