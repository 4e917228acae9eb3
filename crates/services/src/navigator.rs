//! Page navigation: swaps page fragments into the content region, runs the
//! page's behavior and keeps session history in step.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use qshell_core::markup::rewrite_relative_links;
use qshell_core::model::{HistoryEntry, PageName};
use tracing::{debug, error, info, warn};

use crate::assets::AssetFetcher;
use crate::behavior::{BehaviorRegistry, PageBehavior, PageContext};
use crate::document::ShellDocument;
use crate::error::NavigationError;
use crate::events::{EventBus, ShellEvent};
use crate::history::HistoryPort;

/// Query parameter selecting the initial page (`?page=<name>`).
pub const PAGE_QUERY_PARAM: &str = "page";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fragment was applied and the page is current.
    Loaded,
    /// A newer load was issued meanwhile; this result was discarded.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Keep,
}

#[derive(Default)]
struct NavigatorState {
    current: Option<PageName>,
    active: Option<Arc<dyn PageBehavior>>,
}

pub struct PageNavigator {
    assets: Arc<dyn AssetFetcher>,
    history: Arc<dyn HistoryPort>,
    document: ShellDocument,
    behaviors: BehaviorRegistry,
    events: EventBus,
    // Generation of the most recently issued load.
    latest: Arc<AtomicU64>,
    state: Mutex<NavigatorState>,
}

impl PageNavigator {
    #[must_use]
    pub fn new(
        assets: Arc<dyn AssetFetcher>,
        history: Arc<dyn HistoryPort>,
        document: ShellDocument,
        behaviors: BehaviorRegistry,
        events: EventBus,
    ) -> Self {
        Self {
            assets,
            history,
            document,
            behaviors,
            events,
            latest: Arc::new(AtomicU64::new(0)),
            state: Mutex::new(NavigatorState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, NavigatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.latest.load(Ordering::Acquire) == generation
    }

    #[must_use]
    pub fn current_page_name(&self) -> Option<PageName> {
        self.lock_state().current.clone()
    }

    #[must_use]
    pub fn document(&self) -> &ShellDocument {
        &self.document
    }

    /// Navigate to `page`, pushing a history entry unless it is already the
    /// current entry.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Fetch` if the fragment cannot be fetched
    /// (the current page is unchanged and the region stays cleared), or
    /// `NavigationError::Behavior` if the page's behavior failed to
    /// initialize (the page is current but page-ready is not published).
    pub async fn load_page(&self, page: &PageName) -> Result<LoadOutcome, NavigationError> {
        self.load(page, HistoryMode::Push).await
    }

    /// React to a history traversal; the browser already moved, so nothing
    /// is pushed. Entries without a page are ignored.
    ///
    /// # Errors
    ///
    /// Same as [`PageNavigator::load_page`].
    pub async fn handle_pop(
        &self,
        entry: &HistoryEntry,
    ) -> Result<Option<LoadOutcome>, NavigationError> {
        let Some(page) = entry.page() else {
            return Ok(None);
        };
        self.load(page, HistoryMode::Keep).await.map(Some)
    }

    /// Honor a `?page=<name>` startup parameter in `location`.
    ///
    /// The current history entry is replaced rather than a new one added.
    /// Without the parameter the statically served content stays as is.
    ///
    /// # Errors
    ///
    /// Same as [`PageNavigator::load_page`].
    pub async fn resolve_initial_page(
        &self,
        location: &str,
    ) -> Result<Option<LoadOutcome>, NavigationError> {
        let query = location
            .split_once('?')
            .map_or("", |(_, query)| query.split('#').next().unwrap_or(query));
        let Some(raw) = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == PAGE_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
        else {
            return Ok(None);
        };
        let page = match PageName::new(raw) {
            Ok(page) => page,
            Err(err) => {
                warn!(error = %err, "ignoring invalid initial page parameter");
                return Ok(None);
            }
        };
        self.history
            .replace(HistoryEntry::for_page(page.clone()), &page.url_path());
        self.load(&page, HistoryMode::Keep).await.map(Some)
    }

    /// Route a clicked link. Returns `Ok(None)` for links that are not
    /// same-origin relative, which keep their default behavior.
    ///
    /// # Errors
    ///
    /// Same as [`PageNavigator::load_page`].
    pub async fn follow_link(&self, href: &str) -> Result<Option<LoadOutcome>, NavigationError> {
        match PageName::from_href(href) {
            Some(page) => self.load_page(&page).await.map(Some),
            None => Ok(None),
        }
    }

    async fn load(
        &self,
        page: &PageName,
        mode: HistoryMode,
    ) -> Result<LoadOutcome, NavigationError> {
        let (generation, unloading) = {
            let mut state = self.lock_state();
            let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
            let unloading = state.current.is_some().then(|| state.active.take());
            (generation, unloading)
        };
        if let Some(retired) = unloading {
            if let Some(behavior) = retired {
                behavior.teardown();
            }
            self.document.clear_content();
            self.events.publish(ShellEvent::DocumentChanged);
        }

        debug!(%page, generation, "fetching page fragment");
        let html = match self.assets.fetch_text(&page.fragment_path()).await {
            Ok(html) => html,
            Err(_) if !self.is_latest(generation) => return Ok(LoadOutcome::Superseded),
            Err(source) => {
                error!(%page, error = %source, "failed to fetch page fragment");
                return Err(NavigationError::Fetch {
                    page: page.clone(),
                    source,
                });
            }
        };

        let fragment = rewrite_relative_links(&html);
        let behavior = self.behaviors.get(page);
        {
            let mut state = self.lock_state();
            if !self.is_latest(generation) {
                debug!(%page, generation, "discarding superseded page load");
                return Ok(LoadOutcome::Superseded);
            }
            self.document.replace_content(fragment);
            state.current = Some(page.clone());
            state.active = behavior.clone();
            if mode == HistoryMode::Push && self.history.current().page() != Some(page) {
                self.history
                    .push(HistoryEntry::for_page(page.clone()), &page.url_path());
            }
        }
        self.events.publish(ShellEvent::DocumentChanged);
        info!(%page, "page loaded");

        if let Some(behavior) = behavior {
            let ctx = PageContext::new(
                page.clone(),
                self.document.clone(),
                generation,
                Arc::clone(&self.latest),
            );
            if let Err(source) = behavior.init(&ctx).await {
                if !ctx.is_current() {
                    return Ok(LoadOutcome::Superseded);
                }
                error!(%page, error = %source, "page behavior failed to initialize");
                return Err(NavigationError::Behavior {
                    page: page.clone(),
                    source,
                });
            }
        }

        if !self.is_latest(generation) {
            return Ok(LoadOutcome::Superseded);
        }
        self.events.publish(ShellEvent::PageReady(page.clone()));
        Ok(LoadOutcome::Loaded)
    }
}
