//! Per-page behavior: initialization logic run once a page's fragment is in
//! the content region, and torn down when the page is replaced.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use qshell_core::model::PageName;

use crate::document::ShellDocument;
use crate::error::{BehaviorError, DocumentError};

#[async_trait]
pub trait PageBehavior: Send + Sync {
    /// Runs after the page's fragment was inserted. The page-ready signal is
    /// published once this returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns `BehaviorError` if the page could not be initialized.
    async fn init(&self, ctx: &PageContext) -> Result<(), BehaviorError>;

    /// Release anything `init` set up. Called when the page is unloaded.
    fn teardown(&self) {}
}

/// Page name → behavior mapping.
#[derive(Clone, Default)]
pub struct BehaviorRegistry {
    behaviors: Arc<RwLock<HashMap<PageName, Arc<dyn PageBehavior>>>>,
}

impl BehaviorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the behavior of `page`.
    pub fn register(&self, page: PageName, behavior: Arc<dyn PageBehavior>) {
        self.behaviors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(page, behavior);
    }

    #[must_use]
    pub fn get(&self, page: &PageName) -> Option<Arc<dyn PageBehavior>> {
        self.behaviors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(page)
            .cloned()
    }
}

/// What a behavior may touch while its page is current.
///
/// Every mutation checks that the load this context belongs to has not been
/// superseded by a newer navigation.
#[derive(Clone)]
pub struct PageContext {
    page: PageName,
    document: ShellDocument,
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl PageContext {
    pub(crate) fn new(
        page: PageName,
        document: ShellDocument,
        generation: u64,
        latest: Arc<AtomicU64>,
    ) -> Self {
        Self {
            page,
            document,
            generation,
            latest,
        }
    }

    #[must_use]
    pub fn page(&self) -> &PageName {
        &self.page
    }

    #[must_use]
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }

    /// Update the document title shown by the shell.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Superseded` if a newer load started.
    pub fn set_title(&self, title: &str) -> Result<(), DocumentError> {
        if !self.is_current() {
            return Err(DocumentError::Superseded);
        }
        self.document.set_title(title);
        Ok(())
    }

    #[must_use]
    pub fn has_element(&self, id: &str) -> bool {
        self.document.has_element(id)
    }

    /// Handle on element `id` of this page's content.
    #[must_use]
    pub fn element(&self, id: &str) -> ElementHandle {
        ElementHandle {
            id: id.to_owned(),
            document: self.document.clone(),
            guard: Some((self.generation, Arc::clone(&self.latest))),
        }
    }
}

/// A target element inside the content region.
#[derive(Clone)]
pub struct ElementHandle {
    id: String,
    document: ShellDocument,
    guard: Option<(u64, Arc<AtomicU64>)>,
}

impl ElementHandle {
    /// Handle not bound to any page load.
    #[must_use]
    pub fn detached(document: ShellDocument, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            document,
            guard: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replace the element's children with `markup`.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError` if the owning load was superseded or the
    /// element is gone; the content region is left unchanged.
    pub fn set_inner_html(&self, markup: &str) -> Result<(), DocumentError> {
        if let Some((generation, latest)) = &self.guard {
            if latest.load(Ordering::Acquire) != *generation {
                return Err(DocumentError::Superseded);
            }
        }
        self.document.fill_element(&self.id, markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qshell_core::markup::rewrite_relative_links;

    struct Noop;

    #[async_trait]
    impl PageBehavior for Noop {
        async fn init(&self, _ctx: &PageContext) -> Result<(), BehaviorError> {
            Ok(())
        }
    }

    #[test]
    fn registry_replaces_behaviors() {
        let registry = BehaviorRegistry::new();
        let page = PageName::new("home").unwrap();
        assert!(registry.get(&page).is_none());
        registry.register(page.clone(), Arc::new(Noop));
        registry.register(page.clone(), Arc::new(Noop));
        assert!(registry.get(&page).is_some());
    }

    #[test]
    fn stale_context_cannot_mutate_document() {
        let document = ShellDocument::new();
        document.replace_content(rewrite_relative_links(r#"<div id="slot"></div>"#));
        let latest = Arc::new(AtomicU64::new(1));
        let ctx = PageContext::new(
            PageName::new("home").unwrap(),
            document.clone(),
            1,
            Arc::clone(&latest),
        );
        assert!(ctx.has_element("slot"));
        ctx.element("slot").set_inner_html("<p>1</p>").unwrap();

        latest.store(2, Ordering::Release);
        assert!(!ctx.is_current());
        assert_eq!(
            ctx.element("slot").set_inner_html("<p>2</p>"),
            Err(DocumentError::Superseded)
        );
        assert_eq!(ctx.set_title("x"), Err(DocumentError::Superseded));
        assert_eq!(document.content(), r#"<div id="slot"><p>1</p></div>"#);
    }

    #[test]
    fn has_element_ignores_data_id_attributes() {
        let document = ShellDocument::new();
        document.replace_content(rewrite_relative_links(
            r#"<div data-id="questionnaire"></div><p id='other'></p>"#,
        ));
        let ctx = PageContext::new(
            PageName::new("questionnaire").unwrap(),
            document,
            1,
            Arc::new(AtomicU64::new(1)),
        );
        assert!(!ctx.has_element("questionnaire"));
        assert!(ctx.has_element("other"));
    }
}
