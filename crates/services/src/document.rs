//! The shell's document model: content region, title and session view.
//!
//! The UI renders snapshots of this state; services mutate it only through
//! the methods below.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use qshell_core::markup::{
    RewrittenFragment, element_exists, fill_element, rewrite_relative_links,
};
use qshell_core::model::PageLink;

use crate::error::DocumentError;

pub const ADMIN_VISIBLE_RULE: &str = ".adminOnly { display: block !important; }";
pub const ADMIN_HIDDEN_RULE: &str = ".adminOnly { display: none !important; }";

/// Visibility of the login-dependent regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub login_visible: bool,
    pub logout_visible: bool,
    pub username_visible: bool,
    pub username: Option<String>,
    /// The single managed rule controlling `.adminOnly` elements.
    pub admin_rule: &'static str,
}

impl SessionView {
    #[must_use]
    pub fn logged_out() -> Self {
        Self {
            login_visible: true,
            logout_visible: false,
            username_visible: false,
            username: None,
            admin_rule: ADMIN_HIDDEN_RULE,
        }
    }

    #[must_use]
    pub fn logged_in(username: Option<String>, is_admin: bool) -> Self {
        Self {
            login_visible: false,
            logout_visible: true,
            username_visible: true,
            username,
            admin_rule: if is_admin {
                ADMIN_VISIBLE_RULE
            } else {
                ADMIN_HIDDEN_RULE
            },
        }
    }
}

impl Default for SessionView {
    fn default() -> Self {
        Self::logged_out()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub content: String,
    pub links: Vec<PageLink>,
    pub title: String,
    pub session: SessionView,
}

#[derive(Clone, Default)]
pub struct ShellDocument {
    inner: Arc<Mutex<DocumentSnapshot>>,
}

impl ShellDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DocumentSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> DocumentSnapshot {
        self.lock().clone()
    }

    #[must_use]
    pub fn content(&self) -> String {
        self.lock().content.clone()
    }

    #[must_use]
    pub fn links(&self) -> Vec<PageLink> {
        self.lock().links.clone()
    }

    pub fn replace_content(&self, fragment: RewrittenFragment) {
        let mut state = self.lock();
        state.content = fragment.markup;
        state.links = fragment.links;
    }

    /// Empty the content region. Clearing an empty region is a no-op.
    pub fn clear_content(&self) {
        let mut state = self.lock();
        state.content.clear();
        state.links.clear();
    }

    /// Whether the content region holds an element with this exact `id`.
    #[must_use]
    pub fn has_element(&self, id: &str) -> bool {
        element_exists(&self.lock().content, id)
    }

    /// Replace the children of element `id`, re-marking any relative links
    /// the new markup brings along.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::MissingElement` and leaves the region
    /// untouched when the element is not present.
    pub fn fill_element(&self, id: &str, inner: &str) -> Result<(), DocumentError> {
        let mut state = self.lock();
        let filled = fill_element(&state.content, id, inner)
            .ok_or_else(|| DocumentError::MissingElement(id.to_owned()))?;
        let fragment = rewrite_relative_links(&filled);
        state.content = fragment.markup;
        state.links = fragment.links;
        Ok(())
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    pub fn set_title(&self, title: &str) {
        self.lock().title = title.to_owned();
    }

    #[must_use]
    pub fn session_view(&self) -> SessionView {
        self.lock().session.clone()
    }

    pub fn set_session_view(&self, view: SessionView) {
        self.lock().session = view;
    }
}
