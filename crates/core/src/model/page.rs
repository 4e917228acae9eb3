use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PageNameError {
    #[error("page name is empty")]
    Empty,
    #[error("page name contains invalid character {0:?}")]
    InvalidCharacter(char),
}

fn is_reserved(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            '/' | '\\' | '?' | '#' | '.' | ':' | '"' | '\'' | '<' | '>' | '&'
        )
}

/// Logical page identifier; names a `content/<name>.html` fragment on the asset host.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageName(String);

impl PageName {
    /// Validate a raw page name.
    ///
    /// # Errors
    ///
    /// Returns `PageNameError` if the name is blank or contains path, query,
    /// extension or whitespace characters.
    pub fn new(raw: impl Into<String>) -> Result<Self, PageNameError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PageNameError::Empty);
        }
        if let Some(ch) = trimmed
            .chars()
            .find(|ch| is_reserved(*ch))
        {
            return Err(PageNameError::InvalidCharacter(ch));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Resolve the target page of a link, if the link is same-origin relative.
    ///
    /// Absolute paths, links with a scheme and bare anchors are left to the
    /// browser. The extension is stripped: `about.html` names page `about`.
    #[must_use]
    pub fn from_href(href: &str) -> Option<Self> {
        let href = href.trim();
        if href.is_empty()
            || href.starts_with('/')
            || href.starts_with('#')
            || href.starts_with("http://")
            || href.starts_with("https://")
        {
            return None;
        }
        let mut stem = href.split(['?', '#']).next().unwrap_or(href);
        while let Some(rest) = stem.strip_prefix("./") {
            stem = rest;
        }
        if stem.contains(':') {
            return None;
        }
        let name = stem.split('.').next().unwrap_or(stem);
        Self::new(name).ok()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Asset path of the page fragment.
    #[must_use]
    pub fn fragment_path(&self) -> String {
        format!("content/{}.html", self.0)
    }

    /// Visible URL shown while the page is current.
    #[must_use]
    pub fn url_path(&self) -> String {
        format!("{}.html", self.0)
    }
}

impl fmt::Debug for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageName({})", self.0)
    }
}

impl fmt::Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PageName {
    type Error = PageNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageName> for String {
    fn from(value: PageName) -> Self {
        value.0
    }
}

/// State carried by a browser history entry: `{page: <name>}`, or `{}` for
/// the statically served document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page: Option<PageName>,
}

impl HistoryEntry {
    #[must_use]
    pub fn empty() -> Self {
        Self { page: None }
    }

    #[must_use]
    pub fn for_page(page: PageName) -> Self {
        Self { page: Some(page) }
    }

    #[must_use]
    pub fn page(&self) -> Option<&PageName> {
        self.page.as_ref()
    }
}

/// A relative link found in a fragment and routed through the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub href: String,
    pub page: PageName,
}
