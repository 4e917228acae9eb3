//! Shared error types for the services crate.

use thiserror::Error;

use qshell_core::model::{PageName, PageNameError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Failure loading content, templates, data or translation files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("request for {url} failed with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors emitted by `AuthSession::login`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("authentication failed with status {0}")]
    Authentication(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors raised while mutating the shell document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("no element with id {0:?} in the content region")]
    MissingElement(String),
    #[error("page load was superseded")]
    Superseded,
}

/// Errors emitted by a page behavior's initializer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BehaviorError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("{0}")]
    Failed(String),
}

/// Errors emitted by `PageNavigator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("failed to fetch page {page}: {source}")]
    Fetch {
        page: PageName,
        #[source]
        source: FetchError,
    },
    #[error("behavior of page {page} failed: {source}")]
    Behavior {
        page: PageName,
        #[source]
        source: BehaviorError,
    },
}

/// Errors emitted by `QuestionnaireRenderer`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionnaireError {
    #[error("failed to load questionnaire data: {0}")]
    Data(#[source] FetchError),
    #[error("failed to load template {path}: {source}")]
    Template {
        path: &'static str,
        #[source]
        source: FetchError,
    },
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Errors emitted by `TranslationCache` when persisting a preference.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TranslationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuestionnaireApi`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Page(#[from] PageNameError),
}
