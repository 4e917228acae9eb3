use std::env;

use qshell_core::model::{LanguageCode, PageName};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/";
pub const DEFAULT_ASSETS_URL: &str = "http://localhost:8080/";

/// Runtime configuration of the shell.
#[derive(Clone, Debug)]
pub struct ShellConfig {
    /// Token and data API (`/token`, `/get_data`, ...).
    pub api_url: Url,
    /// Host serving fragments, templates and translation files.
    pub assets_url: Url,
    pub default_language: LanguageCode,
    /// Locale reported by the runtime, used when no preference cookie exists.
    pub system_locale: Option<LanguageCode>,
    /// Pages linked from the shell's navigation bar.
    pub navigation: Vec<PageName>,
    /// Languages offered by the language picker.
    pub languages: Vec<LanguageCode>,
}

impl ShellConfig {
    /// Configuration with default endpoints and no reported locale.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` only if the built-in defaults fail to parse.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_base("QSHELL_API_URL", DEFAULT_API_URL)?,
            assets_url: parse_base("QSHELL_ASSETS_URL", DEFAULT_ASSETS_URL)?,
            default_language: LanguageCode::english(),
            system_locale: None,
            navigation: Vec::new(),
            languages: vec![LanguageCode::english()],
        })
    }

    /// Read `QSHELL_*` variables and the POSIX locale variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a URL, language or page list is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new()?;
        if let Ok(raw) = env::var("QSHELL_API_URL") {
            config.api_url = parse_base("QSHELL_API_URL", &raw)?;
        }
        if let Ok(raw) = env::var("QSHELL_ASSETS_URL") {
            config.assets_url = parse_base("QSHELL_ASSETS_URL", &raw)?;
        }
        if let Ok(raw) = env::var("QSHELL_DEFAULT_LANGUAGE") {
            config.default_language =
                LanguageCode::new(&raw).map_err(|_| ConfigError::InvalidValue {
                    var: "QSHELL_DEFAULT_LANGUAGE",
                    value: raw.clone(),
                })?;
        }
        if let Ok(raw) = env::var("QSHELL_PAGES") {
            config.navigation = parse_list("QSHELL_PAGES", &raw, |item| PageName::new(item).ok())?;
        }
        if let Ok(raw) = env::var("QSHELL_LANGUAGES") {
            config.languages =
                parse_list("QSHELL_LANGUAGES", &raw, |item| LanguageCode::new(item).ok())?;
        }
        config.system_locale = ["LC_ALL", "LC_MESSAGES", "LANG"]
            .into_iter()
            .filter_map(|var| env::var(var).ok())
            .find_map(|raw| LanguageCode::from_locale(&raw));
        Ok(config)
    }

    #[must_use]
    pub fn with_api_url(mut self, url: Url) -> Self {
        self.api_url = ensure_trailing_slash(url);
        self
    }

    #[must_use]
    pub fn with_assets_url(mut self, url: Url) -> Self {
        self.assets_url = ensure_trailing_slash(url);
        self
    }

    #[must_use]
    pub fn with_system_locale(mut self, locale: Option<LanguageCode>) -> Self {
        self.system_locale = locale;
        self
    }

    #[must_use]
    pub fn with_navigation(mut self, pages: Vec<PageName>) -> Self {
        self.navigation = pages;
        self
    }

    /// Resolve an API endpoint such as `token` or `get_data`.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if `path` cannot be joined onto the base.
    pub fn api_endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.api_url.join(path.trim_start_matches('/'))
    }
}

fn parse_base(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim())
        .map(ensure_trailing_slash)
        .map_err(|source| ConfigError::InvalidUrl { var, source })
}

// `Url::join` replaces the last path segment unless the base ends with `/`.
fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_list<T>(
    var: &'static str,
    raw: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            parse(item).ok_or_else(|| ConfigError::InvalidValue {
                var,
                value: item.to_owned(),
            })
        })
        .collect()
}
