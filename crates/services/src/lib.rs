#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod assets;
pub mod auth;
pub mod behavior;
pub mod config;
pub mod cookies;
pub mod document;
pub mod error;
pub mod events;
pub mod history;
pub mod i18n;
pub mod navigator;
pub mod questionnaire;

pub use qshell_core::Clock;

pub use api::QuestionnaireApi;
pub use app_services::AppServices;
pub use assets::{AssetFetcher, HttpAssets};
pub use auth::AuthSession;
pub use behavior::{BehaviorRegistry, ElementHandle, PageBehavior, PageContext};
pub use config::ShellConfig;
pub use cookies::CookieStore;
pub use document::{DocumentSnapshot, SessionView, ShellDocument};
pub use error::{
    ApiError, AppServicesError, AuthError, BehaviorError, ConfigError, DocumentError, FetchError,
    NavigationError, QuestionnaireError, TranslationError,
};
pub use events::{EventBus, ShellEvent};
pub use history::{HistoryPort, SessionHistory};
pub use i18n::TranslationCache;
pub use navigator::{LoadOutcome, PageNavigator};
pub use questionnaire::{QuestionnaireBehavior, QuestionnaireRenderer};
