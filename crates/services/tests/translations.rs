mod common;

use std::sync::Arc;
use std::time::Duration;

use qshell_core::model::LanguageCode;
use qshell_core::time::fixed_clock;
use reqwest::Client;
use serde_json::json;
use services::i18n::LANGUAGE_COOKIE;
use services::{CookieStore, EventBus, HttpAssets, ShellEvent, TranslationCache};
use storage::repository::InMemoryRepository;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::base_url;

fn lang(raw: &str) -> LanguageCode {
    LanguageCode::new(raw).unwrap()
}

struct Fixture {
    cache: Arc<TranslationCache>,
    cookies: CookieStore,
    events: EventBus,
}

fn cache_for(server: &MockServer, system_locale: Option<LanguageCode>) -> Fixture {
    let cookies = CookieStore::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
    let events = EventBus::new();
    let cache = Arc::new(TranslationCache::new(
        Arc::new(HttpAssets::new(Client::new(), base_url(server))),
        cookies.clone(),
        events.clone(),
        LanguageCode::english(),
        system_locale,
    ));
    Fixture {
        cache,
        cookies,
        events,
    }
}

async fn serve(server: &MockServer, language: &str, table: serde_json::Value) {
    let file = format!("/translations/{language}.json");
    Mock::given(method("HEAD"))
        .and(path(file.as_str()))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(file.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(table))
        .mount(server)
        .await;
}

#[tokio::test]
async fn falls_back_to_default_language_then_key() {
    let server = MockServer::start().await;
    serve(&server, "en", json!({"hello": "Hi", "bye": "Bye"})).await;
    let fx = cache_for(&server, Some(lang("fr")));

    assert_eq!(fx.cache.resolve_language().await, lang("fr"));
    fx.cache.load_language_data(&lang("en"), false).await;

    assert!(!fx.cache.is_language_loaded(Some(&lang("fr"))));
    assert_eq!(fx.cache.translate("hello"), "Hi");
    assert_eq!(fx.cache.translate("missing"), "missing");
}

#[tokio::test]
async fn cookie_preference_wins_and_loads_both_tables() {
    let server = MockServer::start().await;
    serve(&server, "en", json!({"hello": "Hi", "bye": "Bye"})).await;
    serve(&server, "fi", json!({"hello": "Moi", "bye": ""})).await;
    let fx = cache_for(&server, Some(lang("sv")));
    fx.cookies.set(LANGUAGE_COOKIE, "fi", 365).await.unwrap();

    let resolved = fx.cache.resolve_language().await;
    assert_eq!(resolved, lang("fi"));
    fx.cache.verify_language(&resolved).await;

    assert!(fx.cache.is_language_loaded(Some(&lang("fi"))));
    assert!(fx.cache.is_language_loaded(Some(&lang("en"))));
    assert_eq!(fx.cache.translate("hello"), "Moi");
    assert_eq!(fx.cache.translate("bye"), "Bye");
}

#[tokio::test]
async fn missing_language_falls_back_and_is_persisted() {
    let server = MockServer::start().await;
    serve(&server, "en", json!({"hello": "Hi"})).await;
    let fx = cache_for(&server, Some(lang("de")));
    let mut events = fx.events.subscribe();

    let resolved = fx.cache.current_language().await;
    assert_eq!(resolved, lang("de"));

    let loaded = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("language loaded in time")
        .unwrap();

    assert_eq!(loaded, ShellEvent::LanguageLoaded(lang("en")));
    assert_eq!(fx.cache.language(), lang("en"));
    assert_eq!(
        fx.cookies.get(LANGUAGE_COOKIE).await.unwrap().as_deref(),
        Some("en")
    );
    assert_eq!(fx.cache.translate("hello"), "Hi");
}

#[tokio::test]
async fn tables_load_once_unless_forced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translations/en.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hello": "Hi"})))
        .expect(2)
        .mount(&server)
        .await;
    let fx = cache_for(&server, None);
    assert!(!fx.cache.is_language_loaded(None));

    fx.cache.load_language_data(&lang("en"), false).await;
    fx.cache.load_language_data(&lang("en"), false).await;
    fx.cache.load_language_data(&lang("en"), true).await;

    assert!(fx.cache.is_language_loaded(None));
}

#[tokio::test]
async fn failed_load_is_reported_not_raised() {
    let server = MockServer::start().await;
    let fx = cache_for(&server, None);

    fx.cache.load_language_data(&lang("en"), false).await;

    assert!(!fx.cache.is_language_loaded(None));
    assert_eq!(fx.cache.translate("hello"), "hello");
}
