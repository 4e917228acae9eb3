#![allow(dead_code)]

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use qshell_core::time::fixed_clock;
use reqwest::Client;
use serde_json::Value;
use services::{AuthSession, EventBus, ShellDocument};
use storage::repository::InMemoryRepository;
use url::Url;
use wiremock::MockServer;

/// Unsigned JWT carrying `claims`.
pub fn token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

pub fn base_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).unwrap()
}

pub struct AuthFixture {
    pub auth: Arc<AuthSession>,
    pub repo: Arc<InMemoryRepository>,
    pub document: ShellDocument,
    pub events: EventBus,
}

pub fn auth_for(server: &MockServer) -> AuthFixture {
    let repo = Arc::new(InMemoryRepository::new());
    let document = ShellDocument::new();
    let events = EventBus::new();
    let auth = Arc::new(AuthSession::new(
        Client::new(),
        base_url(server).join("token").unwrap(),
        repo.clone(),
        document.clone(),
        events.clone(),
        fixed_clock(),
    ));
    AuthFixture {
        auth,
        repo,
        document,
        events,
    }
}
