use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use qshell_core::Clock;
use qshell_core::model::{Claims, decode_claims};
use reqwest::Client;
use serde::Deserialize;
use storage::repository::TokenRepository;
use tracing::{debug, info, warn};
use url::Url;

use crate::document::{SessionView, ShellDocument};
use crate::error::AuthError;
use crate::events::{EventBus, ShellEvent};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Bearer-token session of the current user.
///
/// The token is mirrored in memory so the identity queries stay synchronous;
/// the token repository is the persisted copy. A stored token that could not
/// be cleared on logout is cleared again before the next restore reads it.
pub struct AuthSession {
    client: Client,
    token_url: Url,
    tokens: Arc<dyn TokenRepository>,
    document: ShellDocument,
    events: EventBus,
    clock: Clock,
    token: RwLock<Option<String>>,
    clear_pending: AtomicBool,
}

impl AuthSession {
    #[must_use]
    pub fn new(
        client: Client,
        token_url: Url,
        tokens: Arc<dyn TokenRepository>,
        document: ShellDocument,
        events: EventBus,
        clock: Clock,
    ) -> Self {
        Self {
            client,
            token_url,
            tokens,
            document,
            events,
            clock,
            token: RwLock::new(None),
            clear_pending: AtomicBool::new(false),
        }
    }

    /// Load the persisted token (if any) and sync the UI to it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the token cannot be read, or if a
    /// token left behind by a failed logout still cannot be cleared. The
    /// session stays logged out in both cases.
    pub async fn restore(&self) -> Result<(), AuthError> {
        if self.clear_pending.load(Ordering::Acquire) {
            self.tokens.clear_token().await?;
            self.clear_pending.store(false, Ordering::Release);
            info!("cleared token left over from logout");
        }
        let stored = self.tokens.get_token().await?;
        self.set_token(stored);
        self.sync_ui();
        Ok(())
    }

    /// Exchange credentials for a bearer token at the token endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Authentication` on a non-2xx answer, in which case
    /// nothing is stored. Transport and storage failures are returned as is.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let response = self
            .client
            .post(self.token_url.clone())
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "login rejected");
            return Err(AuthError::Authentication(response.status()));
        }

        let body: TokenResponse = response.json().await?;
        self.tokens.save_token(&body.access_token).await?;
        self.clear_pending.store(false, Ordering::Release);
        self.set_token(Some(body.access_token.clone()));
        info!(user = username, "logged in");
        self.sync_ui();
        Ok(body.access_token)
    }

    /// Forget the token. Never fails; storage errors are only reported.
    pub async fn logout(&self) {
        if let Err(err) = self.tokens.clear_token().await {
            self.clear_pending.store(true, Ordering::Release);
            warn!(
                error = %err,
                "failed to clear stored token; it stays persisted until the next restore clears it"
            );
        }
        self.set_token(None);
        info!("logged out");
        self.sync_ui();
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Raw bearer token, for authenticated requests.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Claims of a present, well-formed and unexpired token.
    #[must_use]
    pub fn claims(&self) -> Option<Claims> {
        let token = self.token()?;
        match decode_claims(&token) {
            Ok(claims) if claims.is_expired(self.clock.unix_seconds()) => {
                debug!("stored token has expired");
                None
            }
            Ok(claims) => Some(claims),
            Err(err) => {
                debug!(error = %err, "stored token is malformed");
                None
            }
        }
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.claims().is_some()
    }

    #[must_use]
    pub fn current_username(&self) -> Option<String> {
        self.claims().and_then(|claims| claims.subject)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.claims().is_some_and(|claims| claims.is_admin)
    }

    /// Recompute region visibility and the admin rule from the current
    /// claims. Replaces the previous view; safe to call repeatedly.
    pub fn sync_ui(&self) -> SessionView {
        let view = match self.claims() {
            Some(claims) => SessionView::logged_in(claims.subject, claims.is_admin),
            None => SessionView::logged_out(),
        };
        self.document.set_session_view(view.clone());
        self.events.publish(ShellEvent::SessionChanged);
        view
    }
}
