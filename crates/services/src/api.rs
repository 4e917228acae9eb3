use std::collections::HashMap;
use std::sync::Arc;

use qshell_core::model::{NewQuestion, Question, QuestionUpdate, UserProfile};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::auth::AuthSession;
use crate::config::ShellConfig;
use crate::error::ApiError;

/// Authenticated client for the question editing endpoints.
pub struct QuestionnaireApi {
    client: Client,
    config: ShellConfig,
    auth: Arc<AuthSession>,
}

impl QuestionnaireApi {
    #[must_use]
    pub fn new(client: Client, config: ShellConfig, auth: Arc<AuthSession>) -> Self {
        Self {
            client,
            config,
            auth,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, url = %response.url(), "api request rejected");
            return Err(ApiError::Status(status));
        }
        Ok(response.json().await?)
    }

    /// `PUT /update_question`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures and non-2xx answers.
    pub async fn update_question(&self, update: &QuestionUpdate) -> Result<Question, ApiError> {
        let url = self.config.api_endpoint("update_question")?;
        self.send(self.client.put(url).json(update)).await
    }

    /// `POST /create_question`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures and non-2xx answers.
    pub async fn create_question(&self, question: &NewQuestion) -> Result<Question, ApiError> {
        let url = self.config.api_endpoint("create_question")?;
        self.send(self.client.post(url).json(question)).await
    }

    /// `DELETE /delete_question/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures and non-2xx answers.
    pub async fn delete_question(
        &self,
        question_id: i64,
    ) -> Result<HashMap<String, String>, ApiError> {
        let url = self
            .config
            .api_endpoint(&format!("delete_question/{question_id}"))?;
        self.send(self.client.delete(url)).await
    }

    /// `GET /users/me`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures and non-2xx answers.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let url = self.config.api_endpoint("users/me")?;
        self.send(self.client.get(url)).await
    }
}
