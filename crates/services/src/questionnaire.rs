use std::sync::Arc;

use async_trait::async_trait;
use qshell_core::model::Questionnaire;
use qshell_core::template::QuestionnaireTemplates;
use reqwest::Client;
use tracing::{debug, error};
use url::Url;

use crate::assets::AssetFetcher;
use crate::auth::AuthSession;
use crate::behavior::{ElementHandle, PageBehavior, PageContext};
use crate::error::{BehaviorError, DocumentError, FetchError, QuestionnaireError};

pub const GROUP_TEMPLATE_PATH: &str = "content/_question-group-template.html";
pub const QUESTION_TEMPLATE_PATH: &str = "content/_question-template.html";

/// Page whose behavior renders the questionnaire.
pub const QUESTIONNAIRE_PAGE: &str = "questionnaire";
/// Element of that page receiving the rendered groups.
pub const QUESTIONNAIRE_ELEMENT: &str = "questionnaire";
pub const QUESTIONNAIRE_TITLE: &str = "Questionnaire";

/// Expands `GET /get_data` against the group and question templates.
pub struct QuestionnaireRenderer {
    client: Client,
    data_url: Url,
    assets: Arc<dyn AssetFetcher>,
    auth: Arc<AuthSession>,
}

impl QuestionnaireRenderer {
    #[must_use]
    pub fn new(
        client: Client,
        data_url: Url,
        assets: Arc<dyn AssetFetcher>,
        auth: Arc<AuthSession>,
    ) -> Self {
        Self {
            client,
            data_url,
            assets,
            auth,
        }
    }

    async fn fetch_data(&self) -> Result<Questionnaire, FetchError> {
        let mut request = self.client.get(self.data_url.clone());
        if let Some(token) = self.auth.token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: self.data_url.to_string(),
                status: response.status(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_template(&self, path: &'static str) -> Result<String, QuestionnaireError> {
        self.assets
            .fetch_text(path)
            .await
            .map_err(|source| QuestionnaireError::Template { path, source })
    }

    /// Fetch data and both templates, and assemble the questionnaire markup.
    ///
    /// # Errors
    ///
    /// Returns `QuestionnaireError` if any of the three requests fails.
    pub async fn build(&self) -> Result<String, QuestionnaireError> {
        let (questionnaire, group, question) = tokio::try_join!(
            async { self.fetch_data().await.map_err(QuestionnaireError::Data) },
            self.fetch_template(GROUP_TEMPLATE_PATH),
            self.fetch_template(QUESTION_TEMPLATE_PATH),
        )?;
        debug!(
            groups = questionnaire.question_groups.len(),
            "rendering questionnaire"
        );
        Ok(QuestionnaireTemplates::new(group, question).render(&questionnaire))
    }

    /// Replace the children of `target` with the rendered questionnaire.
    ///
    /// # Errors
    ///
    /// Returns `QuestionnaireError` on any failure, after logging it;
    /// `target` is not modified then.
    pub async fn render(&self, target: &ElementHandle) -> Result<(), QuestionnaireError> {
        let result = match self.build().await {
            Ok(markup) => target.set_inner_html(&markup).map_err(Into::into),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            error!(element = target.id(), error = %err, "failed to render questionnaire");
        }
        result
    }
}

/// Behavior of the questionnaire page.
pub struct QuestionnaireBehavior {
    renderer: Arc<QuestionnaireRenderer>,
}

impl QuestionnaireBehavior {
    #[must_use]
    pub fn new(renderer: Arc<QuestionnaireRenderer>) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl PageBehavior for QuestionnaireBehavior {
    async fn init(&self, ctx: &PageContext) -> Result<(), BehaviorError> {
        ctx.set_title(QUESTIONNAIRE_TITLE)?;
        if !ctx.has_element(QUESTIONNAIRE_ELEMENT) {
            return Ok(());
        }
        match self.renderer.render(&ctx.element(QUESTIONNAIRE_ELEMENT)).await {
            Err(QuestionnaireError::Document(DocumentError::Superseded)) => {
                Err(DocumentError::Superseded.into())
            }
            // Render failures are logged by the renderer.
            Ok(()) | Err(_) => Ok(()),
        }
    }
}
