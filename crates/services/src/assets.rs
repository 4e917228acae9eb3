use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::FetchError;

/// Read access to the static asset host (fragments, templates, translations).
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// `GET` the asset at `path`, relative to the asset root.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport failures and non-2xx responses.
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;

    /// `HEAD` the asset at `path`; a non-2xx answer means it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` only when the host cannot be reached.
    async fn exists(&self, path: &str) -> Result<bool, FetchError>;
}

#[derive(Clone)]
pub struct HttpAssets {
    client: Client,
    base: Url,
}

impl HttpAssets {
    #[must_use]
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    fn url(&self, path: &str) -> Result<Url, FetchError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl AssetFetcher for HttpAssets {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url(path)?;
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }
        Ok(response.text().await?)
    }

    async fn exists(&self, path: &str) -> Result<bool, FetchError> {
        let response = self.client.head(self.url(path)?).send().await?;
        Ok(response.status().is_success())
    }
}
