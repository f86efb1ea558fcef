//! HTTP client for the `recipes-server` remote store.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use super::error::RemoteError;
use super::protocol::{CreateRequest, Envelope, HealthResponse};
use super::RemoteStore;
use crate::models::{Recipe, RecipePatch};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote store reached over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    server_url: String,
    client: Client,
}

impl HttpRemote {
    /// Creates a client for `server_url` with the default timeout.
    pub fn new(server_url: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(server_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client whose requests give up after `timeout`.
    pub fn with_timeout(
        server_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        Ok(Self {
            server_url: server_url.into(),
            client,
        })
    }

    /// Returns the server URL.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Returns true if `GET /health` answers successfully.
    pub async fn check(&self) -> bool {
        let response = match self.client.get(self.build_url("/health")).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("health check failed: {}", e);
                return false;
            }
        };

        if !response.status().is_success() {
            return false;
        }

        response.json::<HealthResponse>().await.is_ok()
    }

    /// Builds the full URL for a path on the server.
    fn build_url(&self, path: &str) -> String {
        let base = self.server_url.trim_end_matches('/');
        let base = if base.starts_with("http://") || base.starts_with("https://") {
            base.to_string()
        } else {
            format!("http://{}", base)
        };
        format!("{}{}", base, path)
    }

    fn recipe_url(&self, id: &str) -> String {
        self.build_url(&format!("/recipes/{}", urlencoding::encode(id)))
    }

    /// Sends a request and unwraps the response envelope.
    ///
    /// Error payloads win over the HTTP status, so a 500 that explains
    /// itself is reported with its message.
    async fn execute(&self, request: RequestBuilder) -> Result<Option<Value>, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let envelope: Option<Envelope<Value>> = serde_json::from_str(&body).ok();

        if let Some(message) = envelope.as_ref().and_then(|e| e.first_error()) {
            return Err(RemoteError::Server(message.to_string()));
        }
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        match envelope {
            Some(envelope) => Ok(envelope.data),
            None => Err(RemoteError::Decode(
                "response is not a JSON envelope".to_string(),
            )),
        }
    }
}

impl RemoteStore for HttpRemote {
    async fn list(&self) -> Result<Vec<Recipe>, RemoteError> {
        let data = self
            .execute(self.client.get(self.build_url("/recipes")))
            .await?;

        data.as_ref()
            .and_then(Recipe::list_from_value)
            .ok_or_else(|| RemoteError::Decode("expected a list of recipes".to_string()))
    }

    async fn create(&self, title: &str) -> Result<Recipe, RemoteError> {
        let body = CreateRequest {
            title: title.to_string(),
            steps: Vec::new(),
            done: Vec::new(),
            image: None,
        };

        let data = self
            .execute(self.client.post(self.build_url("/recipes")).json(&body))
            .await?;

        data.as_ref()
            .and_then(Recipe::from_value)
            .ok_or_else(|| RemoteError::Decode("expected the created recipe".to_string()))
    }

    async fn patch(&self, id: &str, patch: &RecipePatch) -> Result<(), RemoteError> {
        self.execute(self.client.patch(self.recipe_url(id)).json(patch))
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.execute(self.client.delete(self.recipe_url(id)))
            .await?;
        Ok(())
    }
}
