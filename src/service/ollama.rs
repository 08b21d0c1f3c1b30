//! Ollama native-API client implementing [`CorrectionService`].
//!
//! Endpoints used:
//! * `GET /api/tags`  — reachability probe at startup.
//! * `POST /api/show` — model presence probe at startup (404 ⇒ missing).
//! * `POST /api/chat` — the correction call, with a structured-output
//!   `format` schema so the reply parses directly into
//!   [`CorrectionReport`](super::CorrectionReport).

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::ServiceConfig;

use super::types::{response_schema, CorrectionReport};
use super::{CorrectionService, ServiceError};

// ---------------------------------------------------------------------------
// OllamaClient
// ---------------------------------------------------------------------------

/// Talks to a local (or remote) Ollama instance.
///
/// All connection details (`base_url`, `model`, `prompt`) come from
/// [`ServiceConfig`]; nothing is hardcoded.
pub struct OllamaClient {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl OllamaClient {
    /// Build a client from application config.
    ///
    /// Only a *connect* timeout is set — the correction call itself has no
    /// deadline, because supersession (cancellation) is the only thing that
    /// abandons it. A default client is the last-resort fallback if the
    /// builder fails (should never happen in practice).
    pub fn from_config(config: &ServiceConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// The chat exchange, separated out so `correct` can race it against the
    /// cancellation token. Dropping this future aborts the HTTP call.
    async fn request_correction(&self, text: &str) -> Result<CorrectionReport, ServiceError> {
        let url = format!("{}/api/chat", self.config.base_url);

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "user", "content": self.config.prompt },
                { "role": "user", "content": text }
            ],
            "stream": false,
            "format": response_schema()
        });

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(ServiceError::InvalidResponse(format!(
                "chat endpoint returned {}",
                response.status()
            )));
        }

        let reply: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        let content = reply["message"]["content"]
            .as_str()
            .ok_or_else(|| ServiceError::InvalidResponse("reply has no message content".into()))?;

        serde_json::from_str(content)
            .map_err(|e| ServiceError::InvalidResponse(format!("malformed correction: {e}")))
    }
}

#[async_trait]
impl CorrectionService for OllamaClient {
    /// Race the chat request against the cancellation token.
    ///
    /// `biased` so a token that is already signalled wins before the request
    /// is even started; once the token fires mid-flight, the request future
    /// is dropped, which tears down the underlying HTTP call.
    async fn correct(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<CorrectionReport, ServiceError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ServiceError::Cancelled),
            result = self.request_correction(text) => result,
        }
    }

    /// Probe `/api/tags` for reachability, then `/api/show` for the model.
    async fn check_ready(&self) -> Result<(), ServiceError> {
        let tags_url = format!("{}/api/tags", self.config.base_url);
        self.client
            .get(&tags_url)
            .send()
            .await
            .map_err(|e| ServiceError::Unreachable(e.to_string()))?;

        let show_url = format!("{}/api/show", self.config.base_url);
        let response = self
            .client
            .post(&show_url)
            .json(&serde_json::json!({ "model": self.config.model }))
            .send()
            .await
            .map_err(|e| ServiceError::Unreachable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ServiceError::ModelMissing(self.config.model.clone()));
        }
        if !response.status().is_success() {
            return Err(ServiceError::Unreachable(format!(
                "show endpoint returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
