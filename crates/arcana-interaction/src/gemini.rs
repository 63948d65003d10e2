//! Shared plumbing for the Gemini REST API: client setup, request sending
//! and error mapping.

use arcana_core::config::SecretConfig;
use arcana_core::generator::GenerationError;
use arcana_core::secret::SecretService;
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Connection settings shared by every Gemini agent.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client with the provided API key and no request timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Loads the API key through a secret service.
    pub async fn from_secrets(service: &dyn SecretService) -> Result<Self, GenerationError> {
        let secrets = service.load_secrets().await.map_err(|e| {
            GenerationError::Unavailable(format!("Failed to load secret.json: {e}"))
        })?;
        Self::from_config(&secrets)
    }

    pub fn from_config(secrets: &SecretConfig) -> Result<Self, GenerationError> {
        let gemini = secrets
            .gemini
            .as_ref()
            .filter(|gemini| !gemini.api_key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::Unavailable(
                    "Gemini API key not found in secret.json or GEMINI_API_KEY".into(),
                )
            })?;
        Ok(Self::new(gemini.api_key.clone()))
    }

    /// Applies a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, GenerationError> {
        self.client = Client::builder().timeout(timeout).build().map_err(|err| {
            GenerationError::Unavailable(format!("Failed to build HTTP client: {err}"))
        })?;
        Ok(self)
    }

    /// Overrides the API base URL (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/{model}:{method}", self.base_url)
    }

    /// Sends a JSON request and decodes the JSON answer.
    pub(crate) async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, GenerationError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| GenerationError::Transport {
                message: format!("Gemini API request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        response.json().await.map_err(|err| {
            GenerationError::MalformedResponse(format!("Failed to parse Gemini response: {err}"))
        })
    }
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

pub(crate) fn map_http_error(
    status: StatusCode,
    body: String,
    retry_after: Option<Duration>,
) -> GenerationError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    GenerationError::Api {
        status_code: status.as_u16(),
        message,
        is_retryable,
        retry_after,
    }
}

pub(crate) fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // HTTP-date values are ignored
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
