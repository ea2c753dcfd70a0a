//! The external service boundary that actually executes a prompt.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::types::{ApiResponse, CreateMessageRequest, ErrorResponse};
use crate::{Error, Result};

const BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Remote transport collaborator.
///
/// One method, one request shape; errors come back as [`Error::Api`] or
/// [`Error::Network`] and are never retried at this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(
        &self,
        http: &reqwest::Client,
        request: CreateMessageRequest,
    ) -> Result<ApiResponse>;
}

/// Direct Anthropic Messages API transport.
pub struct AnthropicTransport {
    api_key: SecretString,
    base_url: String,
}

impl std::fmt::Debug for AnthropicTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AnthropicTransport {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: Self::base_url_from_env(),
        }
    }

    /// Resolve the API key from `ANTHROPIC_API_KEY`.
    ///
    /// Keys are expected to start with `sk-ant-`; a malformed value fails
    /// here rather than producing a confusing 401 later. Interactive key
    /// acquisition is the caller's concern, not this crate's.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            Error::Config(
                "ANTHROPIC_API_KEY not set; get a key from https://console.anthropic.com/".into(),
            )
        })?;
        if !key.starts_with("sk-ant-") {
            return Err(Error::Config(
                "invalid API key format: expected a key starting with 'sk-ant-'".into(),
            ));
        }
        Ok(Self::new(key))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn base_url_from_env() -> String {
        std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| BASE_URL.into())
    }
}

#[async_trait]
impl Transport for AnthropicTransport {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn send(
        &self,
        http: &reqwest::Client,
        request: CreateMessageRequest,
    ) -> Result<ApiResponse> {
        let url = format!("{}/v1/messages", self.base_url);

        let response = http
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error: ErrorResponse = response.json().await?;
            return Err(error.into_error(status));
        }

        Ok(response.json().await?)
    }
}
