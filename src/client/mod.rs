//! Cost-aware client facade.
//!
//! Owns the loaded [`Preference`], relays prompts through the transport
//! collaborator, and prices every response before handing it back.

mod transport;

pub use transport::{AnthropicTransport, Transport};

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::config::{ConfigStore, Preference};
use crate::models::catalog;
use crate::pricing::{estimate_cost, format_cost};
use crate::types::{CreateMessageRequest, Message};
use crate::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// One priced call: response text, token counts, and estimated cost.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub text: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_usd: Decimal,
    pub model: String,
}

impl QueryResult {
    /// Cost formatted for display ("$0.0042" under a cent, "$0.12" above).
    pub fn cost_display(&self) -> String {
        format_cost(self.cost_usd)
    }
}

/// Client for the Messages API with persisted model preference and per-call
/// cost estimates.
///
/// Each instance owns its preference state; independent clients over
/// separate config paths do not interfere.
pub struct Client {
    transport: Arc<dyn Transport>,
    http: reqwest::Client,
    store: ConfigStore,
    preference: Preference,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.transport.name())
            .field("model", &self.preference.model)
            .finish()
    }
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn model(&self) -> &str {
        &self.preference.model
    }

    pub fn default_max_tokens(&self) -> u32 {
        self.preference.default_max_tokens
    }

    pub fn preference(&self) -> &Preference {
        &self.preference
    }

    /// Change the model, keeping `default_max_tokens` as it was.
    ///
    /// Only the three canonical identifiers are accepted; the change is
    /// persisted immediately.
    pub async fn set_model(&mut self, model: &str) -> Result<()> {
        let spec = catalog()
            .get_exact(model)
            .ok_or_else(|| Error::InvalidModel {
                model: model.to_string(),
                valid: catalog().valid_ids(),
            })?;

        self.preference.model = spec.id.clone();
        self.store.save(&self.preference).await?;
        tracing::info!(model = %self.preference.model, "model changed");
        Ok(())
    }

    /// Send a prompt with the stored defaults.
    pub async fn query(&self, prompt: &str) -> Result<QueryResult> {
        self.query_with(prompt, None, None).await
    }

    /// Send a prompt, optionally overriding `max_tokens` and supplying a
    /// system prompt.
    ///
    /// Transport failures are logged and propagated unmodified; there is no
    /// retry and no partial result.
    pub async fn query_with(
        &self,
        prompt: &str,
        max_tokens: Option<u32>,
        system_prompt: Option<&str>,
    ) -> Result<QueryResult> {
        let max_tokens = max_tokens.unwrap_or(self.preference.default_max_tokens);

        let mut request =
            CreateMessageRequest::new(&self.preference.model, vec![Message::user(prompt)])
                .with_max_tokens(max_tokens);
        if let Some(system) = system_prompt {
            request = request.with_system(system);
        }

        let response = match self.transport.send(&self.http, request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(model = %self.preference.model, error = %e, "API call failed");
                return Err(e);
            }
        };

        let cost_usd = estimate_cost(
            response.usage.input_tokens,
            response.usage.output_tokens,
            &self.preference.model,
        )?;

        Ok(QueryResult {
            text: response.text(),
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
            cost_usd,
            model: self.preference.model.clone(),
        })
    }
}

/// Builder for [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    config_path: Option<PathBuf>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Location of the preference record. Defaults to the per-user config
    /// directory.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the transport collaborator (tests, gateways).
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build, requiring a stored preference.
    ///
    /// Fails with [`Error::NoModelSelected`] when no valid preference is on
    /// disk; use [`build_interactive`](Self::build_interactive) to prompt
    /// for one instead.
    pub async fn build(self) -> Result<Client> {
        let (transport, http, store) = self.assemble()?;
        let preference = store.load().await.ok_or(Error::NoModelSelected)?;
        Ok(Client {
            transport,
            http,
            store,
            preference,
        })
    }

    /// Build, running the first-run selection flow over the given streams
    /// when no valid preference is stored.
    pub async fn build_interactive<R: BufRead, W: Write>(
        self,
        input: R,
        output: W,
    ) -> Result<Client> {
        let (transport, http, store) = self.assemble()?;
        let preference = match store.load().await {
            Some(preference) => preference,
            None => crate::setup::first_run(&store, input, output).await?,
        };
        Ok(Client {
            transport,
            http,
            store,
            preference,
        })
    }

    fn assemble(self) -> Result<(Arc<dyn Transport>, reqwest::Client, ConfigStore)> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut t = match self.api_key {
                    Some(key) => AnthropicTransport::new(key),
                    None => AnthropicTransport::from_env()?,
                };
                if let Some(url) = self.base_url {
                    t = t.with_base_url(url);
                }
                Arc::new(t)
            }
        };

        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(Error::Network)?;

        let store = match self.config_path {
            Some(path) => ConfigStore::new(path),
            None => ConfigStore::new(ConfigStore::default_path().ok_or_else(|| {
                Error::Config("could not determine a config directory for this user".into())
            })?),
        };

        Ok((transport, http, store))
    }
}
