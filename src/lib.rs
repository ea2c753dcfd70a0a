//! # claude-meter
//!
//! Cost-aware client for Anthropic's Claude: persists your model choice and
//! default `max_tokens`, relays prompts through the Messages API, and prices
//! every call from its token counts.
//!
//! There is deliberately no default model. On first use the client walks you
//! through choosing one (and a response-length default); the choice is saved
//! and reused until you change it with [`Client::set_model`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use claude_meter::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), claude_meter::Error> {
//!     let stdin = std::io::stdin();
//!     let client = Client::builder()
//!         .build_interactive(stdin.lock(), std::io::stdout())
//!         .await?;
//!
//!     let result = client.query("What is 2 + 2?").await?;
//!     println!("{}", result.text);
//!     println!("Cost: {} ({} in, {} out)",
//!         result.cost_display(), result.input_tokens, result.output_tokens);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod client;
pub mod config;
pub mod models;
pub mod pricing;
pub mod setup;
pub mod types;

pub use client::{AnthropicTransport, Client, ClientBuilder, QueryResult, Transport};
pub use config::{ConfigStore, Preference};
pub use models::{Catalog, ModelFamily, ModelId, ModelSpec, catalog};
pub use pricing::{ModelPricing, estimate_cost, format_cost};
pub use setup::{
    HIGH_COST_THRESHOLD, MAX_TOKEN_PRESETS, SetupEffect, SetupState, Transition, run_setup, step,
};
pub use types::{ApiResponse, ContentBlock, Message, Role, StopReason, Usage};

/// Error type for claude-meter operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Cost estimation was asked about a model string matching no known
    /// family. Never silently defaulted.
    #[error("unknown model: {model} (valid models: {valid})")]
    UnknownModel { model: String, valid: String },

    /// Explicit model change to an identifier outside the whitelist.
    #[error("invalid model: {model} (valid models: {valid})")]
    InvalidModel { model: String, valid: String },

    /// No stored preference and no interactive setup was run.
    #[error("no model selected; run interactive setup to choose one")]
    NoModelSelected,

    /// The user quit first-run setup; no client was produced.
    #[error("setup aborted before a model was selected")]
    Aborted,

    /// API returned an error response.
    #[error("API error (HTTP {status}): {message}", status = status.map(|s| s.to_string()).unwrap_or_else(|| "unknown".into()))]
    Api {
        message: String,
        status: Option<u16>,
        error_type: Option<String>,
    },

    /// Network connectivity or request failed.
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures of the remote collaborator (API or network).
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Api { .. } | Error::Network(_))
    }

    /// True for rejections of caller-supplied values; state is unchanged.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownModel { .. } | Error::InvalidModel { .. }
        )
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => *status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// One-shot query using the environment API key, the default config
/// location, and the stored preference.
pub async fn query(prompt: &str) -> Result<QueryResult> {
    let client = Client::builder().build().await?;
    client.query(prompt).await
}
