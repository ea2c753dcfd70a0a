use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::Result;

const MODEL_KEY: &str = "model";
const LLM_KEY: &str = "llm";
const MAX_TOKENS_KEY: &str = "default_max_tokens";

/// The persisted user choice: model identifier and default `max_tokens`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub model: String,
    pub default_max_tokens: u32,
}

/// Load/merge/save for the preference record.
///
/// The backing file is a JSON object with at least
/// `{"model": <string>, "llm": {"default_max_tokens": <integer>}}`; other
/// keys are permitted and survive every save unchanged.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Per-user default location, e.g.
    /// `~/.config/claude-meter/anthropic.json` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "claude-meter")?;
        Some(dirs.config_dir().join("anthropic.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored preference.
    ///
    /// Missing file, unreadable file, malformed JSON, or absent/mistyped
    /// fields all yield `None`: the caller prompts for a fresh selection
    /// instead of failing. Anything beyond a plain missing file is logged.
    pub async fn load(&self) -> Option<Preference> {
        if !self.path.exists() {
            return None;
        }

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not read config");
                return None;
            }
        };

        let record: Value = match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not parse config");
                return None;
            }
        };

        let model = record.get(MODEL_KEY)?.as_str()?.to_string();
        let default_max_tokens = record
            .get(LLM_KEY)?
            .get(MAX_TOKENS_KEY)?
            .as_u64()?
            .try_into()
            .ok()?;

        Some(Preference {
            model,
            default_max_tokens,
        })
    }

    /// Persist the preference, preserving every unrelated key.
    ///
    /// Read-merge-write: the existing record is loaded first (absence or a
    /// parse failure counts as empty), only the two owned fields are
    /// overwritten, and the whole object is written back.
    pub async fn save(&self, preference: &Preference) -> Result<()> {
        let mut record = self.load_raw().await;

        record.insert(MODEL_KEY.into(), json!(preference.model));
        let llm = record.entry(LLM_KEY).or_insert_with(|| json!({}));
        if !llm.is_object() {
            *llm = json!({});
        }
        llm.as_object_mut()
            .expect("llm section is an object")
            .insert(MAX_TOKENS_KEY.into(), json!(preference.default_max_tokens));

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&record)?;
        tokio::fs::write(&self.path, content).await?;

        tracing::debug!(path = %self.path.display(), model = %preference.model, "preference saved");
        Ok(())
    }

    async fn load_raw(&self) -> Map<String, Value> {
        if !self.path.exists() {
            return Map::new();
        }
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "existing config unparseable, starting fresh"
                    );
                    Map::new()
                }
            },
            Err(_) => Map::new(),
        }
    }
}
