use serde::{Deserialize, Serialize};

/// Supported model families, one per capability/price tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    Haiku,
    Sonnet,
    Opus,
}

impl ModelFamily {
    /// Classification priority order. No family token is a substring of
    /// another, so order does not affect the result today.
    pub const ALL: [ModelFamily; 3] = [ModelFamily::Haiku, ModelFamily::Sonnet, ModelFamily::Opus];

    /// Classify a model string by case-insensitive substring match on the
    /// family token.
    pub fn classify(model: &str) -> Option<Self> {
        let lower = model.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|family| lower.contains(family.token()))
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::Haiku => "haiku",
            Self::Sonnet => "sonnet",
            Self::Opus => "opus",
        }
    }

    /// Short tier description for selection menus.
    pub fn tier(&self) -> &'static str {
        match self {
            Self::Haiku => "Fastest",
            Self::Sonnet => "Balanced",
            Self::Opus => "Most Capable",
        }
    }
}
