use serde::{Deserialize, Serialize};

use super::family::ModelFamily;
use crate::pricing::ModelPricing;

pub type ModelId = String;

/// Static description of one supported model: canonical identifier, family,
/// pricing, and the context limit that bounds per-call token budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub id: ModelId,
    pub family: ModelFamily,
    pub pricing: ModelPricing,
    pub context_limit: u32,
}

impl ModelSpec {
    /// Whether `max_tokens` is usable with this model.
    pub fn accepts_max_tokens(&self, max_tokens: u32) -> bool {
        (1..=self.context_limit).contains(&max_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn spec() -> ModelSpec {
        ModelSpec {
            id: "claude-sonnet-4-5".into(),
            family: ModelFamily::Sonnet,
            pricing: ModelPricing::new(dec!(3), dec!(15)),
            context_limit: 200_000,
        }
    }

    #[test]
    fn test_accepts_max_tokens_bounds() {
        let spec = spec();
        assert!(spec.accepts_max_tokens(1));
        assert!(spec.accepts_max_tokens(200_000));
        assert!(!spec.accepts_max_tokens(0));
        assert!(!spec.accepts_max_tokens(200_001));
    }
}
