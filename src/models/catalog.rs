use std::sync::OnceLock;

use rust_decimal_macros::dec;

use super::family::ModelFamily;
use super::spec::ModelSpec;
use crate::pricing::ModelPricing;
use crate::{Error, Result};

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Global catalog of the supported models.
pub fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(Catalog::builtins)
}

/// The three supported models, in menu order (cheapest first).
#[derive(Debug)]
pub struct Catalog {
    specs: [ModelSpec; 3],
}

impl Catalog {
    // Identifiers and pricing as of January 2026. Aliases, not snapshots,
    // so new point releases are picked up without a code change.
    fn builtins() -> Self {
        Self {
            specs: [
                ModelSpec {
                    id: "claude-haiku-4-5".into(),
                    family: ModelFamily::Haiku,
                    pricing: ModelPricing::new(dec!(1), dec!(5)),
                    context_limit: 200_000,
                },
                ModelSpec {
                    id: "claude-sonnet-4-5".into(),
                    family: ModelFamily::Sonnet,
                    pricing: ModelPricing::new(dec!(3), dec!(15)),
                    context_limit: 200_000,
                },
                ModelSpec {
                    id: "claude-opus-4-5".into(),
                    family: ModelFamily::Opus,
                    pricing: ModelPricing::new(dec!(5), dec!(25)),
                    context_limit: 200_000,
                },
            ],
        }
    }

    pub fn all(&self) -> &[ModelSpec] {
        &self.specs
    }

    pub fn for_family(&self, family: ModelFamily) -> &ModelSpec {
        self.specs
            .iter()
            .find(|spec| spec.family == family)
            .expect("catalog covers every family")
    }

    /// Resolve any model string by family classification.
    ///
    /// Fails with [`Error::UnknownModel`] when the string matches no family;
    /// there is deliberately no default pricing fallback.
    pub fn resolve(&self, model: &str) -> Result<&ModelSpec> {
        let family = ModelFamily::classify(model).ok_or_else(|| Error::UnknownModel {
            model: model.to_string(),
            valid: self.valid_ids(),
        })?;
        let spec = self.for_family(family);
        tracing::debug!(input = model, resolved = %spec.id, "model resolved by family");
        Ok(spec)
    }

    /// Exact-identifier lookup, used to whitelist explicit model changes.
    pub fn get_exact(&self, id: &str) -> Option<&ModelSpec> {
        self.specs.iter().find(|spec| spec.id == id)
    }

    /// Comma-separated canonical identifiers, for error messages and menus.
    pub fn valid_ids(&self) -> String {
        self.specs
            .iter()
            .map(|spec| spec.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_substring() {
        let spec = catalog().resolve("claude-sonnet-4-5-20250929").unwrap();
        assert_eq!(spec.family, ModelFamily::Sonnet);
        assert_eq!(spec.id, "claude-sonnet-4-5");
    }

    #[test]
    fn test_resolve_unknown_lists_valid_ids() {
        let err = catalog().resolve("mystery-model").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("mystery-model"));
        assert!(msg.contains("claude-haiku-4-5"));
        assert!(msg.contains("claude-opus-4-5"));
    }

    #[test]
    fn test_get_exact_is_strict() {
        assert!(catalog().get_exact("claude-opus-4-5").is_some());
        // Substring matches are not enough for an explicit model change.
        assert!(catalog().get_exact("opus").is_none());
        assert!(catalog().get_exact("claude-opus-4-5-20251101").is_none());
    }

    #[test]
    fn test_catalog_order_and_limits() {
        let families: Vec<_> = catalog().all().iter().map(|s| s.family).collect();
        assert_eq!(
            families,
            vec![ModelFamily::Haiku, ModelFamily::Sonnet, ModelFamily::Opus]
        );
        assert!(catalog().all().iter().all(|s| s.context_limit == 200_000));
    }
}
