//! Per-model pricing and USD cost estimation.
//!
//! All money math uses `rust_decimal` so estimates are exact; prices are
//! Anthropic's published rates as of January 2026.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::Result;
use crate::models::catalog;

const TOKENS_PER_MTOK: Decimal = dec!(1_000_000);

/// Price per million tokens for one model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ModelPricing {
    pub input_per_mtok: Decimal,
    pub output_per_mtok: Decimal,
}

impl ModelPricing {
    pub const fn new(input_per_mtok: Decimal, output_per_mtok: Decimal) -> Self {
        Self {
            input_per_mtok,
            output_per_mtok,
        }
    }

    /// Exact cost in USD for a single call.
    pub fn calculate(&self, input_tokens: u64, output_tokens: u64) -> Decimal {
        let input = Decimal::from(input_tokens) / TOKENS_PER_MTOK * self.input_per_mtok;
        let output = Decimal::from(output_tokens) / TOKENS_PER_MTOK * self.output_per_mtok;
        input + output
    }
}

/// Estimate the USD cost of a call against `model`.
///
/// The model string is classified by family (case-insensitive substring
/// match); a string that matches no family fails with
/// [`Error::UnknownModel`](crate::Error::UnknownModel) rather than silently
/// falling back to a default price.
pub fn estimate_cost(input_tokens: u64, output_tokens: u64, model: &str) -> Result<Decimal> {
    let spec = catalog().resolve(model)?;
    Ok(spec.pricing.calculate(input_tokens, output_tokens))
}

/// Format a cost for display.
///
/// Costs under one cent keep four decimal places so cheap calls do not
/// render as "$0.00".
pub fn format_cost(cost_usd: Decimal) -> String {
    if cost_usd < dec!(0.01) {
        format!("${:.4}", cost_usd)
    } else {
        format!("${:.2}", cost_usd)
    }
}
