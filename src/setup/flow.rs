use rust_decimal::Decimal;

use crate::config::Preference;
use crate::models::{ModelSpec, catalog};

/// Fixed `max_tokens` presets offered during setup.
pub const MAX_TOKEN_PRESETS: [u32; 4] = [1024, 2048, 4096, 8192];

/// Custom values above this require an explicit cost confirmation.
pub const HIGH_COST_THRESHOLD: u32 = 10_000;

/// Setup states. `Saved` and `Aborted` are terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum SetupState {
    ChoosingModel,
    ChoosingMaxTokens { model: &'static ModelSpec },
    EnteringCustomTokens { model: &'static ModelSpec },
    ConfirmingHighCost {
        model: &'static ModelSpec,
        requested: u32,
    },
    Saved(Preference),
    Aborted,
}

impl SetupState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Saved(_) | Self::Aborted)
    }
}

/// Side-channel output of a transition, for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SetupEffect {
    InvalidModelChoice,
    InvalidTokenChoice,
    NotANumber,
    OutOfRange { limit: u32 },
    HighCostWarning { requested: u32, estimate: Decimal },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: SetupState,
    pub effect: Option<SetupEffect>,
}

impl Transition {
    fn to(next: SetupState) -> Self {
        Self { next, effect: None }
    }

    fn with_effect(next: SetupState, effect: SetupEffect) -> Self {
        Self {
            next,
            effect: Some(effect),
        }
    }
}

/// Pure transition function: current state + one line of user input.
///
/// Invalid input re-enters the same state (a loop, not a failure); only the
/// explicit quit option in the model menu reaches `Aborted`. Terminal states
/// absorb further input.
pub fn step(state: SetupState, line: &str) -> Transition {
    let input = line.trim();
    match state {
        SetupState::ChoosingModel => choose_model(input),
        SetupState::ChoosingMaxTokens { model } => choose_max_tokens(model, input),
        SetupState::EnteringCustomTokens { model } => enter_custom_tokens(model, input),
        SetupState::ConfirmingHighCost { model, requested } => {
            confirm_high_cost(model, requested, input)
        }
        terminal @ (SetupState::Saved(_) | SetupState::Aborted) => Transition::to(terminal),
    }
}

fn choose_model(input: &str) -> Transition {
    let models = catalog().all();
    let model = match input {
        "1" => &models[0],
        "2" => &models[1],
        "3" => &models[2],
        "4" => return Transition::to(SetupState::Aborted),
        _ => {
            return Transition::with_effect(
                SetupState::ChoosingModel,
                SetupEffect::InvalidModelChoice,
            );
        }
    };
    Transition::to(SetupState::ChoosingMaxTokens { model })
}

fn choose_max_tokens(model: &'static ModelSpec, input: &str) -> Transition {
    let preset = match input {
        "1" => MAX_TOKEN_PRESETS[0],
        "2" => MAX_TOKEN_PRESETS[1],
        "3" => MAX_TOKEN_PRESETS[2],
        "4" => MAX_TOKEN_PRESETS[3],
        "5" => return Transition::to(SetupState::EnteringCustomTokens { model }),
        _ => {
            return Transition::with_effect(
                SetupState::ChoosingMaxTokens { model },
                SetupEffect::InvalidTokenChoice,
            );
        }
    };
    Transition::to(SetupState::Saved(Preference {
        model: model.id.clone(),
        default_max_tokens: preset,
    }))
}

fn enter_custom_tokens(model: &'static ModelSpec, input: &str) -> Transition {
    let Ok(custom) = input.parse::<u32>() else {
        return Transition::with_effect(
            SetupState::ChoosingMaxTokens { model },
            SetupEffect::NotANumber,
        );
    };

    if !model.accepts_max_tokens(custom) {
        return Transition::with_effect(
            SetupState::ChoosingMaxTokens { model },
            SetupEffect::OutOfRange {
                limit: model.context_limit,
            },
        );
    }

    if custom > HIGH_COST_THRESHOLD {
        // Worst case: the custom value on both sides of the call.
        let estimate = model.pricing.calculate(custom as u64, custom as u64);
        return Transition::with_effect(
            SetupState::ConfirmingHighCost {
                model,
                requested: custom,
            },
            SetupEffect::HighCostWarning {
                requested: custom,
                estimate,
            },
        );
    }

    Transition::to(SetupState::Saved(Preference {
        model: model.id.clone(),
        default_max_tokens: custom,
    }))
}

fn confirm_high_cost(model: &'static ModelSpec, requested: u32, input: &str) -> Transition {
    if input.eq_ignore_ascii_case("y") {
        Transition::to(SetupState::Saved(Preference {
            model: model.id.clone(),
            default_max_tokens: requested,
        }))
    } else {
        // Declined: nothing committed, back to the token menu.
        Transition::to(SetupState::ChoosingMaxTokens { model })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn at_token_menu(model_choice: &str) -> SetupState {
        step(SetupState::ChoosingModel, model_choice).next
    }

    #[test]
    fn test_model_choices_map_to_catalog_order() {
        for (choice, id) in [
            ("1", "claude-haiku-4-5"),
            ("2", "claude-sonnet-4-5"),
            ("3", "claude-opus-4-5"),
        ] {
            match at_token_menu(choice) {
                SetupState::ChoosingMaxTokens { model } => assert_eq!(model.id, id),
                other => panic!("expected token menu, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_quit_aborts() {
        assert_eq!(step(SetupState::ChoosingModel, "4").next, SetupState::Aborted);
    }

    #[test]
    fn test_invalid_model_choice_loops() {
        for input in ["0", "5", "sonnet", "", "  "] {
            let t = step(SetupState::ChoosingModel, input);
            assert_eq!(t.next, SetupState::ChoosingModel);
            assert_eq!(t.effect, Some(SetupEffect::InvalidModelChoice));
        }
    }

    #[test]
    fn test_presets() {
        for (choice, tokens) in [("1", 1024), ("2", 2048), ("3", 4096), ("4", 8192)] {
            let t = step(at_token_menu("2"), choice);
            assert_eq!(
                t.next,
                SetupState::Saved(Preference {
                    model: "claude-sonnet-4-5".into(),
                    default_max_tokens: tokens,
                })
            );
        }
    }

    #[test]
    fn test_custom_value_boundaries() {
        // At the context limit: accepted.
        let entering = step(at_token_menu("2"), "5").next;
        let t = step(entering.clone(), "200000");
        assert!(matches!(t.next, SetupState::ConfirmingHighCost { requested: 200_000, .. }));

        // One past the limit: rejected, back to the menu.
        let t = step(entering.clone(), "200001");
        assert!(matches!(t.next, SetupState::ChoosingMaxTokens { .. }));
        assert_eq!(t.effect, Some(SetupEffect::OutOfRange { limit: 200_000 }));

        // Zero: rejected.
        let t = step(entering.clone(), "0");
        assert_eq!(t.effect, Some(SetupEffect::OutOfRange { limit: 200_000 }));

        // Not a number: rejected.
        let t = step(entering, "lots");
        assert_eq!(t.effect, Some(SetupEffect::NotANumber));
    }

    #[test]
    fn test_small_custom_value_saves_directly() {
        let entering = step(at_token_menu("1"), "5").next;
        let t = step(entering, "3000");
        assert_eq!(
            t.next,
            SetupState::Saved(Preference {
                model: "claude-haiku-4-5".into(),
                default_max_tokens: 3000,
            })
        );
        assert_eq!(t.effect, None);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Exactly 10_000 needs no confirmation.
        let entering = step(at_token_menu("2"), "5").next;
        let t = step(entering.clone(), "10000");
        assert!(matches!(t.next, SetupState::Saved(_)));

        let t = step(entering, "10001");
        assert!(matches!(t.next, SetupState::ConfirmingHighCost { requested: 10_001, .. }));
    }

    #[test]
    fn test_high_cost_warning_carries_estimate() {
        let entering = step(at_token_menu("2"), "5").next;
        let t = step(entering, "100000");
        // Sonnet, 100k in + 100k out: 0.1 * 3 + 0.1 * 15.
        assert_eq!(
            t.effect,
            Some(SetupEffect::HighCostWarning {
                requested: 100_000,
                estimate: dec!(1.8),
            })
        );
    }

    #[test]
    fn test_high_cost_confirm_and_decline() {
        let entering = step(at_token_menu("3"), "5").next;
        let confirming = step(entering, "50000").next;

        let accepted = step(confirming.clone(), "y");
        assert_eq!(
            accepted.next,
            SetupState::Saved(Preference {
                model: "claude-opus-4-5".into(),
                default_max_tokens: 50_000,
            })
        );

        let accepted_upper = step(confirming.clone(), "Y");
        assert!(matches!(accepted_upper.next, SetupState::Saved(_)));

        // Anything else declines: nothing committed.
        let declined = step(confirming, "n");
        assert!(matches!(declined.next, SetupState::ChoosingMaxTokens { .. }));
    }

    #[test]
    fn test_terminal_states_absorb_input() {
        assert_eq!(step(SetupState::Aborted, "1").next, SetupState::Aborted);
        let saved = SetupState::Saved(Preference {
            model: "claude-haiku-4-5".into(),
            default_max_tokens: 1024,
        });
        assert_eq!(step(saved.clone(), "2").next, saved);
    }

    #[test]
    fn test_input_is_trimmed() {
        let t = step(SetupState::ChoosingModel, "  2  \n");
        assert!(matches!(t.next, SetupState::ChoosingMaxTokens { .. }));
    }
}
