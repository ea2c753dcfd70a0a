//! Console driver for the first-run selection flow.
//!
//! Rendering only; every decision lives in the pure transitions in
//! [`flow`](super::flow), so the whole flow is scriptable over any
//! `BufRead`/`Write` pair.

use std::io::{self, BufRead, Write};

use super::flow::{self, HIGH_COST_THRESHOLD, MAX_TOKEN_PRESETS, SetupEffect, SetupState};
use crate::config::{ConfigStore, Preference};
use crate::models::{ModelSpec, catalog};
use crate::pricing::format_cost;
use crate::{Error, Result};

const RULE: &str = "============================================================";

const PRESET_BLURBS: [&str; 4] = [
    "Short answers (~750 words)",
    "Medium answers (~1500 words) [RECOMMENDED]",
    "Long answers (~3000 words)",
    "Very long answers (~6000 words) [WARNING: HIGH COST]",
];

/// Drive the selection flow to completion over the given streams.
///
/// Returns `Ok(None)` when the user quits from the model menu. EOF on the
/// input stream also counts as a quit, in any state: a closed stream can
/// never satisfy a re-prompt, so nothing is saved and no client is built.
pub fn run_setup<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<Option<Preference>> {
    writeln!(output, "\n{RULE}")?;
    writeln!(output, "FIRST-TIME SETUP: Model Selection")?;
    writeln!(output, "{RULE}")?;
    writeln!(output, "\nChoose a model before using the API.")?;
    writeln!(output, "Your choice is saved for future sessions.")?;

    let mut state = SetupState::ChoosingModel;
    let mut line = String::new();

    loop {
        render_prompt(&mut output, &state)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            // EOF counts as a quit.
            return Ok(None);
        }

        let transition = flow::step(state, &line);
        if let Some(effect) = &transition.effect {
            render_effect(&mut output, effect)?;
        }

        match transition.next {
            SetupState::Saved(preference) => return Ok(Some(preference)),
            SetupState::Aborted => {
                writeln!(output, "\n[INFO] No model selected.")?;
                return Ok(None);
            }
            next => state = next,
        }
    }
}

/// Run the selection flow and persist the result.
///
/// Called only when [`ConfigStore::load`] came back absent. Saves exactly
/// once, on successful completion; a quit is fatal to initialization.
pub async fn first_run<R: BufRead, W: Write>(
    store: &ConfigStore,
    input: R,
    mut output: W,
) -> Result<Preference> {
    let preference = run_setup(input, &mut output)?.ok_or(Error::Aborted)?;
    store.save(&preference).await?;

    writeln!(output, "\n[OK] Model selected: {}", preference.model)?;
    writeln!(output, "[OK] Saved to {}", store.path().display())?;
    Ok(preference)
}

fn render_prompt<W: Write>(output: &mut W, state: &SetupState) -> io::Result<()> {
    match state {
        SetupState::ChoosingModel => {
            writeln!(output, "\nSelect your model:")?;
            for (i, spec) in catalog().all().iter().enumerate() {
                writeln!(
                    output,
                    "{}. {} - {} (${}/${} per 1M tokens)",
                    i + 1,
                    spec.id,
                    spec.family.tier(),
                    spec.pricing.input_per_mtok,
                    spec.pricing.output_per_mtok,
                )?;
            }
            writeln!(output, "4. Quit (no model selected)")?;
            write!(output, "\nChoice (1/2/3/4): ")?;
        }
        SetupState::ChoosingMaxTokens { model } => {
            render_token_menu(output, model)?;
        }
        SetupState::EnteringCustomTokens { model } => {
            write!(
                output,
                "Enter max_tokens value (1-{}): ",
                model.context_limit
            )?;
        }
        SetupState::ConfirmingHighCost { .. } => {
            write!(output, "Continue? (y/n): ")?;
        }
        SetupState::Saved(_) | SetupState::Aborted => {}
    }
    Ok(())
}

fn render_token_menu<W: Write>(output: &mut W, model: &ModelSpec) -> io::Result<()> {
    writeln!(output, "\n{RULE}")?;
    writeln!(output, "Max Tokens Limit (Response Length)")?;
    writeln!(output, "{RULE}")?;
    writeln!(output, "\nThis controls how long responses can be.")?;
    writeln!(
        output,
        "Your model ({}) supports up to {} tokens; you can override per query.",
        model.id, model.context_limit
    )?;
    writeln!(output, "\nSelect your default max_tokens:")?;
    for (i, (preset, blurb)) in MAX_TOKEN_PRESETS.iter().zip(PRESET_BLURBS).enumerate() {
        writeln!(output, "{}. {} tokens - {}", i + 1, preset, blurb)?;
    }
    writeln!(
        output,
        "5. Custom (enter your own value between 1 and {}) [ADVANCED]",
        model.context_limit
    )?;
    write!(output, "\nChoice (1/2/3/4/5): ")?;
    Ok(())
}

fn render_effect<W: Write>(output: &mut W, effect: &SetupEffect) -> io::Result<()> {
    match effect {
        SetupEffect::InvalidModelChoice => {
            writeln!(output, "\n[ERROR] Invalid choice. Enter 1, 2, 3, or 4 to quit.")
        }
        SetupEffect::InvalidTokenChoice => {
            writeln!(output, "\n[ERROR] Invalid choice. Enter 1, 2, 3, 4, or 5.")
        }
        SetupEffect::NotANumber => writeln!(output, "\n[ERROR] Enter a valid number."),
        SetupEffect::OutOfRange { limit } => {
            writeln!(output, "\n[ERROR] Value must be between 1 and {limit}.")
        }
        SetupEffect::HighCostWarning { requested, estimate } => {
            writeln!(
                output,
                "\n[WARNING] Values over {HIGH_COST_THRESHOLD} can result in high costs."
            )?;
            writeln!(
                output,
                "At current pricing, a single query with {requested} tokens could cost {}.",
                format_cost(*estimate)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_scripted_preset_selection() {
        let input = Cursor::new("2\n2\n");
        let mut output = Vec::new();
        let preference = run_setup(input, &mut output).unwrap().unwrap();

        assert_eq!(preference.model, "claude-sonnet-4-5");
        assert_eq!(preference.default_max_tokens, 2048);

        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("FIRST-TIME SETUP"));
        assert!(rendered.contains("claude-sonnet-4-5"));
    }

    #[test]
    fn test_scripted_quit() {
        let input = Cursor::new("4\n");
        let mut output = Vec::new();
        assert!(run_setup(input, &mut output).unwrap().is_none());
    }

    #[test]
    fn test_eof_counts_as_quit() {
        let input = Cursor::new("");
        let mut output = Vec::new();
        assert!(run_setup(input, &mut output).unwrap().is_none());
    }

    #[test]
    fn test_eof_midway_counts_as_quit() {
        // Stream ends at the token menu: no preference comes back.
        let input = Cursor::new("2\n");
        let mut output = Vec::new();
        assert!(run_setup(input, &mut output).unwrap().is_none());
    }

    #[test]
    fn test_invalid_then_valid_input() {
        let input = Cursor::new("9\n1\n5\nabc\n5\n1024\n");
        let mut output = Vec::new();
        let preference = run_setup(input, &mut output).unwrap().unwrap();

        assert_eq!(preference.model, "claude-haiku-4-5");
        assert_eq!(preference.default_max_tokens, 1024);

        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("[ERROR] Invalid choice"));
        assert!(rendered.contains("[ERROR] Enter a valid number"));
    }

    #[test]
    fn test_high_cost_decline_then_preset() {
        let input = Cursor::new("2\n5\n20000\nn\n3\n");
        let mut output = Vec::new();
        let preference = run_setup(input, &mut output).unwrap().unwrap();

        assert_eq!(preference.default_max_tokens, 4096);
        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("[WARNING]"));
        assert!(rendered.contains("Continue? (y/n)"));
    }

    #[tokio::test]
    async fn test_first_run_saves_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("anthropic.json"));

        let input = Cursor::new("3\n4\n");
        let mut output = Vec::new();
        let preference = first_run(&store, input, &mut output).await.unwrap();

        assert_eq!(preference.model, "claude-opus-4-5");
        assert_eq!(preference.default_max_tokens, 8192);
        assert_eq!(store.load().await, Some(preference));
    }

    #[tokio::test]
    async fn test_first_run_quit_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("anthropic.json"));

        let input = Cursor::new("4\n");
        let err = first_run(&store, input, Vec::new()).await.unwrap_err();
        assert!(matches!(err, Error::Aborted));
        assert_eq!(store.load().await, None);
    }
}
