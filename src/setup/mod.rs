//! First-run selection of model and default `max_tokens`.
//!
//! The flow is an explicit state machine with pure transition functions
//! ([`step`]); the interactive console loop in [`run_setup`] is a thin
//! renderer around it.

mod flow;
mod interactive;

pub use flow::{
    HIGH_COST_THRESHOLD, MAX_TOKEN_PRESETS, SetupEffect, SetupState, Transition, step,
};
pub use interactive::{first_run, run_setup};
