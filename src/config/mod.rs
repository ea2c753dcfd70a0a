//! Persisted user preference: chosen model and default response length.
//!
//! A single JSON record on disk owns the preference; everything else in the
//! file is someone else's and is preserved untouched on every save.

mod store;

pub use store::{ConfigStore, Preference};
