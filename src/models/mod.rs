//! Model catalog: families, specs, and resolution.
//!
//! Model strings are classified into an explicit [`ModelFamily`] once, at
//! resolution time; everything downstream works with a validated
//! [`ModelSpec`] carrying pricing and the context limit.

mod catalog;
mod family;
mod spec;

pub use catalog::{Catalog, catalog};
pub use family::ModelFamily;
pub use spec::{ModelId, ModelSpec};
