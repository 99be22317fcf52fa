//! Nutrient reconciliation: key normalization, day aggregation, source
//! inspection and goal targets.
//!
//! Everything here is synchronous and works on a borrowed snapshot of a
//! day's entries. Missing or malformed data degrades to zero; nothing in
//! this module returns an error.

pub mod aggregate;
pub mod inspector;
pub mod keys;
pub mod payload;
pub mod targets;

pub use aggregate::{aggregate, aggregate_items, MacroTotals, NutrientMap};
pub use inspector::{find_contributors, Contributor, ContributorLevel};
pub use keys::{equivalents, normalize};
pub use payload::{Entry, Item, NutrientPayload};
pub use targets::{percent_of_target, resolve_target};
