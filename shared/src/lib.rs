//! Stat modifier model shared by the loader and the host hooks.
//!
//! Pure data and evaluation: no I/O, no logging, safe to call from any thread.

pub mod actor;
pub mod modifier;
pub mod paperdoll;
pub mod registry;
pub mod rules;

#[cfg(test)]
mod testing;

pub use actor::{Creature, Player};
pub use modifier::{Modifier, evaluate, fold_rules};
pub use registry::RuleRegistry;
pub use rules::{
    Channel, ClassId, CompetitionMode, Condition, EquippedItem, ItemId, Rule, check_conditions,
};
