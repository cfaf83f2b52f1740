//! Extra stat modifiers for a game server, loaded from a separate rule file.
//!
//! Players get additional multipliers and flat bonuses per class, optionally scoped to
//! olympiad state, the target's class or equipped items. The server's own stat
//! calculation is left alone: the module only attaches extra stat funcs to players.
//!
//! ```no_run
//! # use evo_stat_mods::{ModConfig, StatModifierExt, host::Host};
//! # fn run(host: impl Host) {
//! let mut module = StatModifierExt::new(host, ModConfig::load("config/stat_mods.ron"));
//! module.load();
//! // ... on `reload` from the admin console
//! module.reload();
//! // ... on server stop
//! module.shutdown();
//! # }
//! ```

pub mod config;
pub mod error;
pub mod hook;
pub mod host;
pub mod lifecycle;
pub mod parser;

pub use config::ModConfig;
pub use error::{LoadError, ParseWarning};
pub use lifecycle::{IdleReason, LoadStatus, StatModifierExt};
pub use parser::{ParsedRules, RuleSource, parse_rules, read_rules};

pub use evo_stat_mods_shared as shared;
