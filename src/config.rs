use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::{info, warn};

use crate::host::StatOwner;

/// Rule file location relative to the datapack root.
pub const DEFAULT_RULES_PATH: &str = "data/stats_custom_mod_ext.xml";

/// After the base stat funcs, before the host's final caps.
pub const DEFAULT_FUNC_ORDER: u32 = 0x50;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModConfig {
    /// Resolved path of the rule file.
    pub rules_path: PathBuf,
    pub func_order: u32,
    pub owner: StatOwner,
}

impl ModConfig {
    pub fn with_rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules_path = path.into();
        self
    }

    /// Read settings from a RON file, falling back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => match Self::from_ron(&content) {
                Ok(config) => {
                    info!("Loaded stat modifier settings from '{}'", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse '{}', using defaults: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn from_ron(content: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(content)
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, Default::default())
    }
}

impl Default for ModConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from(DEFAULT_RULES_PATH),
            func_order: DEFAULT_FUNC_ORDER,
            owner: StatOwner::default(),
        }
    }
}
