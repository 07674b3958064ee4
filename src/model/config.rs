use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Drop a task's id from the selection set when the task is deleted.
    /// Off by default: stale ids are kept until `jot clean`.
    #[serde(default)]
    pub prune_selection_on_delete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long a notification stays in the status row
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,
    /// Color overrides, keyed by theme slot name (e.g. "highlight" = "#FB4196")
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            notification_secs: default_notification_secs(),
            colors: HashMap::new(),
        }
    }
}

fn default_notification_secs() -> u64 {
    3
}
