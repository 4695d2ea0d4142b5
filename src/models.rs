use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Store-assigned task identifier, unique across all buckets.
///
/// `0` marks a record persisted before identifiers existed; the store
/// backfills those with fresh ids at load time.
pub type TaskId = u64;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    #[serde(default)]
    pub id: TaskId,
    pub name: String,
    pub done: bool,
}

/// Period key → ordered task list. Insertion order within a bucket is the
/// display order; the sorted key order keeps serialization deterministic.
pub type Buckets = BTreeMap<String, Vec<Task>>;

/// Which bucket granularity the UI is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// UI hints the shell reads at startup. The task data lives elsewhere;
/// nothing in here changes store behavior beyond the initial view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    pub theme: String,
    pub accent: String,
    #[serde(default = "default_window")]
    pub window: WindowSize,
    #[serde(default)]
    pub default_view: ViewMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            accent: "blue".to_string(),
            window: default_window(),
            default_view: ViewMode::Daily,
        }
    }
}

fn default_window() -> WindowSize {
    // Narrow column for one bucket's list plus the view-switcher sidebar.
    WindowSize {
        width: 600,
        height: 820,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SettingsFile {
    pub schema_version: u32,
    pub settings: Settings,
}
