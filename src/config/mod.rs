//! User configuration loaded from `config.toml`.

pub mod actions;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::path::PathBuf;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::load;
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Rows per page in every data table.
    pub page_size: usize,
    /// Keep the previous rows visible when a refresh fails.
    pub keep_rows_on_error: bool,
    /// Use fuzzy matching instead of substring matching for filters.
    pub fuzzy_filter: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            keep_rows_on_error: true,
            fuzzy_filter: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InventorySettings {
    /// Inventory snapshot served by the resource client.
    pub path: Option<PathBuf>,
    /// Artificial latency added to every inventory call.
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub table: TableSettings,
    #[serde(default)]
    pub inventory: InventorySettings,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}
