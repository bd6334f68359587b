use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "cloudnav";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Load the config from `path`, or from the default location.
///
/// A missing default file yields the defaults; an explicitly requested file
/// must exist.
pub fn load(path: Option<&Path>) -> color_eyre::Result<AppConfig> {
    if let Some(path) = path {
        return load_file(path);
    }

    let Some(path) = config_path() else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    load_file(&path)
}

fn load_file(path: &Path) -> color_eyre::Result<AppConfig> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
    let config = parse(&content).wrap_err_with(|| format!("Invalid config {}", path.display()))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn parse(content: &str) -> color_eyre::Result<AppConfig> {
    Ok(toml::from_str(content)?)
}
