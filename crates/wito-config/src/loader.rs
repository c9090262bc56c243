//! Config file loading and creation.

use crate::schema::WitoConfig;
use std::path::{Path, PathBuf};
use tracing::info;
use wito_common::ConfigError;

/// File names looked up next to the application content, in order.
pub const APP_CONFIG_NAMES: &[&str] = &["wito.toml", "wito-config.json"];

/// Load config from a specific file.
///
/// `.json` files are read as JSON (the legacy `wito-config.json` layout);
/// anything else is TOML. Missing fields take their serde defaults.
pub fn load_from_path(path: &Path) -> Result<WitoConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let config = if is_json {
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("failed to parse JSON: {e}")))?
    } else {
        toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?
    };

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Find an application config file inside `dir`.
pub fn find_app_config(dir: &Path) -> Option<PathBuf> {
    APP_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/wito/config.toml`. If the file does not exist, a
/// commented default is written and defaults are returned.
pub fn load_default() -> Result<WitoConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(WitoConfig::default());
    }

    load_from_path(&path)
}

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        ConfigError::ParseError("could not determine config directory".into())
    })?;
    Ok(config_dir.join("wito").join("config.toml"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

/// The default config as commented TOML.
pub fn default_config_toml() -> String {
    r#"# Wito configuration
# Every key is optional; missing keys use the defaults shown here.

[window]
title = "Wito"
width = 1024
height = 768
resizable = true
fullscreen = false
maximized = false

[bridge]
# Background worker count. Omit to use clamp(cpus + 1, 4, 16).
# worker_threads = 8
# Seconds before a background call is rejected with "Operation timed out".
call_timeout_secs = 30
# Script-side global exposing the bridge.
global_name = "wito"

[app]
version = "0.1"
dev_mode = false
wito_dev_mode = false
generate_bindings = true
entry = "index.html"
"#
    .to_string()
}
