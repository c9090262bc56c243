//! Wito configuration.
//!
//! TOML (or legacy JSON) configuration for the window, the bridge runtime,
//! and developer switches. All sections use defaults so partial files work.
//!
//! ```rust,no_run
//! let config = wito_config::load_config(None).expect("failed to load config");
//! println!("{}", wito_config::config_to_json(&config));
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{find_app_config, load_default, load_from_path};
pub use schema::{AppConfig, BridgeConfig, WindowConfig, WitoConfig};

use std::path::Path;
use wito_common::ConfigError;

/// Load and validate config.
///
/// Reads `path` when given, otherwise the platform default (created on first
/// run).
pub fn load_config(path: Option<&Path>) -> Result<WitoConfig, ConfigError> {
    let config = match path {
        Some(p) => loader::load_from_path(p)?,
        None => loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &WitoConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
