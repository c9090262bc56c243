//! Configuration schema.
//!
//! Every section carries `#[serde(default)]` so partial files work. Field
//! aliases accept the camelCase keys of the legacy `wito-config.json`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Fewest background workers picked automatically.
pub const MIN_AUTO_WORKERS: usize = 4;
/// Most background workers picked automatically.
pub const MAX_AUTO_WORKERS: usize = 16;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WitoConfig {
    pub window: WindowConfig,
    pub bridge: BridgeConfig,
    #[serde(alias = "wito")]
    pub app: AppConfig,
}

/// Initial window geometry and state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical pixels (valid range: 100-16384).
    pub width: u32,
    /// Logical pixels (valid range: 100-16384).
    pub height: u32,
    #[serde(alias = "isResizable")]
    pub resizable: bool,
    #[serde(alias = "isFullScreen")]
    pub fullscreen: bool,
    #[serde(alias = "isMaximized")]
    pub maximized: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Wito".into(),
            width: 1024,
            height: 768,
            resizable: true,
            fullscreen: false,
            maximized: false,
        }
    }
}

/// Bridge runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Background worker count. `None` picks `clamp(cpus + 1, 4, 16)`.
    #[serde(alias = "workerThreads")]
    pub worker_threads: Option<usize>,
    /// Ceiling for background operations, in seconds (valid range: 1-3600).
    #[serde(alias = "callTimeoutSecs")]
    pub call_timeout_secs: u64,
    /// Name of the script-side global exposing the bridge.
    #[serde(alias = "globalName")]
    pub global_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            call_timeout_secs: 30,
            global_name: "wito".into(),
        }
    }
}

impl BridgeConfig {
    /// Worker count after applying the automatic default.
    pub fn resolved_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(default_worker_threads)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

/// `clamp(cpus + 1, 4, 16)`, treating an unknown CPU count as one.
pub fn default_worker_threads() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (cpus + 1).clamp(MIN_AUTO_WORKERS, MAX_AUTO_WORKERS)
}

/// Application metadata and developer switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub version: String,
    /// Application dev mode: devtools, page reload on content changes.
    #[serde(alias = "devMode")]
    pub dev_mode: bool,
    /// Framework dev mode: verbose per-call logging.
    #[serde(alias = "witoDevMode")]
    pub wito_dev_mode: bool,
    /// Inject generated per-operation script stubs.
    #[serde(alias = "generateBindings")]
    pub generate_bindings: bool,
    /// Directory served over `wito://`. Defaults to the working directory.
    #[serde(alias = "contentDir")]
    pub content_dir: Option<PathBuf>,
    /// Page loaded at startup, relative to `content_dir`.
    pub entry: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".into(),
            dev_mode: false,
            wito_dev_mode: false,
            generate_bindings: true,
            content_dir: None,
            entry: "index.html".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WitoConfig::default();
        assert_eq!(config.window.title, "Wito");
        assert_eq!(config.window.width, 1024);
        assert!(config.window.resizable);
        assert_eq!(config.bridge.call_timeout(), Duration::from_secs(30));
        assert_eq!(config.bridge.global_name, "wito");
        assert!(config.app.generate_bindings);
        assert_eq!(config.app.entry, "index.html");
    }

    #[test]
    fn automatic_worker_count_is_clamped() {
        let n = default_worker_threads();
        assert!((MIN_AUTO_WORKERS..=MAX_AUTO_WORKERS).contains(&n));
        assert_eq!(BridgeConfig::default().resolved_worker_threads(), n);
    }

    #[test]
    fn explicit_worker_count_wins() {
        let bridge = BridgeConfig {
            worker_threads: Some(2),
            ..Default::default()
        };
        assert_eq!(bridge.resolved_worker_threads(), 2);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: WitoConfig = toml::from_str("[window]\ntitle = \"Notes\"\n").unwrap();
        assert_eq!(config.window.title, "Notes");
        assert_eq!(config.window.height, 768);
        assert_eq!(config.bridge.call_timeout_secs, 30);
    }

    #[test]
    fn legacy_json_keys_are_accepted() {
        let json = r#"{
            "window": {"title": "Demo", "width": 800, "height": 600,
                       "isResizable": false, "isFullScreen": true},
            "wito": {"devMode": true, "witoDevMode": true,
                     "generateBindings": false, "version": "2.0"}
        }"#;
        let config: WitoConfig = serde_json::from_str(json).unwrap();
        assert!(!config.window.resizable);
        assert!(config.window.fullscreen);
        assert!(config.app.dev_mode);
        assert!(config.app.wito_dev_mode);
        assert!(!config.app.generate_bindings);
        assert_eq!(config.app.version, "2.0");
    }
}
