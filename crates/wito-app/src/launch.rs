//! Startup settings: which config to load and where app content lives.

use std::path::{Path, PathBuf};

use tracing::info;
use wito_common::ConfigError;
use wito_config::WitoConfig;

use crate::cli::Args;

/// Resolved startup settings.
#[derive(Debug)]
pub struct Launch {
    pub config: WitoConfig,
    pub content_dir: PathBuf,
}

impl Launch {
    /// Config precedence: `--config`, then a `wito.toml` / `wito-config.json`
    /// beside the content, then the user config. `--dev` forces dev mode.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match (&args.config, &args.content) {
            (Some(path), _) => wito_config::load_config(Some(path))?,
            (None, Some(dir)) => match wito_config::find_app_config(dir) {
                Some(found) => {
                    info!(path = %found.display(), "using app config");
                    wito_config::load_config(Some(&found))?
                }
                None => wito_config::load_config(None)?,
            },
            (None, None) => wito_config::load_config(None)?,
        };

        if args.dev {
            config.app.dev_mode = true;
            config.app.wito_dev_mode = true;
        }

        let content_dir = args
            .content
            .clone()
            .or_else(|| config.app.content_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            config,
            content_dir,
        })
    }

    pub fn entry_path(&self) -> PathBuf {
        self.content_dir.join(&self.config.app.entry)
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(config: Option<PathBuf>, content: Option<PathBuf>, dev: bool) -> Args {
        Args {
            config,
            content,
            log_level: None,
            dev,
        }
    }

    #[test]
    fn explicit_config_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[window]\ntitle = \"Custom\"\n").unwrap();

        let launch = Launch::from_args(&args(Some(path), Some(dir.path().into()), false)).unwrap();
        assert_eq!(launch.config.window.title, "Custom");
        assert_eq!(launch.content_dir(), dir.path());
    }

    #[test]
    fn app_config_beside_content_is_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("wito-config.json"),
            r#"{"window": {"title": "Legacy"}, "wito": {"entry": "main.html"}}"#,
        )
        .unwrap();

        let launch = Launch::from_args(&args(None, Some(dir.path().into()), false)).unwrap();
        assert_eq!(launch.config.window.title, "Legacy");
        assert_eq!(launch.entry_path(), dir.path().join("main.html"));
    }

    #[test]
    fn dev_flag_forces_dev_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wito.toml");
        std::fs::write(&path, "").unwrap();

        let launch = Launch::from_args(&args(Some(path), None, true)).unwrap();
        assert!(launch.config.app.dev_mode);
        assert!(launch.config.app.wito_dev_mode);
        assert_eq!(launch.content_dir(), Path::new("."));
    }

    #[test]
    fn content_dir_falls_back_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wito.toml");
        std::fs::write(&path, "[app]\ncontent_dir = \"/srv/site\"\n").unwrap();

        let launch = Launch::from_args(&args(Some(path), None, false)).unwrap();
        assert_eq!(launch.content_dir(), Path::new("/srv/site"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wito.toml");
        std::fs::write(&path, "[bridge]\ncall_timeout_secs = 0\n").unwrap();

        assert!(Launch::from_args(&args(Some(path), None, false)).is_err());
    }
}
