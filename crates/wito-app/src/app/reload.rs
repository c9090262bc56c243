//! Dev-mode reload: watch the content directory and reload the page when
//! HTML, script, or style files change.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use wito_common::ConfigError;

use super::core::{send_user_event, UserEvent, WitoApp};

/// Extensions whose changes trigger a reload.
pub(super) const WATCHED_EXTENSIONS: &[&str] = &["html", "htm", "js", "mjs", "css"];

/// Changes closer together than this collapse into one reload.
const DEBOUNCE: Duration = Duration::from_millis(500);

pub(super) fn is_watched(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            WATCHED_EXTENSIONS
                .iter()
                .any(|w| ext.eq_ignore_ascii_case(w))
        })
        .unwrap_or(false)
}

/// Watches a directory tree for content changes.
pub(super) struct ContentWatcher {
    root: PathBuf,
}

impl ContentWatcher {
    pub fn new(root: PathBuf) -> Result<Self, ConfigError> {
        if !root.is_dir() {
            return Err(ConfigError::WatchError(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Call `on_change` once per debounced burst of content changes.
    ///
    /// Runs until the watcher's event channel closes.
    pub async fn watch<F>(&self, on_change: F) -> Result<(), ConfigError>
    where
        F: Fn() + Send + 'static,
    {
        let (notify_tx, mut notify_rx) = tokio::sync::mpsc::channel::<()>(16);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    let relevant = matches!(
                        event.kind,
                        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                    );
                    if relevant && event.paths.iter().any(|p| is_watched(p)) {
                        debug!(paths = ?event.paths, "content change detected");
                        let _ = notify_tx.try_send(());
                    }
                }
                Err(e) => error!("content watcher error: {e}"),
            },
            notify::Config::default(),
        )
        .map_err(|e| ConfigError::WatchError(format!("failed to create watcher: {e}")))?;

        watcher
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| {
                ConfigError::WatchError(format!("failed to watch {}: {e}", self.root.display()))
            })?;

        info!(root = %self.root.display(), "watching content for changes");

        while notify_rx.recv().await.is_some() {
            let debounce = tokio::time::sleep(DEBOUNCE);
            tokio::pin!(debounce);

            loop {
                tokio::select! {
                    _ = &mut debounce => break,
                    msg = notify_rx.recv() => {
                        if msg.is_none() {
                            return Ok(());
                        }
                    }
                }
            }

            info!("content changed, reloading");
            on_change();
        }

        Ok(())
    }
}

impl WitoApp {
    /// Start the content watcher when app dev mode is on.
    pub(super) fn start_content_watcher(&mut self) {
        if !self.config.app.dev_mode || self.tokio_runtime.is_some() {
            return;
        }
        let Some(proxy) = self.proxy.clone() else {
            return;
        };

        let watcher = match ContentWatcher::new(self.content_dir.clone()) {
            Ok(w) => w,
            Err(e) => {
                warn!("content reload disabled: {e}");
                return;
            }
        };

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .thread_name("wito-watch")
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                warn!("content reload disabled, no runtime: {e}");
                return;
            }
        };

        runtime.spawn(async move {
            let on_change = move || send_user_event(&proxy, UserEvent::ContentChanged);
            if let Err(e) = watcher.watch(on_change).await {
                warn!("content watcher stopped: {e}");
            }
        });
        self.tokio_runtime = Some(runtime);
    }

    /// Reload the page after a content change.
    pub(super) fn reload_content(&mut self) {
        let Some(bridge) = self.bridge.as_mut() else {
            return;
        };
        // Scripts from here on wait for the reloaded page.
        bridge.on_load_started();
        if let Err(e) = bridge.view().reload() {
            warn!("reload failed: {e}");
        }
    }
}
