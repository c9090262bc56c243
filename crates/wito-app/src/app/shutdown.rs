//! Graceful shutdown: drain background calls, stop the watcher.

use std::time::Duration;

use wito_common::HostEvent;

use super::core::{WitoApp, SHUTDOWN_GRACE};

impl WitoApp {
    /// Perform graceful shutdown of all subsystems.
    ///
    /// Order matters:
    /// 1. Tell subscribers the app is going away
    /// 2. Drain the worker pool and answer what settled
    /// 3. Stop the content watcher runtime
    /// 4. Drop the bridge (destroys the webview)
    pub(super) fn shutdown(&mut self) {
        if self.should_exit {
            return;
        }
        tracing::info!("Initiating graceful shutdown");

        self.event_bus.publish(HostEvent::Shutdown);

        match self.bridge.as_mut() {
            Some(bridge) => bridge.shutdown(SHUTDOWN_GRACE),
            None => self.pool.shutdown(SHUTDOWN_GRACE),
        }

        if let Some(rt) = self.tokio_runtime.take() {
            rt.shutdown_timeout(Duration::from_secs(2));
        }

        self.bridge = None;
        self.should_exit = true;

        tracing::info!("Graceful shutdown complete");
    }
}
