//! Draining webview events into the bridge.

use std::time::Instant;

use winit::event_loop::{ActiveEventLoop, ControlFlow};

use wito_bridge::webview::{PageLoadState, WebViewEvent};

use super::core::{WitoApp, POLL_INTERVAL};

impl WitoApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_webview_events();
            self.pump_bridge();
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    /// Route queued IPC messages and page-load transitions to the bridge.
    pub(super) fn poll_webview_events(&mut self) {
        let events = match self.inbox.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => {
                tracing::warn!("webview inbox poisoned");
                return;
            }
        };
        let Some(bridge) = self.bridge.as_mut() else {
            return;
        };

        for event in events {
            match event {
                WebViewEvent::IpcMessage { body } => bridge.handle_inbound(&body),
                WebViewEvent::PageLoad {
                    state: PageLoadState::Started,
                    url,
                } => {
                    tracing::debug!(url = %url, "page load started");
                    bridge.on_load_started();
                }
                WebViewEvent::PageLoad {
                    state: PageLoadState::Finished,
                    url,
                } => {
                    tracing::debug!(url = %url, "page load finished");
                    bridge.on_load_finished();
                }
                WebViewEvent::NavigationBlocked { url } => {
                    tracing::warn!(url = %url, "navigation outside app content blocked");
                }
            }
        }
    }

    /// Deliver settled background calls and pending host events.
    pub(super) fn pump_bridge(&mut self) {
        if let Some(bridge) = self.bridge.as_mut() {
            let delivered = bridge.pump();
            if delivered > 0 {
                tracing::trace!(delivered, "background results delivered");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::core::test_support::app;
    use super::*;
    use wito_config::WitoConfig;

    #[test]
    fn events_are_drained_without_a_bridge() {
        let mut app = app(WitoConfig::default());
        app.inbox.lock().unwrap().push(WebViewEvent::IpcMessage {
            body: r#"{"id":"1","method":"x","args":{}}"#.into(),
        });

        app.poll_webview_events();
        app.pump_bridge();

        assert!(app.inbox.lock().unwrap().is_empty());
    }
}
