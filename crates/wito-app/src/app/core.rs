//! WitoApp struct definition and constructor.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use wito_bridge::webview::{Inbox, WryContentView};
use wito_bridge::{Bridge, WorkerPool};
use wito_common::EventBus;
use wito_config::WitoConfig;

use crate::launch::Launch;

/// How often the webview inbox is drained when nothing wakes the loop.
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// Grace period for background calls at shutdown.
pub(super) const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Events injected into the winit loop from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    /// A background call settled; pump the bridge.
    BridgeWake,
    /// Files under the content directory changed.
    ContentChanged,
}

/// Top-level application state.
pub struct WitoApp {
    pub(super) config: WitoConfig,
    pub(super) content_dir: PathBuf,
    pub(super) event_bus: EventBus,
    pub(super) pool: Arc<WorkerPool>,
    pub(super) proxy: Option<EventLoopProxy<UserEvent>>,

    // Windowing
    pub(super) window: Option<Arc<Window>>,

    // Content view and its bridge
    pub(super) bridge: Option<Bridge<WryContentView>>,
    pub(super) inbox: Inbox,

    // Content watcher (dev mode only)
    pub(super) tokio_runtime: Option<tokio::runtime::Runtime>,

    // Last theme pushed to the page, to skip duplicate notifications
    pub(super) last_dark: Option<bool>,

    pub(super) should_exit: bool,
    pub(super) last_poll: Instant,
}

impl WitoApp {
    pub fn new(launch: Launch, pool: Arc<WorkerPool>) -> Self {
        Self {
            config: launch.config,
            content_dir: launch.content_dir,
            event_bus: EventBus::default(),
            pool,
            proxy: None,
            window: None,
            bridge: None,
            inbox: Arc::new(Mutex::new(Vec::new())),
            tokio_runtime: None,
            last_dark: None,
            should_exit: false,
            last_poll: Instant::now(),
        }
    }

    /// Let background threads wake the event loop.
    pub fn with_proxy(mut self, proxy: EventLoopProxy<UserEvent>) -> Self {
        self.proxy = Some(proxy);
        self
    }
}

/// Send `event` into the loop. Only fails after the loop has exited.
pub(super) fn send_user_event(proxy: &EventLoopProxy<UserEvent>, event: UserEvent) {
    if proxy.send_event(event).is_err() {
        tracing::debug!(?event, "event loop closed, user event dropped");
    }
}
