//! Window creation, webview setup, and bridge wiring.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window, WindowAttributes};
use wry::WebViewBuilder;

use wito_bridge::bindings;
use wito_bridge::webview::{
    attach_bridge, attach_content_protocol, entry_url, ContentProvider, WryContentView,
};
use wito_bridge::{Bridge, BridgeOptions, HostApi, MethodRegistry};
use wito_common::{ThemeMode, WitoError};
use wito_config::{WindowConfig, WitoConfig};

use super::core::{send_user_event, UserEvent, WitoApp};
use super::desktop;

/// Window attributes for the configured geometry and state.
pub(super) fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(config.resizable)
        .with_maximized(config.maximized);

    if config.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Bridge settings derived from the loaded config.
pub(super) fn bridge_options(config: &WitoConfig) -> BridgeOptions {
    BridgeOptions {
        global_name: config.bridge.global_name.clone(),
        call_timeout: config.bridge.call_timeout(),
        dev_mode: config.app.wito_dev_mode,
        app_dev_mode: config.app.dev_mode,
        generate_bindings: config.app.generate_bindings,
    }
}

/// Bounds covering the whole client area of `window`.
pub(super) fn full_bounds(window: &Window) -> wry::Rect {
    let size: LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(size.width, size.height)),
    }
}

impl WitoApp {
    /// Create the window, its webview, and the bridge.
    /// Returns `false` if initialization failed and the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let window = match event_loop.create_window(window_attributes(&self.config.window)) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        let bridge = match self.build_bridge(&window) {
            Ok(bridge) => bridge,
            Err(e) => {
                tracing::error!("Failed to set up content view: {e}");
                return false;
            }
        };

        self.window = Some(window);
        self.bridge = Some(bridge);
        self.push_theme();
        true
    }

    fn build_bridge(&mut self, window: &Arc<Window>) -> Result<Bridge<WryContentView>, WitoError> {
        let api = HostApi::new(
            desktop::host_services(Arc::clone(window)),
            self.content_dir.clone(),
        );
        let registry = MethodRegistry::from_capability(Arc::new(api))?;
        let options = bridge_options(&self.config);
        let init_script = bindings::init_script(&registry, &options);

        let entry = self.config.app.entry.clone();
        let provider = Arc::new(ContentProvider::new(self.content_dir.clone(), entry.clone()));
        let loaded = Arc::new(AtomicBool::new(false));

        let builder = WebViewBuilder::new()
            .with_bounds(full_bounds(window))
            .with_devtools(self.config.app.dev_mode)
            .with_url(entry_url(&entry));
        let builder = attach_bridge(
            builder,
            Arc::clone(&self.inbox),
            Arc::clone(&loaded),
            &init_script,
        );
        let builder = attach_content_protocol(builder, provider);

        let webview = builder
            .build_as_child(window.as_ref())
            .map_err(|e| WitoError::WebView(e.to_string()))?;
        tracing::info!(url = %entry_url(&entry), "content view created");

        let mut bridge = Bridge::new(
            WryContentView::new(webview, loaded),
            registry,
            Arc::clone(&self.pool),
            options,
        );
        bridge.subscribe_host_events(&self.event_bus);
        if let Some(proxy) = self.proxy.clone() {
            let proxy = Mutex::new(proxy);
            bridge.set_waker(move || {
                if let Ok(proxy) = proxy.lock() {
                    send_user_event(&proxy, UserEvent::BridgeWake);
                }
            });
        }
        Ok(bridge)
    }

    /// Push the desktop theme to the page if it differs from the last one sent.
    pub(super) fn push_theme(&mut self) {
        let (Some(window), Some(bridge)) = (self.window.as_ref(), self.bridge.as_mut()) else {
            return;
        };
        let dark = desktop::is_dark(window);
        if self.last_dark == Some(dark) {
            return;
        }
        self.last_dark = Some(dark);
        // Failures are logged by the bridge.
        let _ = bridge.apply_theme(ThemeMode::from_dark(dark));
    }
}
