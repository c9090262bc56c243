//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Theme, WindowId};

use wito_common::HostEvent;

use super::core::{UserEvent, WitoApp};
use super::init::full_bounds;

impl ApplicationHandler<UserEvent> for WitoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if !self.initialize_window(event_loop) {
            event_loop.exit();
            return;
        }

        self.start_content_watcher();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::BridgeWake => self.pump_bridge(),
            UserEvent::ContentChanged => self.reload_content(),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.sync_webview_bounds();
                }
            }

            WindowEvent::ThemeChanged(theme) => {
                self.event_bus.publish(HostEvent::ThemeChanged {
                    is_dark: theme == Theme::Dark,
                });
                self.last_dark = Some(theme == Theme::Dark);
                self.pump_bridge();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                self.event_bus.publish(HostEvent::ScreenChanged);
                self.sync_webview_bounds();
                self.pump_bridge();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        self.poll_and_schedule(event_loop);
    }
}

impl WitoApp {
    /// Keep the webview covering the whole client area.
    fn sync_webview_bounds(&mut self) {
        let (Some(window), Some(bridge)) = (self.window.as_ref(), self.bridge.as_ref()) else {
            return;
        };
        if let Err(e) = bridge.view().webview().set_bounds(full_bounds(window)) {
            tracing::warn!("Failed to resize content view: {e}");
        }
    }
}
