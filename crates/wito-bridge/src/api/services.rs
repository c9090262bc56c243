//! Narrow interfaces to the desktop, implemented by the embedding
//! application.

use std::sync::Arc;

use tracing::info;
use wito_common::{Notification, NotifyOutcome, ScreenInfo, ThemeMode, WindowSize};

/// The native window hosting the content view.
pub trait WindowControl: Send + Sync {
    fn is_fullscreen(&self) -> bool;
    fn set_fullscreen(&self, fullscreen: bool);
    fn has_focus(&self) -> bool;
    fn focus(&self);
    fn set_title(&self, title: &str);
    fn inner_size(&self) -> WindowSize;
    fn request_size(&self, size: WindowSize);
}

/// Connected monitors.
pub trait ScreenSource: Send + Sync {
    fn screen_info(&self) -> ScreenInfo;
}

/// The desktop color scheme.
pub trait ThemeSource: Send + Sync {
    fn theme(&self) -> ThemeMode;
}

/// Desktop notification delivery.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> NotifyOutcome;
}

/// Notifier that only logs. Used where no desktop integration exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> NotifyOutcome {
        info!(
            title = %notification.title,
            urgency = notification.priority.urgency(),
            "notification (log only)"
        );
        NotifyOutcome::delivered(None)
    }
}

/// Everything the standard host capability talks to.
#[derive(Clone)]
pub struct HostServices {
    pub window: Arc<dyn WindowControl>,
    pub screen: Arc<dyn ScreenSource>,
    pub theme: Arc<dyn ThemeSource>,
    pub notifier: Arc<dyn Notifier>,
}
