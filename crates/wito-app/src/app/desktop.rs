//! Host services backed by the winit window and the desktop.

use std::process::Command;
use std::sync::Arc;

use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::window::{Fullscreen, Theme, Window};

use wito_bridge::{HostServices, Notifier, ScreenSource, ThemeSource, WindowControl};
use wito_common::{
    MonitorInfo, Notification, NotificationPriority, NotifyOutcome, Position, ScreenInfo, Size,
    ThemeMode, WindowSize,
};

/// Services for [`wito_bridge::HostApi`] talking to `window`.
pub(super) fn host_services(window: Arc<Window>) -> HostServices {
    let desktop = Arc::new(DesktopWindow(window));
    HostServices {
        window: desktop.clone(),
        screen: desktop.clone(),
        theme: desktop,
        notifier: Arc::new(DesktopNotifier),
    }
}

/// Whether the desktop currently prefers a dark color scheme.
///
/// Unknown (no system preference exposed) counts as light.
pub(super) fn is_dark(window: &Window) -> bool {
    matches!(window.theme(), Some(Theme::Dark))
}

pub(super) struct DesktopWindow(Arc<Window>);

impl WindowControl for DesktopWindow {
    fn is_fullscreen(&self) -> bool {
        self.0.fullscreen().is_some()
    }

    fn set_fullscreen(&self, fullscreen: bool) {
        let mode = fullscreen.then_some(Fullscreen::Borderless(None));
        self.0.set_fullscreen(mode);
    }

    fn has_focus(&self) -> bool {
        self.0.has_focus()
    }

    fn focus(&self) {
        self.0.focus_window();
    }

    fn set_title(&self, title: &str) {
        self.0.set_title(title);
    }

    fn inner_size(&self) -> WindowSize {
        let size: LogicalSize<u32> = self.0.inner_size().to_logical(self.0.scale_factor());
        WindowSize {
            width: size.width,
            height: size.height,
        }
    }

    fn request_size(&self, size: WindowSize) {
        // The returned size is the one applied synchronously, if any; a
        // Resized event follows either way.
        let _ = self
            .0
            .request_inner_size(LogicalSize::new(size.width, size.height));
    }
}

impl ScreenSource for DesktopWindow {
    fn screen_info(&self) -> ScreenInfo {
        let primary = self.0.primary_monitor();
        let monitors = self
            .0
            .available_monitors()
            .enumerate()
            .map(|(index, monitor)| {
                let position = monitor.position();
                let size = monitor.size();
                let is_primary = match &primary {
                    Some(p) => *p == monitor,
                    None => position.x == 0 && position.y == 0,
                };
                MonitorInfo::from_physical(
                    index,
                    Position {
                        x: position.x,
                        y: position.y,
                    },
                    Size {
                        width: size.width,
                        height: size.height,
                    },
                    is_primary,
                )
            })
            .collect();
        ScreenInfo::from_monitors(monitors)
    }
}

impl ThemeSource for DesktopWindow {
    fn theme(&self) -> ThemeMode {
        ThemeMode::from_dark(is_dark(&self.0))
    }
}

/// Native notifications.
///
/// - Linux / BSD: `notify-send` with the freedesktop urgency level.
/// - macOS: `osascript` (no urgency support).
/// - Elsewhere: logged only.
pub(super) struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, notification: &Notification) -> NotifyOutcome {
        match platform_notify(notification) {
            Ok(()) => {
                info!(title = %notification.title, "native notification sent");
                NotifyOutcome::delivered(None)
            }
            Err(message) => {
                warn!(title = %notification.title, error = %message, "notification failed");
                NotifyOutcome::failed(message)
            }
        }
    }
}

#[cfg_attr(not(unix), allow(dead_code))]
fn run(mut command: Command) -> Result<(), String> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .map_err(|e| format!("failed to run {program}: {e}"))?;
    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(format!("{program} failed: {}", stderr.trim()))
    }
}

#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
fn urgency_arg(priority: NotificationPriority) -> &'static str {
    match priority.urgency() {
        0 => "low",
        1 => "normal",
        _ => "critical",
    }
}

#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
fn notify_send_args(notification: &Notification) -> Vec<String> {
    vec![
        "-u".into(),
        urgency_arg(notification.priority).into(),
        "-a".into(),
        "wito".into(),
        notification.title.clone(),
        notification.body.clone(),
    ]
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn escape_applescript(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn osascript_source(notification: &Notification) -> String {
    format!(
        "display notification \"{}\" with title \"{}\"",
        escape_applescript(&notification.body),
        escape_applescript(&notification.title)
    )
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_notify(notification: &Notification) -> Result<(), String> {
    let mut command = Command::new("notify-send");
    command.args(notify_send_args(notification));
    run(command)
}

#[cfg(target_os = "macos")]
fn platform_notify(notification: &Notification) -> Result<(), String> {
    let mut command = Command::new("osascript");
    command.arg("-e").arg(osascript_source(notification));
    run(command)
}

#[cfg(not(unix))]
fn platform_notify(notification: &Notification) -> Result<(), String> {
    info!(
        title = %notification.title,
        urgency = notification.priority.urgency(),
        "notification (log only)"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_maps_to_notify_send_levels() {
        assert_eq!(urgency_arg(NotificationPriority::Low), "low");
        assert_eq!(urgency_arg(NotificationPriority::Normal), "normal");
        assert_eq!(urgency_arg(NotificationPriority::High), "critical");
        assert_eq!(urgency_arg(NotificationPriority::Urgent), "critical");
    }

    #[test]
    fn notify_send_args_carry_title_and_body() {
        let n = Notification::new("Build", "done in 3s").with_priority(NotificationPriority::Low);
        assert_eq!(
            notify_send_args(&n),
            vec!["-u", "low", "-a", "wito", "Build", "done in 3s"]
        );
    }

    #[test]
    fn osascript_source_escapes_quotes() {
        let n = Notification::new("Say \"hi\"", r"C:\path");
        assert_eq!(
            osascript_source(&n),
            r#"display notification "C:\\path" with title "Say \"hi\"""#
        );
    }

    #[test]
    fn run_reports_missing_program() {
        let err = run(Command::new("wito-definitely-not-a-program")).unwrap_err();
        assert!(err.contains("failed to run wito-definitely-not-a-program"));
    }
}
