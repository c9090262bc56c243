//! Tests for the standard host capability.

use super::*;
use crate::dispatcher::{Dispatcher, Outcome, DEFAULT_CALL_TIMEOUT};
use crate::pool::WorkerPool;
use crate::registry::{ExecutionMode, MethodRegistry};
use serde_json::{json, Value};
use std::sync::Mutex;
use wito_common::{
    BridgeError, MonitorInfo, NotifyOutcome, Position, ScreenInfo, Size, ThemeMode,
};

#[derive(Default)]
struct FakeWindow {
    title: Mutex<String>,
    fullscreen: Mutex<bool>,
    focused: Mutex<bool>,
    size: Mutex<Option<WindowSize>>,
}

impl WindowControl for FakeWindow {
    fn is_fullscreen(&self) -> bool {
        *self.fullscreen.lock().unwrap()
    }
    fn set_fullscreen(&self, fullscreen: bool) {
        *self.fullscreen.lock().unwrap() = fullscreen;
    }
    fn has_focus(&self) -> bool {
        *self.focused.lock().unwrap()
    }
    fn focus(&self) {
        *self.focused.lock().unwrap() = true;
    }
    fn set_title(&self, title: &str) {
        *self.title.lock().unwrap() = title.to_string();
    }
    fn inner_size(&self) -> WindowSize {
        self.size.lock().unwrap().unwrap_or(WindowSize {
            width: 1024,
            height: 768,
        })
    }
    fn request_size(&self, size: WindowSize) {
        *self.size.lock().unwrap() = Some(size);
    }
}

struct OneMonitor;

impl ScreenSource for OneMonitor {
    fn screen_info(&self) -> ScreenInfo {
        ScreenInfo::from_monitors(vec![MonitorInfo::from_physical(
            0,
            Position::default(),
            Size {
                width: 1920,
                height: 1080,
            },
            true,
        )])
    }
}

struct Dark;

impl ThemeSource for Dark {
    fn theme(&self) -> ThemeMode {
        ThemeMode::from_dark(true)
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> NotifyOutcome {
        self.sent.lock().unwrap().push(notification.clone());
        NotifyOutcome::delivered(Some(7))
    }
}

struct Fixture {
    window: Arc<FakeWindow>,
    notifier: Arc<RecordingNotifier>,
    registry: MethodRegistry,
    dispatcher: Dispatcher,
}

fn fixture() -> Fixture {
    let window = Arc::new(FakeWindow::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let services = HostServices {
        window: window.clone(),
        screen: Arc::new(OneMonitor),
        theme: Arc::new(Dark),
        notifier: notifier.clone(),
    };
    let api = Arc::new(HostApi::new(services, "/opt/app"));
    Fixture {
        window,
        notifier,
        registry: MethodRegistry::from_capability(api).unwrap(),
        dispatcher: Dispatcher::new(Arc::new(WorkerPool::new(2).unwrap()), DEFAULT_CALL_TIMEOUT),
    }
}

impl Fixture {
    fn call(&self, method: &str, args: Value) -> Result<Value, BridgeError> {
        let op = self.registry.get(method).unwrap();
        match self.dispatcher.dispatch(op, Args::from_value(args).unwrap()) {
            Outcome::Immediate(result) => result,
            Outcome::Deferred(deferred) => deferred.wait(),
        }
    }
}

#[test]
fn exposes_the_full_surface() {
    let f = fixture();
    let expected = [
        "get_theme_mode",
        "screen_get_info",
        "win_is_fullscreen",
        "win_fullscreen",
        "win_unfullscreen",
        "win_get_focus",
        "win_set_focus",
        "win_set_title",
        "win_get_size",
        "win_set_size",
        "fs_get_app_path",
        "fs_list_dir",
        "fs_create_dir",
        "fs_del_file",
        "fs_read_file",
        "fs_save_file",
        "fs_file_exists",
        "notify",
    ];
    assert_eq!(f.registry.names(), expected);

    let background: Vec<_> = f
        .registry
        .iter()
        .filter(|op| op.mode() == ExecutionMode::Background)
        .map(|op| op.name())
        .collect();
    assert_eq!(
        background,
        ["fs_list_dir", "fs_del_file", "fs_read_file", "fs_save_file"]
    );
}

#[test]
fn set_title_reports_success() {
    let f = fixture();
    let out = f.call("win_set_title", json!({"title": "Hi"})).unwrap();
    assert_eq!(out, json!({"success": true}));
    assert_eq!(*f.window.title.lock().unwrap(), "Hi");
}

#[test]
fn window_state_round_trip() {
    let f = fixture();
    assert_eq!(f.call("win_is_fullscreen", json!({})).unwrap(), json!(false));
    assert_eq!(f.call("win_fullscreen", json!({})).unwrap(), Value::Null);
    assert_eq!(f.call("win_is_fullscreen", json!({})).unwrap(), json!(true));
    f.call("win_unfullscreen", json!({})).unwrap();
    assert_eq!(f.call("win_is_fullscreen", json!({})).unwrap(), json!(false));

    assert_eq!(f.call("win_get_focus", json!({})).unwrap(), json!(false));
    f.call("win_set_focus", json!({})).unwrap();
    assert_eq!(f.call("win_get_focus", json!({})).unwrap(), json!(true));
}

#[test]
fn window_size() {
    let f = fixture();
    assert_eq!(
        f.call("win_get_size", json!({})).unwrap(),
        json!({"width": 1024, "height": 768})
    );
    assert_eq!(
        f.call("win_set_size", json!({"width": 800, "height": 600})).unwrap(),
        json!({"success": true})
    );
    assert_eq!(
        f.call("win_get_size", json!({})).unwrap(),
        json!({"width": 800, "height": 600})
    );

    let err = f.call("win_set_size", json!({"width": "wide", "height": 1})).unwrap_err();
    assert!(err.to_string().starts_with("Invalid argument 'width'"));
}

#[test]
fn theme_and_screen() {
    let f = fixture();
    assert_eq!(
        f.call("get_theme_mode", json!({})).unwrap(),
        json!({"is_dark": true, "is_light": false})
    );
    assert_eq!(
        f.call("screen_get_info", json!({})).unwrap(),
        json!({
            "number_of_monitors": 1,
            "monitors": [{
                "index": 0,
                "position": {"x": 0, "y": 0},
                "size": {"width": 1920, "height": 1080},
                "is_valid": true,
                "is_primary": true
            }]
        })
    );
}

#[test]
fn app_path() {
    let f = fixture();
    assert_eq!(
        f.call("fs_get_app_path", json!({})).unwrap(),
        json!({"path": "/opt/app"})
    );
}

#[test]
fn filesystem_operations() {
    let f = fixture();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("data.txt");

    assert_eq!(
        f.call("fs_save_file", json!({"path": file, "content": "abc"})).unwrap(),
        json!({"success": true})
    );
    assert_eq!(
        f.call("fs_read_file", json!({"path": file})).unwrap(),
        json!({"content": "abc"})
    );
    assert_eq!(
        f.call("fs_list_dir", json!({"path": dir.path()})).unwrap(),
        json!({"contents": ["data.txt"]})
    );
    assert_eq!(
        f.call("fs_file_exists", json!({"path": file})).unwrap()["is_file"],
        json!(true)
    );
    assert_eq!(
        f.call("fs_del_file", json!({"path": file})).unwrap(),
        json!({"success": true})
    );

    let err = f.call("fs_read_file", json!({"path": file})).unwrap();
    assert!(err["error"].is_string());
}

#[test]
fn notify_defaults_priority() {
    let f = fixture();
    let out = f.call("notify", json!({"title": "T", "body": "B"})).unwrap();
    assert_eq!(out, json!({"success": true, "id": 7}));

    f.call("notify", json!({"title": "T", "body": "B", "priority": "urgent"}))
        .unwrap();

    let sent = f.notifier.sent.lock().unwrap();
    assert_eq!(sent[0].priority, NotificationPriority::Normal);
    assert_eq!(sent[1].priority, NotificationPriority::Urgent);
}

#[test]
fn log_notifier_always_succeeds() {
    let out = LogNotifier.notify(&Notification::new("t", "b"));
    assert_eq!(out, NotifyOutcome::delivered(None));
}
