//! Event emission scripts.

use serde::Serialize;
use serde_json::Value;
use wito_common::{BridgeError, ThemeMode};

/// Fired when the monitor set or geometry changes.
pub const SCREEN_CHANGE_EVENT: &str = "screenChange";
/// Fired when the desktop color scheme changes.
pub const THEME_CHANGE_EVENT: &str = "isDarkTheme";

/// Script dispatching `event` with `data` to the runtime's listeners.
///
/// Fails without producing a script when `data` has no JSON form.
pub fn event_script<T: Serialize + ?Sized>(
    global: &str,
    event: &str,
    data: &T,
) -> Result<String, BridgeError> {
    let payload = serde_json::to_string(data).map_err(BridgeError::payload_serialization)?;
    Ok(format!(
        "{global}._emitEvent({}, {payload});",
        Value::String(event.to_string())
    ))
}

/// Script swapping the body's theme class.
pub fn theme_class_script(theme: ThemeMode) -> String {
    let add = theme.body_class();
    let remove = ThemeMode::from_dark(!theme.is_dark).body_class();
    format!(
        "(function(){{var b=document.body;if(!b)return;b.classList.remove('{remove}');b.classList.add('{add}');}})();"
    )
}
