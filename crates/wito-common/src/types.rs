//! Wire value types shared by host operations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// One connected monitor, in physical pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorInfo {
    pub index: usize,
    pub position: Position,
    pub size: Size,
    pub is_valid: bool,
    pub is_primary: bool,
}

impl MonitorInfo {
    /// A monitor from its physical geometry. Zero-area monitors are invalid.
    pub fn from_physical(index: usize, position: Position, size: Size, is_primary: bool) -> Self {
        Self {
            index,
            position,
            size,
            is_valid: size.width > 0 && size.height > 0,
            is_primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenInfo {
    pub number_of_monitors: usize,
    pub monitors: Vec<MonitorInfo>,
}

impl ScreenInfo {
    pub fn from_monitors(monitors: Vec<MonitorInfo>) -> Self {
        Self {
            number_of_monitors: monitors.len(),
            monitors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeMode {
    pub is_dark: bool,
    pub is_light: bool,
}

impl ThemeMode {
    pub fn from_dark(is_dark: bool) -> Self {
        Self {
            is_dark,
            is_light: !is_dark,
        }
    }

    /// The class placed on `document.body` for this mode.
    pub fn body_class(self) -> &'static str {
        if self.is_dark {
            "dark-theme"
        } else {
            "light-theme"
        }
    }
}
