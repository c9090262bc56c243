//! Application state and the winit event loop handler.

mod core;
mod desktop;
mod event_handler;
mod init;
mod polling;
mod reload;
mod shutdown;

pub use self::core::{UserEvent, WitoApp};
