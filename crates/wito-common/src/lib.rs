pub mod errors;
pub mod events;
pub mod id;
pub mod ident;
pub mod notifications;
pub mod types;

pub use errors::{BridgeError, ConfigError, RegistryError, ViewError, WitoError};
pub use events::{EventBus, HostEvent};
pub use id::CallId;
pub use ident::{is_js_reserved_word, is_reserved_name, is_script_identifier};
pub use notifications::{Notification, NotificationPriority, NotifyOutcome};
pub use types::{MonitorInfo, Position, ScreenInfo, Size, ThemeMode, WindowSize};

pub type Result<T> = std::result::Result<T, WitoError>;
