//! Bidirectional RPC between a native host and an embedded web content view.
//!
//! The script side calls exposed host operations and receives correlated
//! results; the host pushes events into the page. Scripts evaluated before
//! the page is ready are queued and flushed in order once it is.
//!
//! ```text
//! IPC body ─▶ protocol::decode ─▶ MethodRegistry ─▶ Dispatcher ─┬─ inline
//!                                                               └─ WorkerPool
//!        ◀── ScriptChannel ◀── Outbound (resolve / reject) ◀────┘
//! ```

pub mod api;
pub mod args;
pub mod bindings;
pub mod bridge;
pub mod channel;
pub mod dispatcher;
pub mod emit;
pub mod pool;
pub mod protocol;
pub mod registry;

#[cfg(feature = "webview")]
pub mod webview;

pub use api::{HostApi, HostServices, LogNotifier, Notifier, ScreenSource, ThemeSource, WindowControl};
pub use args::Args;
pub use bridge::{Bridge, BridgeOptions, Waker};
pub use channel::{ContentView, ScriptCallback, ScriptChannel};
pub use dispatcher::{Dispatcher, Outcome, DEFAULT_CALL_TIMEOUT};
pub use emit::{SCREEN_CHANGE_EVENT, THEME_CHANGE_EVENT};
pub use pool::{DeferredResult, WorkerPool};
pub use protocol::{CallEnvelope, DecodeFailure, Outbound};
pub use registry::{
    AccessKind, Capability, ExecutionMode, ExposureTable, MethodRegistry, Operation,
    RegistryBuilder,
};
