//! The bridge facade: one content view, one registry, a shared worker pool.
//!
//! Owned by the main context. Inbound IPC bodies go to
//! [`Bridge::handle_inbound`]; background completions and host events are
//! delivered by [`Bridge::pump`], which the event loop calls whenever the
//! bridge's waker fires.

mod facade;
mod options;


pub use facade::{Bridge, Waker};
pub use options::BridgeOptions;
