//! `wry` adapter: content view, handler wiring, and the `wito://` protocol.

mod content;
mod events;
mod handlers;
mod view;

pub use content::{entry_url, ContentProvider, CONTENT_SCHEME};
pub use events::{PageLoadState, WebViewEvent};
pub use handlers::{
    attach_bridge, attach_content_protocol, is_navigation_allowed, Inbox, ALLOWED_NAV_PREFIXES,
};
pub use view::WryContentView;
