use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use wry::WebViewBuilder;

use super::content::{ContentProvider, CONTENT_SCHEME};
use super::events::{PageLoadState, WebViewEvent};

/// Events raised by webview handlers, drained on the main context.
pub type Inbox = Arc<Mutex<Vec<WebViewEvent>>>;

/// Allowed URL prefixes for webview navigation.
pub const ALLOWED_NAV_PREFIXES: &[&str] = &[
    "wito://",
    // WebView2 rewrites custom protocols: wito://localhost/… → http://wito.localhost/…
    "http://wito.localhost",
    "https://wito.localhost",
    "about:blank",
];

pub fn is_navigation_allowed(url: &str) -> bool {
    ALLOWED_NAV_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

/// Install the bridge's init script and event handlers.
///
/// IPC bodies and page-load transitions land in `inbox`; `loaded` tracks
/// whether the current page has finished loading.
pub fn attach_bridge<'a>(
    builder: WebViewBuilder<'a>,
    inbox: Inbox,
    loaded: Arc<AtomicBool>,
    init_script: &str,
) -> WebViewBuilder<'a> {
    let builder = builder.with_initialization_script(init_script);
    let builder = attach_ipc_handler(builder, Arc::clone(&inbox));
    let builder = attach_page_load_handler(builder, Arc::clone(&inbox), loaded);
    attach_navigation_handler(builder, inbox)
}

/// Serve `provider` over `wito://`.
pub fn attach_content_protocol<'a>(
    builder: WebViewBuilder<'a>,
    provider: Arc<ContentProvider>,
) -> WebViewBuilder<'a> {
    builder.with_custom_protocol(CONTENT_SCHEME.to_string(), move |_id, request| {
        provider.respond(&request)
    })
}

fn push(inbox: &Inbox, event: WebViewEvent) {
    match inbox.lock() {
        Ok(mut events) => events.push(event),
        Err(_) => warn!("webview inbox poisoned, event dropped"),
    }
}

fn attach_ipc_handler(builder: WebViewBuilder<'_>, inbox: Inbox) -> WebViewBuilder<'_> {
    builder.with_ipc_handler(move |request| {
        let body = request.body().to_string();
        debug!(body_len = body.len(), "IPC message from script");
        push(&inbox, WebViewEvent::IpcMessage { body });
    })
}

fn attach_page_load_handler(
    builder: WebViewBuilder<'_>,
    inbox: Inbox,
    loaded: Arc<AtomicBool>,
) -> WebViewBuilder<'_> {
    builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(?state, url = %url, "page load");
        loaded.store(state == PageLoadState::Finished, Ordering::SeqCst);
        push(&inbox, WebViewEvent::PageLoad { state, url });
    })
}

fn attach_navigation_handler(builder: WebViewBuilder<'_>, inbox: Inbox) -> WebViewBuilder<'_> {
    builder.with_navigation_handler(move |url| {
        if is_navigation_allowed(&url) {
            return true;
        }
        warn!(url = %url, "navigation blocked");
        push(&inbox, WebViewEvent::NavigationBlocked { url });
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_app_content() {
        assert!(is_navigation_allowed("wito://localhost/index.html"));
        assert!(is_navigation_allowed("http://wito.localhost/index.html"));
        assert!(is_navigation_allowed("about:blank"));
    }

    #[test]
    fn blocks_everything_else() {
        assert!(!is_navigation_allowed("https://example.com"));
        assert!(!is_navigation_allowed("file:///etc/passwd"));
        assert!(!is_navigation_allowed("javascript:alert(1)"));
        assert!(!is_navigation_allowed(""));
    }

    #[test]
    fn push_appends_in_order() {
        let inbox: Inbox = Arc::default();
        push(&inbox, WebViewEvent::IpcMessage { body: "1".into() });
        push(&inbox, WebViewEvent::IpcMessage { body: "2".into() });
        let events = inbox.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                WebViewEvent::IpcMessage { body: "1".into() },
                WebViewEvent::IpcMessage { body: "2".into() },
            ]
        );
    }
}
