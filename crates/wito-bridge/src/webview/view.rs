use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use wito_common::ViewError;

use crate::channel::{ContentView, ScriptCallback};

/// [`ContentView`] over a `wry` webview.
///
/// The load flag is shared with the page-load handler installed by
/// [`attach_bridge`](super::attach_bridge).
pub struct WryContentView {
    webview: wry::WebView,
    loaded: Arc<AtomicBool>,
}

impl WryContentView {
    pub fn new(webview: wry::WebView, loaded: Arc<AtomicBool>) -> Self {
        Self { webview, loaded }
    }

    pub fn webview(&self) -> &wry::WebView {
        &self.webview
    }

    /// Reload the current page. The load handler flips readiness.
    pub fn reload(&self) -> Result<(), ViewError> {
        self.webview
            .evaluate_script("window.location.reload();")
            .map_err(|e| ViewError::Evaluate(e.to_string()))
    }
}

impl ContentView for WryContentView {
    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    fn evaluate_script(
        &self,
        script: &str,
        callback: Option<ScriptCallback>,
    ) -> Result<(), ViewError> {
        let result = match callback {
            None => self.webview.evaluate_script(script),
            Some(cb) => {
                // wry wants `Fn`; the callback runs once.
                let slot = Mutex::new(Some(cb));
                self.webview
                    .evaluate_script_with_callback(script, move |result| {
                        let cb = slot.lock().ok().and_then(|mut s| s.take());
                        if let Some(cb) = cb {
                            cb(result);
                        }
                    })
            }
        };
        result.map_err(|e| ViewError::Evaluate(e.to_string()))
    }
}
