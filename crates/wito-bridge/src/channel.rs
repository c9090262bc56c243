//! Script channel: readiness-gated script evaluation against the content view.

use std::collections::VecDeque;

use tracing::{debug, info, warn};
use wito_common::ViewError;

/// Receives the JSON-encoded result of an evaluated script.
pub type ScriptCallback = Box<dyn FnOnce(String) + Send + 'static>;

/// The embedded content view, as seen by the bridge.
///
/// All methods are called on the main context.
pub trait ContentView {
    /// Whether the current page has finished loading.
    fn is_loaded(&self) -> bool;

    /// Evaluate `script` now, optionally reporting its result to `callback`.
    fn evaluate_script(
        &self,
        script: &str,
        callback: Option<ScriptCallback>,
    ) -> Result<(), ViewError>;
}

struct PendingScript {
    script: String,
    callback: Option<ScriptCallback>,
}

/// Buffers scripts while the view is not ready and flushes them in
/// submission order once it is.
pub struct ScriptChannel<V> {
    view: V,
    ready: bool,
    pending: VecDeque<PendingScript>,
}

impl<V: ContentView> ScriptChannel<V> {
    /// A channel starting out not-ready.
    pub fn new(view: V) -> Self {
        Self {
            view,
            ready: false,
            pending: VecDeque::new(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Evaluate now if ready, otherwise queue.
    pub fn eval(&mut self, script: impl Into<String>, callback: Option<ScriptCallback>) {
        let script = script.into();
        if self.ready {
            self.run(&script, callback);
        } else {
            debug!(queued = self.pending.len() + 1, "view not ready, queueing script");
            self.pending.push_back(PendingScript { script, callback });
        }
    }

    /// Mark ready and flush the queue in FIFO order. Returns how many
    /// scripts were flushed.
    pub fn set_ready(&mut self) -> usize {
        self.ready = true;
        let mut flushed = 0;
        while let Some(entry) = self.pending.pop_front() {
            self.run(&entry.script, entry.callback);
            flushed += 1;
        }
        if flushed > 0 {
            info!(flushed, "flushed pending scripts");
        }
        flushed
    }

    /// Back to queueing, e.g. while a new page loads. Nothing queued is lost.
    pub fn set_not_ready(&mut self) {
        if self.ready {
            debug!("view not ready");
        }
        self.ready = false;
    }

    /// Follow the view's own load state.
    pub fn sync_with_view(&mut self) -> usize {
        if self.view.is_loaded() {
            self.set_ready()
        } else {
            self.set_not_ready();
            0
        }
    }

    fn run(&self, script: &str, callback: Option<ScriptCallback>) {
        debug!(len = script.len(), "evaluating script");
        if let Err(e) = self.view.evaluate_script(script, callback) {
            warn!(error = %e, "script evaluation failed");
        }
    }
}
