use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use wito_common::{BridgeError, CallId, EventBus, HostEvent, ThemeMode};

use super::BridgeOptions;
use crate::bindings;
use crate::channel::{ContentView, ScriptCallback, ScriptChannel};
use crate::dispatcher::{Dispatcher, Outcome};
use crate::emit::{self, SCREEN_CHANGE_EVENT, THEME_CHANGE_EVENT};
use crate::pool::WorkerPool;
use crate::protocol::{self, CallEnvelope, Outbound};
use crate::registry::MethodRegistry;

/// Wakes the main context after a background call settles. Called from
/// worker threads.
pub type Waker = Arc<dyn Fn() + Send + Sync + 'static>;

type Completion = (CallId, Result<Value, BridgeError>);

/// Connects a content view to a method registry.
pub struct Bridge<V: ContentView> {
    channel: ScriptChannel<V>,
    registry: MethodRegistry,
    dispatcher: Dispatcher,
    options: BridgeOptions,
    completions_tx: mpsc::Sender<Completion>,
    completions_rx: mpsc::Receiver<Completion>,
    waker: Arc<Mutex<Option<Waker>>>,
    pending: Arc<AtomicUsize>,
    host_events: Option<broadcast::Receiver<HostEvent>>,
}

impl<V: ContentView> Bridge<V> {
    /// The script channel starts in the view's current load state.
    pub fn new(
        view: V,
        registry: MethodRegistry,
        pool: Arc<WorkerPool>,
        options: BridgeOptions,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel();
        let mut channel = ScriptChannel::new(view);
        channel.sync_with_view();

        info!(
            operations = registry.len(),
            global = %options.global_name,
            workers = pool.size(),
            "bridge created"
        );

        Self {
            channel,
            registry,
            dispatcher: Dispatcher::new(pool, options.call_timeout),
            options,
            completions_tx,
            completions_rx,
            waker: Arc::new(Mutex::new(None)),
            pending: Arc::new(AtomicUsize::new(0)),
            host_events: None,
        }
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    pub fn view(&self) -> &V {
        self.channel.view()
    }

    pub fn is_ready(&self) -> bool {
        self.channel.is_ready()
    }

    /// Scripts waiting for the view to become ready.
    pub fn queued_scripts(&self) -> usize {
        self.channel.pending_len()
    }

    /// Background calls dispatched but not yet answered.
    pub fn pending_calls(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Runtime, bindings, and ready signal for the view's init script.
    pub fn init_script(&self) -> String {
        bindings::init_script(&self.registry, &self.options)
    }

    /// Install the function that wakes the main context.
    pub fn set_waker<F>(&mut self, waker: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.waker.lock().unwrap_or_else(|p| p.into_inner()) = Some(Arc::new(waker));
    }

    /// Forward events published on `bus` to the page, drained by [`Bridge::pump`].
    pub fn subscribe_host_events(&mut self, bus: &EventBus) {
        self.host_events = Some(bus.subscribe());
    }

    /// Handle one IPC body from the content view.
    pub fn handle_inbound(&mut self, raw: &str) {
        let envelope = match protocol::decode(raw) {
            Ok(env) => env,
            Err(failure) => {
                match failure.id {
                    Some(id) => {
                        warn!(id = %id, error = %failure.error, "rejecting malformed call");
                        self.deliver(id, Err(failure.error));
                    }
                    None => {
                        warn!(error = %failure.error, "dropping undecodable message");
                    }
                }
                return;
            }
        };

        let CallEnvelope { id, method, args } = envelope;
        if self.options.dev_mode {
            debug!(id = %id, method = %method, args = %args.clone().into_value(), "inbound call");
        } else {
            debug!(id = %id, method = %method, "inbound call");
        }

        let Some(op) = self.registry.get(&method) else {
            warn!(id = %id, method = %method, "operation not found");
            self.deliver(id, Err(BridgeError::OperationNotFound(method)));
            return;
        };

        match self.dispatcher.dispatch(op, args) {
            Outcome::Immediate(result) => self.deliver(id, result),
            Outcome::Deferred(deferred) => {
                self.pending.fetch_add(1, Ordering::SeqCst);
                let tx = self.completions_tx.clone();
                let waker = Arc::clone(&self.waker);
                deferred.on_settle(move |result| {
                    // The receiver only disappears with the bridge itself.
                    if tx.send((id, result)).is_err() {
                        return;
                    }
                    let waker = waker.lock().unwrap_or_else(|p| p.into_inner()).clone();
                    if let Some(wake) = waker {
                        wake();
                    }
                });
            }
        }
    }

    /// Deliver settled background calls and forward host events. Returns how
    /// many calls were answered.
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok((id, result)) = self.completions_rx.try_recv() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            self.deliver(id, result);
            delivered += 1;
        }

        for event in self.drain_host_events() {
            self.forward_host_event(event);
        }

        delivered
    }

    /// A new page started loading: queue scripts until it finishes.
    pub fn on_load_started(&mut self) {
        self.channel.set_not_ready();
    }

    /// The page finished loading: flush queued scripts.
    pub fn on_load_finished(&mut self) -> usize {
        let flushed = self.channel.set_ready();
        info!(flushed, "content view ready");
        flushed
    }

    /// Evaluate a script, queued while the view is not ready.
    pub fn eval(&mut self, script: impl Into<String>, callback: Option<ScriptCallback>) {
        self.channel.eval(script, callback);
    }

    /// Dispatch `event` with `data` to the page's listeners.
    pub fn emit<T: Serialize + ?Sized>(&mut self, event: &str, data: &T) -> Result<(), BridgeError> {
        match emit::event_script(&self.options.global_name, event, data) {
            Ok(script) => {
                debug!(event, "emitting event");
                self.channel.eval(script, None);
                Ok(())
            }
            Err(e) => {
                warn!(event, error = %e, "event not emitted");
                Err(e)
            }
        }
    }

    /// Swap the body theme class and fire the theme event.
    pub fn apply_theme(&mut self, theme: ThemeMode) -> Result<(), BridgeError> {
        self.channel.eval(emit::theme_class_script(theme), None);
        self.emit(THEME_CHANGE_EVENT, &json!({ "is_dark": theme.is_dark }))
    }

    /// Stop taking background work, wait up to `grace` for what is running,
    /// and answer every call that settled meanwhile.
    ///
    /// The pool is shared, so this drains it for every bridge using it.
    pub fn shutdown(&mut self, grace: Duration) {
        info!(pending = self.pending_calls(), "bridge shutting down");
        self.dispatcher.pool().shutdown(grace);
        let delivered = self.pump();
        if self.pending_calls() > 0 {
            warn!(
                unanswered = self.pending_calls(),
                "calls left unanswered at shutdown"
            );
        }
        debug!(delivered, "final completions delivered");
    }

    fn deliver(&mut self, id: CallId, result: Result<Value, BridgeError>) {
        let outbound = Outbound::from_result(id, result);
        match &outbound {
            Outbound::Resolve { id, value } if self.options.dev_mode => {
                debug!(id = %id, result = %value, "resolving call");
            }
            Outbound::Resolve { id, .. } => debug!(id = %id, "resolving call"),
            Outbound::Reject { id, message } => debug!(id = %id, message = %message, "rejecting call"),
        }
        let script = outbound.to_script(&self.options.global_name);
        self.channel.eval(script, None);
    }

    fn drain_host_events(&mut self) -> Vec<HostEvent> {
        let mut events = Vec::new();
        let Some(rx) = self.host_events.as_mut() else {
            return events;
        };
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(broadcast::error::TryRecvError::Empty) => break,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "host events dropped, bridge fell behind");
                }
                Err(broadcast::error::TryRecvError::Closed) => {
                    self.host_events = None;
                    break;
                }
            }
        }
        events
    }

    fn forward_host_event(&mut self, event: HostEvent) {
        // Emission failures are logged by `emit`.
        let _ = match event {
            HostEvent::ThemeChanged { is_dark } => self.apply_theme(ThemeMode::from_dark(is_dark)),
            HostEvent::ScreenChanged => self.emit(SCREEN_CHANGE_EVENT, &json!({})),
            HostEvent::Custom { name, data } => self.emit(&name, &data),
            HostEvent::Shutdown | HostEvent::Unknown => Ok(()),
        };
    }
}
