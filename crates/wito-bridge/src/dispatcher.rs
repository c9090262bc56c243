//! Execution dispatcher: inline for synchronous operations, worker pool for
//! background ones.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};
use wito_common::BridgeError;

use crate::args::Args;
use crate::pool::{DeferredResult, WorkerPool};
use crate::registry::{ExecutionMode, Handler, Operation};

/// Default ceiling for background operations.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// What a dispatched call produced.
pub enum Outcome {
    /// Known right away.
    Immediate(Result<Value, BridgeError>),
    /// Settles later, possibly on another thread.
    Deferred(DeferredResult),
}

impl Outcome {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

/// Routes calls by their operation's execution mode.
pub struct Dispatcher {
    pool: Arc<WorkerPool>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(pool: Arc<WorkerPool>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Invoke `op` with `args`.
    ///
    /// Never blocks on background work: those calls return
    /// [`Outcome::Deferred`] immediately.
    pub fn dispatch(&self, op: &Operation, args: Args) -> Outcome {
        let handler = match op.select_handler(&args) {
            Ok(h) => h,
            Err(e) => return Outcome::Immediate(Err(e)),
        };

        match op.mode() {
            ExecutionMode::Synchronous => {
                debug!(operation = op.name(), "dispatching inline");
                Outcome::Immediate(invoke_guarded(op.name(), &handler, &args))
            }
            ExecutionMode::Background => {
                debug!(operation = op.name(), "dispatching to worker pool");
                let name = op.name().to_string();
                let job = move || invoke_guarded(&name, &handler, &args);
                match self.pool.submit(op.name(), job, self.timeout) {
                    Ok(deferred) => Outcome::Deferred(deferred),
                    Err(e) => Outcome::Immediate(Err(e)),
                }
            }
        }
    }
}

/// Run a handler, turning a panic into an application error.
fn invoke_guarded(name: &str, handler: &Handler, args: &Args) -> Result<Value, BridgeError> {
    catch_unwind(AssertUnwindSafe(|| handler(args))).unwrap_or_else(|_| {
        warn!(operation = name, "operation panicked");
        Err(BridgeError::application(format!(
            "Operation '{name}' panicked"
        )))
    })
}
