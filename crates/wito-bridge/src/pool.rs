//! Bounded worker pool for background operations.
//!
//! One pool is shared by every bridge in the process. It is created
//! explicitly, handed to dispatchers as an `Arc`, and drained with
//! [`WorkerPool::shutdown`].

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, info, warn};
use wito_common::BridgeError;

/// Poll interval while draining in-flight work at shutdown.
const DRAIN_POLL: Duration = Duration::from_millis(5);

type Settlement = Result<Value, BridgeError>;
type SettleCallback = Box<dyn FnOnce(Settlement) + Send + 'static>;

enum SlotState {
    Pending(Option<SettleCallback>),
    Settled(Settlement),
    Delivered,
}

/// Handle to a background call whose outcome is not yet known.
///
/// Settles exactly once to a value, an application error, a timeout, or a
/// worker-pool failure. The outcome is handed to exactly one callback.
pub struct DeferredResult {
    slot: Arc<Mutex<SlotState>>,
}

impl DeferredResult {
    fn new() -> (Self, Settler) {
        let slot = Arc::new(Mutex::new(SlotState::Pending(None)));
        let settler = Settler {
            slot: Arc::clone(&slot),
            in_flight: None,
            done: false,
        };
        (Self { slot }, settler)
    }

    /// Run `callback` with the outcome.
    ///
    /// Runs immediately on the calling thread if already settled, otherwise
    /// later on the worker pool's thread that settles it.
    pub fn on_settle<F>(self, callback: F)
    where
        F: FnOnce(Settlement) + Send + 'static,
    {
        let mut state = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        match std::mem::replace(&mut *state, SlotState::Delivered) {
            SlotState::Settled(result) => {
                drop(state);
                callback(result);
            }
            SlotState::Pending(_) => {
                *state = SlotState::Pending(Some(Box::new(callback)));
            }
            SlotState::Delivered => {}
        }
    }

    /// Whether the outcome is known.
    pub fn is_settled(&self) -> bool {
        let state = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        !matches!(*state, SlotState::Pending(_))
    }

    /// Block the calling thread until the outcome is known.
    pub fn wait(self) -> Settlement {
        let (tx, rx) = mpsc::channel();
        self.on_settle(move |result| {
            let _ = tx.send(result);
        });
        rx.recv().unwrap_or_else(|_| {
            Err(BridgeError::WorkerPool(
                "deferred result dropped without settling".into(),
            ))
        })
    }
}

/// Producer half of a [`DeferredResult`].
///
/// Dropping it unsettled (a cancelled supervisor task at runtime shutdown)
/// settles the call with a worker-pool error.
struct Settler {
    slot: Arc<Mutex<SlotState>>,
    in_flight: Option<Arc<AtomicUsize>>,
    done: bool,
}

impl Settler {
    fn settle(&mut self, result: Settlement) {
        if self.done {
            return;
        }
        self.done = true;

        let mut state = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        match std::mem::replace(&mut *state, SlotState::Delivered) {
            SlotState::Pending(Some(callback)) => {
                drop(state);
                callback(result);
            }
            SlotState::Pending(None) => {
                *state = SlotState::Settled(result);
            }
            // A settled slot is never settled again.
            other => *state = other,
        }
    }
}

impl Drop for Settler {
    fn drop(&mut self) {
        self.settle(Err(BridgeError::WorkerPool(
            "worker pool shut down before the operation completed".into(),
        )));
        if let Some(counter) = self.in_flight.take() {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Fixed-size pool running background operations off the main context.
///
/// Jobs beyond `size` queue rather than fail. A job that exceeds its
/// ceiling settles as a timeout, but the job itself keeps running until it
/// returns; there is no cancellation of in-flight work.
///
/// The ceiling is measured from [`submit`](Self::submit), so time spent
/// queued behind busy workers counts against it. On a saturated pool a
/// queued job can time out before it starts and still run once a worker
/// frees up; its late result is discarded.
pub struct WorkerPool {
    runtime: Mutex<Option<Runtime>>,
    handle: Handle,
    size: usize,
    accepting: AtomicBool,
    in_flight: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Start a pool with `size` worker threads (at least one).
    pub fn new(size: usize) -> std::io::Result<Self> {
        let size = size.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(size)
            .thread_name("wito-worker")
            .enable_time()
            .build()?;
        let handle = runtime.handle().clone();

        info!(workers = size, "worker pool started");

        Ok(Self {
            runtime: Mutex::new(Some(runtime)),
            handle,
            size,
            accepting: AtomicBool::new(true),
            in_flight: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Jobs submitted but not yet settled.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    /// Run `job` on a worker, settling as a timeout after `ceiling`.
    pub fn submit<F>(&self, label: &str, job: F, ceiling: Duration) -> Result<DeferredResult, BridgeError>
    where
        F: FnOnce() -> Settlement + Send + 'static,
    {
        if !self.is_accepting() {
            return Err(BridgeError::WorkerPool("worker pool is shut down".into()));
        }

        let (deferred, mut settler) = DeferredResult::new();
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        settler.in_flight = Some(Arc::clone(&self.in_flight));

        let label = label.to_string();
        debug!(operation = %label, "submitting background job");

        // The settler moves into the task so that a task dropped before it
        // is ever polled still settles the call.
        self.handle.spawn(async move {
            let mut settler = settler;
            let work = tokio::task::spawn_blocking(job);
            let result = match tokio::time::timeout(ceiling, work).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_err)) => Err(BridgeError::WorkerPool(join_err.to_string())),
                Err(_) => {
                    warn!(operation = %label, ?ceiling, "background operation timed out");
                    Err(BridgeError::Timeout(ceiling))
                }
            };
            settler.settle(result);
        });

        Ok(deferred)
    }

    /// Stop accepting work, wait up to `grace` for in-flight jobs, then stop
    /// the worker threads.
    pub fn shutdown(&self, grace: Duration) {
        if !self.accepting.swap(false, Ordering::SeqCst) {
            return;
        }

        let deadline = Instant::now() + grace;
        while self.in_flight() > 0 && Instant::now() < deadline {
            std::thread::sleep(DRAIN_POLL);
        }

        let remaining = self.in_flight();
        if remaining > 0 {
            warn!(remaining, "worker pool stopping with jobs still running");
        }

        let runtime = self
            .runtime
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        if let Some(rt) = runtime {
            rt.shutdown_timeout(deadline.saturating_duration_since(Instant::now()));
        }
        info!("worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let runtime = self
            .runtime
            .get_mut()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        if let Some(rt) = runtime {
            rt.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LONG: Duration = Duration::from_secs(10);

    #[test]
    fn job_result_is_delivered() {
        let pool = WorkerPool::new(2).unwrap();
        let deferred = pool.submit("answer", || Ok(json!(42)), LONG).unwrap();
        assert_eq!(deferred.wait().unwrap(), json!(42));
    }

    #[test]
    fn application_errors_are_delivered_as_errors() {
        let pool = WorkerPool::new(2).unwrap();
        let deferred = pool
            .submit("fail", || Err(BridgeError::application("boom")), LONG)
            .unwrap();
        assert_eq!(deferred.wait().unwrap_err().to_string(), "boom");
    }

    #[test]
    fn slow_job_times_out() {
        let pool = WorkerPool::new(1).unwrap();
        let deferred = pool
            .submit(
                "sleepy",
                || {
                    std::thread::sleep(Duration::from_millis(500));
                    Ok(Value::Null)
                },
                Duration::from_millis(20),
            )
            .unwrap();
        assert!(matches!(deferred.wait(), Err(BridgeError::Timeout(_))));
    }

    #[test]
    fn callback_runs_exactly_once() {
        let pool = WorkerPool::new(2).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();

        let deferred = pool.submit("once", || Ok(json!("done")), LONG).unwrap();
        let counter = Arc::clone(&calls);
        deferred.on_settle(move |result| {
            counter.fetch_add(1, Ordering::SeqCst);
            tx.send(result).unwrap();
        });

        assert_eq!(rx.recv().unwrap().unwrap(), json!("done"));
        pool.shutdown(Duration::from_secs(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_attached_after_settling_runs_immediately() {
        let pool = WorkerPool::new(1).unwrap();
        let deferred = pool.submit("quick", || Ok(json!(1)), LONG).unwrap();
        let deadline = Instant::now() + LONG;
        while !deferred.is_settled() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(deferred.is_settled());

        let (tx, rx) = mpsc::channel();
        deferred.on_settle(move |r| tx.send(r).unwrap());
        assert_eq!(rx.try_recv().unwrap().unwrap(), json!(1));
    }

    #[test]
    fn jobs_beyond_capacity_queue() {
        let pool = WorkerPool::new(1).unwrap();
        let deferreds: Vec<_> = (0..4)
            .map(|i| {
                pool.submit(
                    "queued",
                    move || {
                        std::thread::sleep(Duration::from_millis(10));
                        Ok(json!(i))
                    },
                    LONG,
                )
                .unwrap()
            })
            .collect();

        let values: Vec<_> = deferreds.into_iter().map(|d| d.wait().unwrap()).collect();
        assert_eq!(values, vec![json!(0), json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn shutdown_rejects_new_work_and_drains_old() {
        let pool = WorkerPool::new(2).unwrap();
        let deferred = pool
            .submit(
                "draining",
                || {
                    std::thread::sleep(Duration::from_millis(30));
                    Ok(json!("finished"))
                },
                LONG,
            )
            .unwrap();

        pool.shutdown(Duration::from_secs(5));
        assert_eq!(pool.in_flight(), 0);
        assert_eq!(deferred.wait().unwrap(), json!("finished"));

        let err = pool.submit("late", || Ok(Value::Null), LONG).err().unwrap();
        assert!(matches!(err, BridgeError::WorkerPool(_)));
    }

    #[test]
    fn size_is_at_least_one() {
        let pool = WorkerPool::new(0).unwrap();
        assert_eq!(pool.size(), 1);
    }
}
