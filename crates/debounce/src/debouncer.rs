//! Single-slot trailing-edge debouncer
//!
//! Wraps a callback and a wait duration. Each invocation restarts the delay
//! timer; only the last invocation's value within a quiet period is delivered,
//! exactly once, unless preempted by [`Debouncer::clear`] (delivered zero
//! times) or [`Debouncer::flush`] (delivered immediately).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tracing::{debug, trace};

/// Callback invoked when the debounce timer elapses (or on `flush`).
///
/// The first parameter is the debouncer itself, so the callback can call
/// `clear`/`flush`/`pending` on its own wrapper while it runs.
type Callback<T> = dyn Fn(&Debouncer<T>, T) + Send + Sync;

/// The one in-flight scheduled-but-not-yet-delivered invocation
struct PendingCall<T> {
    /// Identifies the timer generation that owns this call; a timer task
    /// whose generation no longer matches lost the race to a newer call
    /// and must not fire
    generation: u64,
    /// Value captured from the most recent invocation
    args: T,
    /// Cancelation handle for the scheduled timer task
    timer: AbortHandle,
}

struct State<T> {
    /// Monotonic counter handing out timer generations
    next_generation: u64,
    /// At most one pending call per debouncer at any time
    pending: Option<PendingCall<T>>,
}

struct Inner<T> {
    wait: Duration,
    callback: Box<Callback<T>>,
    state: Mutex<State<T>>,
}

/// Debounces a callback: delays delivery until `wait` has elapsed since the
/// most recent [`call`](Debouncer::call), with only the latest value
/// surviving.
///
/// Cloning the handle is cheap and every clone shares the same pending slot.
/// The callback runs on the Tokio runtime that `call` was invoked from; the
/// lock protecting the slot is released before the callback runs, so the
/// callback may freely re-enter any operation on its own debouncer.
pub struct Debouncer<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Create a debounced wrapper around `callback` with the given quiet period.
///
/// Equivalent to [`Debouncer::new`]; mirrors the free-function construction
/// shape familiar from other debounce utilities.
pub fn debounce<T, F>(callback: F, wait: Duration) -> Debouncer<T>
where
    T: Send + 'static,
    F: Fn(&Debouncer<T>, T) + Send + Sync + 'static,
{
    Debouncer::new(callback, wait)
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a new debouncer delivering to `callback` after `wait` of quiet
    pub fn new<F>(callback: F, wait: Duration) -> Self
    where
        F: Fn(&Debouncer<T>, T) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                wait,
                callback: Box::new(callback),
                state: Mutex::new(State {
                    next_generation: 0,
                    pending: None,
                }),
            }),
        }
    }

    /// Invoke the debouncer with a new value.
    ///
    /// Cancels any outstanding pending call, captures `args` and restarts the
    /// delay timer from zero. Returns immediately; the callback runs `wait`
    /// later on the ambient Tokio runtime, unless superseded, cleared or
    /// flushed first.
    ///
    /// Must be called from within a Tokio runtime (the runtime provides the
    /// timer).
    pub fn call(&self, args: T) {
        let mut state = self.inner.state.lock();

        if let Some(old) = state.pending.take() {
            old.timer.abort();
            trace!("superseding pending call");
        }

        let generation = state.next_generation;
        state.next_generation += 1;

        // Spawn and store under the same lock hold, so the timer task cannot
        // observe the slot before the pending call is in place.
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.wait).await;
            Debouncer { inner }.fire(generation);
        });

        state.pending = Some(PendingCall {
            generation,
            args,
            timer: handle.abort_handle(),
        });

        trace!("scheduled debounced call (wait: {:?})", self.inner.wait);
    }

    /// If a call is pending, deliver it immediately and synchronously,
    /// short-circuiting the remaining wait. No-op when idle.
    ///
    /// The state is reset to idle before the callback runs, so the callback
    /// observes `pending() == false` and may re-arm the debouncer.
    pub fn flush(&self) {
        let call = self.inner.state.lock().pending.take();

        if let Some(call) = call {
            call.timer.abort();
            debug!("flushing pending call");
            (self.inner.callback)(self, call.args);
        }
    }

    /// Timer-expiry path: deliver the pending call owned by `generation`.
    fn fire(&self, generation: u64) {
        let call = {
            let mut state = self.inner.state.lock();
            match state.pending.take() {
                Some(call) if call.generation == generation => call,
                // A newer call owns the slot (or it is empty); a stale timer
                // that raced past its abort must leave it untouched.
                other => {
                    state.pending = other;
                    return;
                }
            }
        };

        debug!("debounce timer elapsed, running callback");
        (self.inner.callback)(self, call.args);
    }
}

impl<T> Debouncer<T> {
    /// Cancel the outstanding pending call, if any, without delivering it.
    /// Idempotent: a no-op when nothing is pending.
    pub fn clear(&self) {
        let mut state = self.inner.state.lock();
        if let Some(call) = state.pending.take() {
            call.timer.abort();
            trace!("cleared pending call");
        }
    }

    /// Whether a call is currently pending delivery
    pub fn pending(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }

    /// The configured quiet period
    pub fn wait(&self) -> Duration {
        self.inner.wait
    }
}

impl<T> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait", &self.inner.wait)
            .field("pending", &self.pending())
            .finish()
    }
}
