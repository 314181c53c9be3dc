//! Debouncer - Trailing-edge coalescing on a dedicated timer thread.
//!
//! Every `call()` pushes the deadline to `now + delay`; the callback runs
//! once, on the timer thread, after `delay` has passed with no further calls.
//!
//! The timer thread sleeps on a condvar: idle with no deadline, or until the
//! current deadline. `call`, `stop` and drop wake it so it can re-read the
//! deadline.

use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::trace;

// =============================================================================
// SHARED STATE
// =============================================================================

struct TimerState {
    deadline: Option<Instant>,
    shutdown: bool,
}

struct Shared {
    delay: Duration,
    state: Mutex<TimerState>,
    wake: Condvar,
    callback: Box<dyn Fn() + Send + Sync>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// DEBOUNCER
// =============================================================================

pub struct Debouncer {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Spawn the timer thread. Fails only if the thread cannot be spawned.
    pub fn new<F>(delay: Duration, callback: F) -> io::Result<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let shared = Arc::new(Shared {
            delay,
            state: Mutex::new(TimerState {
                deadline: None,
                shutdown: false,
            }),
            wake: Condvar::new(),
            callback: Box::new(callback),
        });

        let worker_shared = shared.clone();
        let worker = thread::Builder::new()
            .name("spark-debounce".to_string())
            .spawn(move || Self::timer_loop(&worker_shared))?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    fn timer_loop(shared: &Shared) {
        let mut state = shared.lock();
        loop {
            if state.shutdown {
                return;
            }
            match state.deadline {
                None => {
                    state = shared
                        .wake
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        state.deadline = None;
                        drop(state);
                        trace!(delay_ms = shared.delay.as_millis() as u64, "debounce fired");
                        (shared.callback)();
                        state = shared.lock();
                    } else {
                        let (guard, _) = shared
                            .wake
                            .wait_timeout(state, deadline - now)
                            .unwrap_or_else(PoisonError::into_inner);
                        state = guard;
                    }
                }
            }
        }
    }

    /// Schedule the callback `delay` from now, replacing any pending deadline.
    pub fn call(&self) {
        let mut state = self.shared.lock();
        state.deadline = Some(Instant::now() + self.shared.delay);
        self.shared.wake.notify_one();
    }

    /// Cancel the pending call, if any. The callback does not run.
    pub fn stop(&self) -> bool {
        let mut state = self.shared.lock();
        let pending = state.deadline.take().is_some();
        self.shared.wake.notify_one();
        pending
    }

    /// Cancel the pending call and run the callback now, on this thread.
    pub fn call_immediate(&self) {
        self.stop();
        (self.shared.callback)();
    }

    pub fn is_pending(&self) -> bool {
        self.shared.lock().deadline.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.shared.delay
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        {
            let mut state = self.shared.lock();
            state.shutdown = true;
            state.deadline = None;
            self.shared.wake.notify_one();
        }
        if let Some(worker) = self.worker.take() {
            if worker.thread().id() != thread::current().id() {
                let _ = worker.join();
            }
        }
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.shared.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
