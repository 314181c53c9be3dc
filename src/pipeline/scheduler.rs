//! Render Scheduler - Debounced render requests for the host loop.
//!
//! State setters call [`RenderScheduler::request`] from the render thread.
//! Requests are coalesced by a [`Debouncer`]; when the burst settles, the
//! timer thread sends one [`RenderRequest`] down a channel. The host loop
//! owns the receiver and performs the render itself, so render state never
//! leaves its thread.
//!
//! ```text
//! set() ─┐
//! set() ─┼─► request() ─► Debouncer ─(delay)─► tx.send(RenderRequest) ─► host loop
//! set() ─┘
//! ```

use std::io;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

use super::debounce::Debouncer;

/// One "please render" message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest;

/// Clonable handle to one debounced render trigger.
#[derive(Clone, Debug)]
pub struct RenderScheduler {
    debouncer: Arc<Debouncer>,
}

impl RenderScheduler {
    /// Scheduler that runs `on_render` on the timer thread.
    pub fn new<F>(delay: Duration, on_render: F) -> io::Result<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        Ok(Self {
            debouncer: Arc::new(Debouncer::new(delay, on_render)?),
        })
    }

    /// Scheduler paired with the receiving end of its request channel.
    pub fn channel(delay: Duration) -> io::Result<(Self, Receiver<RenderRequest>)> {
        let (tx, rx) = mpsc::channel();
        let scheduler = Self::new(delay, move || {
            // Receiver gone means the host loop has shut down.
            let _ = tx.send(RenderRequest);
        })?;
        Ok((scheduler, rx))
    }

    /// Ask for a render once the current burst of requests settles.
    pub fn request(&self) {
        self.debouncer.call();
    }

    /// Skip the debounce and emit a request now.
    pub fn request_now(&self) {
        self.debouncer.call_immediate();
    }

    /// Drop a pending request. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        self.debouncer.stop()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_are_coalesced() {
        let (scheduler, rx) = RenderScheduler::channel(Duration::from_millis(20)).expect("spawn");
        for _ in 0..10 {
            scheduler.request();
        }
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok(RenderRequest));
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn test_request_now_is_synchronous() {
        let (scheduler, rx) = RenderScheduler::channel(Duration::from_secs(10)).expect("spawn");
        scheduler.request();
        scheduler.request_now();
        assert_eq!(rx.try_recv(), Ok(RenderRequest));
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_cancel() {
        let (scheduler, rx) = RenderScheduler::channel(Duration::from_millis(20)).expect("spawn");
        scheduler.request();
        assert!(scheduler.cancel());
        assert!(!scheduler.cancel());
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn test_clones_share_one_debouncer() {
        let (scheduler, rx) = RenderScheduler::channel(Duration::from_millis(20)).expect("spawn");
        let other = scheduler.clone();
        scheduler.request();
        other.request();
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok(RenderRequest));
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
