//! Scheduled callbacks
//!
//! Delayed effects are modelled as events delivered back to the owner of the
//! controller, never as closures run behind its back. A [`TimerHandle`] can
//! cancel delivery until the event has been handed over.

use crate::types::DrawId;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Events produced by timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaffleEvent {
    /// The presentation delay of a draw has elapsed
    DrawElapsed(DrawId),
}

/// Cancellable handle to a scheduled event
#[derive(Debug)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    abort: Option<AbortHandle>,
}

impl TimerHandle {
    /// Handle sharing `cancelled` with whoever delivers the event
    #[must_use]
    pub fn new(cancelled: Arc<AtomicBool>) -> Self {
        Self {
            cancelled,
            abort: None,
        }
    }

    /// Also abort `task` on cancel
    #[must_use]
    pub fn with_abort(mut self, task: AbortHandle) -> Self {
        self.abort = Some(task);
        self
    }

    /// Prevent delivery. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(task) = &self.abort {
            task.abort();
        }
    }

    /// Whether [`cancel`](Self::cancel) was called
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Something that can deliver an event after a delay
pub trait Timer {
    /// Schedule `event` for delivery after `delay`
    fn schedule(&self, delay: Duration, event: RaffleEvent) -> TimerHandle;
}

/// Tokio-backed timer delivering events over an mpsc channel
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioTimer {
    sender: mpsc::UnboundedSender<RaffleEvent>,
}

impl TokioTimer {
    /// Create timer and the receiving end of its event channel
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RaffleEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Timer feeding an existing channel
    #[must_use]
    pub fn new(sender: mpsc::UnboundedSender<RaffleEvent>) -> Self {
        Self { sender }
    }
}

impl Timer for TokioTimer {
    fn schedule(&self, delay: Duration, event: RaffleEvent) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let sender = self.sender.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !flag.load(Ordering::SeqCst) {
                // Receiver gone means the app is shutting down
                let _ = sender.send(event);
            }
        });

        TimerHandle::new(cancelled).with_abort(task.abort_handle())
    }
}

#[derive(Debug)]
struct ManualEntry {
    due: Duration,
    event: RaffleEvent,
    cancelled: Arc<AtomicBool>,
}

/// Timer driven by hand
///
/// Nothing fires until [`advance`](Self::advance) moves the virtual clock
/// forward. Used for deterministic tests and instant (no-delay) runs.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    inner: Arc<Mutex<ManualInner>>,
}

#[derive(Debug, Default)]
struct ManualInner {
    now: Duration,
    queue: Vec<ManualEntry>,
}

impl ManualTimer {
    /// Create timer at virtual time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward and return every non-cancelled event now due,
    /// in due order
    pub fn advance(&self, by: Duration) -> Vec<RaffleEvent> {
        let mut inner = self.inner.lock();
        inner.now += by;
        let now = inner.now;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            inner.queue.drain(..).partition(|e| e.due <= now);
        inner.queue = rest;
        due.sort_by_key(|e| e.due);

        due.into_iter()
            .filter(|e| !e.cancelled.load(Ordering::SeqCst))
            .map(|e| e.event)
            .collect()
    }

    /// Fire everything still pending regardless of due time
    pub fn flush(&self) -> Vec<RaffleEvent> {
        let remaining = {
            let inner = self.inner.lock();
            let latest = inner.queue.iter().map(|e| e.due).max().unwrap_or(inner.now);
            latest.saturating_sub(inner.now)
        };
        self.advance(remaining)
    }

    /// Number of scheduled events not yet delivered (cancelled included)
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.lock().queue.len()
    }
}

impl Timer for ManualTimer {
    fn schedule(&self, delay: Duration, event: RaffleEvent) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut inner = self.inner.lock();
        let due = inner.now + delay;
        inner.queue.push(ManualEntry {
            due,
            event,
            cancelled: Arc::clone(&cancelled),
        });
        TimerHandle::new(cancelled)
    }
}

impl<T: Timer + ?Sized> Timer for Arc<T> {
    fn schedule(&self, delay: Duration, event: RaffleEvent) -> TimerHandle {
        (**self).schedule(delay, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_timer_fires_when_due() {
        let timer = ManualTimer::new();
        let id = DrawId::new();
        let _handle = timer.schedule(Duration::from_secs(3), RaffleEvent::DrawElapsed(id));

        assert!(timer.advance(Duration::from_secs(2)).is_empty());
        assert_eq!(
            timer.advance(Duration::from_secs(1)),
            vec![RaffleEvent::DrawElapsed(id)]
        );
        assert_eq!(timer.pending(), 0);
    }

    #[test]
    fn manual_timer_skips_cancelled() {
        let timer = ManualTimer::new();
        let handle = timer.schedule(Duration::from_millis(10), RaffleEvent::DrawElapsed(DrawId::new()));
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(timer.flush().is_empty());
    }

    #[tokio::test]
    async fn tokio_timer_delivers() {
        let (timer, mut rx) = TokioTimer::channel();
        let id = DrawId::new();
        let _handle = timer.schedule(Duration::from_millis(20), RaffleEvent::DrawElapsed(id));
        assert_eq!(rx.recv().await, Some(RaffleEvent::DrawElapsed(id)));
    }

    #[tokio::test]
    async fn tokio_timer_cancel_prevents_delivery() {
        let (timer, mut rx) = TokioTimer::channel();
        let handle = timer.schedule(Duration::from_millis(20), RaffleEvent::DrawElapsed(DrawId::new()));
        handle.cancel();
        drop(timer);
        // Aborted task drops its sender clone, so the channel closes
        assert_eq!(rx.recv().await, None);
    }
}
