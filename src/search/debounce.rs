//! Cancellable quiet-period timer.
//!
//! Every [`Debouncer::push`] aborts the pending timer task and spawns a fresh
//! one. Emissions are tagged with a generation number so that a timer which
//! fired just before being superseded cannot leak its value.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delays values until no new value has arrived for `delay`.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<(u64, T)>,
    rx: mpsc::UnboundedReceiver<(u64, T)>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer with the given quiet period. Must be used inside a tokio runtime.
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            delay,
            generation: 0,
            pending: None,
            tx,
            rx,
        }
    }

    /// Schedule `value` for emission, replacing anything still pending.
    pub fn push(&mut self, value: T) {
        self.cancel();

        let generation = self.generation;
        let delay = self.delay;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send((generation, value));
        }));
    }

    /// Drop the pending value, if any, without emitting it.
    pub fn cancel(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a value is waiting for its quiet period to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the next value to settle. Cancel-safe.
    pub async fn settled(&mut self) -> Option<T> {
        loop {
            let (generation, value) = self.rx.recv().await?;
            if generation == self.generation && self.pending.is_some() {
                self.pending = None;
                return Some(value);
            }
            tracing::trace!(generation, "Dropping superseded debounce emission");
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Instant};

    const QUIET: Duration = Duration::from_millis(600);

    #[tokio::test(start_paused = true)]
    async fn test_emits_after_quiet_period() {
        let mut debouncer = Debouncer::new(QUIET);
        let start = Instant::now();

        debouncer.push("dune".to_string());
        assert!(debouncer.is_pending());

        assert_eq!(debouncer.settled().await.as_deref(), Some("dune"));
        assert!(start.elapsed() >= QUIET);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_input_emits_final_value_once() {
        let mut debouncer = Debouncer::new(QUIET);
        let start = Instant::now();

        for prefix in ["d", "du", "dun", "dune"] {
            debouncer.push(prefix.to_string());
            advance(Duration::from_millis(200)).await;
        }

        assert_eq!(debouncer.settled().await.as_deref(), Some("dune"));
        // the last keystroke landed at 600ms, so emission waits until 1200ms
        assert!(start.elapsed() >= Duration::from_millis(1200));
        assert!(!debouncer.is_pending());

        let next = tokio::time::timeout(Duration::from_secs(5), debouncer.settled()).await;
        assert!(next.is_err(), "no second emission expected");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_emission() {
        let mut debouncer = Debouncer::new(QUIET);
        debouncer.push("dune".to_string());
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        let next = tokio::time::timeout(Duration::from_secs(5), debouncer.settled()).await;
        assert!(next.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_but_unconsumed_value_is_superseded() {
        let mut debouncer = Debouncer::new(QUIET);
        debouncer.push("old".to_string());

        // let the first timer fire without consuming it
        advance(QUIET + Duration::from_millis(1)).await;
        tokio::task::yield_now().await;

        debouncer.push("new".to_string());
        assert_eq!(debouncer.settled().await.as_deref(), Some("new"));
    }
}
