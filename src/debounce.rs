//! Trailing-edge debouncer for free-text filter inputs. Every keystroke
//! restarts the delay window; the value is published as "settled" only once
//! the input has been quiet for a full window.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};

pub use crate::config::DEFAULT_DEBOUNCE;

pub struct Debouncer {
    raw: Mutex<String>,
    tx: mpsc::UnboundedSender<String>,
    settled_rx: watch::Receiver<String>,
    transitions: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let (settled_tx, settled_rx) = watch::channel(String::new());
        let transitions = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&transitions);

        tokio::spawn(async move {
            while let Some(mut pending) = rx.recv().await {
                loop {
                    let timer = tokio::time::sleep(delay);
                    tokio::pin!(timer);
                    tokio::select! {
                        next = rx.recv() => match next {
                            // New keystroke inside the window: restart it
                            Some(value) => pending = value,
                            // Owner dropped mid-window: the pending value
                            // must never settle
                            None => return,
                        },
                        _ = &mut timer => {
                            counter.fetch_add(1, Ordering::SeqCst);
                            let _ = settled_tx.send(pending);
                            break;
                        }
                    }
                }
            }
        });

        Self {
            raw: Mutex::new(String::new()),
            tx,
            settled_rx,
            transitions,
        }
    }

    /// Record a new raw input value, restarting the quiet window
    pub fn input(&self, value: impl Into<String>) {
        let value = value.into();
        *self.raw.lock().unwrap() = value.clone();
        let _ = self.tx.send(value);
    }

    /// The raw (un-debounced) value as last typed
    pub fn raw(&self) -> String {
        self.raw.lock().unwrap().clone()
    }

    /// The current settled value
    pub fn settled(&self) -> String {
        self.settled_rx.borrow().clone()
    }

    /// Watch channel that fires once per settled transition
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.settled_rx.clone()
    }

    /// Number of settled transitions so far
    pub fn transitions(&self) -> u64 {
        self.transitions.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    async fn drain() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_settles_once_with_last_value() {
        let debouncer = Debouncer::new(DELAY);

        debouncer.input("p");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.input("pa");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.input("par");

        // Quiet period shorter than the window: nothing settles yet
        tokio::time::sleep(Duration::from_millis(499)).await;
        drain().await;
        assert_eq!(debouncer.transitions(), 0);
        assert_eq!(debouncer.settled(), "");

        tokio::time::sleep(Duration::from_millis(2)).await;
        drain().await;
        assert_eq!(debouncer.transitions(), 1);
        assert_eq!(debouncer.settled(), "par");
        assert_eq!(debouncer.raw(), "par");
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_change_restarts_the_window() {
        let debouncer = Debouncer::new(DELAY);

        debouncer.input("first");
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.input("second");
        tokio::time::sleep(Duration::from_millis(400)).await;
        drain().await;
        // 800ms elapsed but never 500ms of quiet
        assert_eq!(debouncer.transitions(), 0);

        tokio::time::sleep(Duration::from_millis(101)).await;
        drain().await;
        assert_eq!(debouncer.transitions(), 1);
        assert_eq!(debouncer.settled(), "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_settle() {
        let debouncer = Debouncer::new(DELAY);
        let mut rx = debouncer.subscribe();

        debouncer.input("doomed");
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(debouncer);

        tokio::time::sleep(Duration::from_secs(2)).await;
        drain().await;
        // The pending value never fired; the channel only reports closure
        assert!(!rx.has_changed().unwrap_or(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_transitions_observable_via_watch() {
        let debouncer = Debouncer::new(DELAY);
        let mut rx = debouncer.subscribe();

        debouncer.input("warehouse");
        tokio::time::sleep(Duration::from_millis(501)).await;
        drain().await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().clone(), "warehouse");
        assert!(!rx.has_changed().unwrap());
    }
}
