// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Runs an action once input has been quiet for `delay`.
///
/// Scheduling a new action cancels the pending one. Only the wait is
/// cancellable: once the timer fires the action runs to completion, and
/// anything it spawns is independent of later schedules.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `action` after the delay, replacing any pending action.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let task = tokio::spawn(async move {
            sleep(delay).await;
            action();
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }

    /// Drop the pending action, if any
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    type Fired = Arc<Mutex<Vec<&'static str>>>;

    fn record(fired: &Fired, label: &'static str) -> impl FnOnce() + Send + 'static {
        let fired = fired.clone();
        move || fired.lock().unwrap().push(label)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        debouncer.schedule(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(299)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_schedule_wins() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = Fired::default();

        debouncer.schedule(record(&fired, "s"));
        sleep(Duration::from_millis(100)).await;
        debouncer.schedule(record(&fired, "sh"));
        sleep(Duration::from_millis(100)).await;
        debouncer.schedule(record(&fired, "sho"));

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(*fired.lock().unwrap(), vec!["sho"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_gaps_fire_each_action() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = Fired::default();

        debouncer.schedule(record(&fired, "a"));
        sleep(Duration::from_millis(400)).await;
        debouncer.schedule(record(&fired, "b"));
        sleep(Duration::from_millis(400)).await;

        assert_eq!(*fired.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = Fired::default();

        debouncer.schedule(record(&fired, "a"));
        debouncer.cancel();

        sleep(Duration::from_millis(1000)).await;
        assert!(fired.lock().unwrap().is_empty());
    }
}
