//! Cancellable delayed actions keyed by entry

use catalog_domain::EntryId;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::time::Duration;
use tokio::task::JoinHandle;

/// The two delayed transitions scheduled when a save succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Clears the catalog highlight set by this entry's save
    Highlight(EntryId),
    /// Removes this entry once its fade window ends
    Fade(EntryId),
}

impl TimerKey {
    /// Entry the timer belongs to
    pub fn entry(&self) -> EntryId {
        match self {
            TimerKey::Highlight(id) | TimerKey::Fade(id) => *id,
        }
    }
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKey::Highlight(id) => write!(f, "highlight:{}", id.short()),
            TimerKey::Fade(id) => write!(f, "fade:{}", id.short()),
        }
    }
}

/// Registry of pending one-shot timers
///
/// Each timer is a tokio task that sleeps and then runs its action.
/// Cancelling aborts the task, so an action never runs after its key has
/// been cancelled unless it had already started. Dropping the registry
/// cancels everything still pending.
///
/// Must be used from within a tokio runtime.
pub struct TimerRegistry<K> {
    timers: HashMap<K, JoinHandle<()>>,
}

impl<K> TimerRegistry<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            timers: HashMap::new(),
        }
    }

    /// Run `action` once `delay` has elapsed
    ///
    /// Scheduling a key that is already pending replaces (and cancels) the
    /// earlier timer.
    pub fn schedule<F>(&mut self, key: K, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        tracing::debug!(key = ?key, delay_ms = delay.as_millis() as u64, "Timer scheduled");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });

        if let Some(previous) = self.timers.insert(key, handle) {
            previous.abort();
        }
    }

    /// Forget a timer whose action has run; does not abort anything
    pub fn complete(&mut self, key: &K) {
        self.timers.remove(key);
    }

    /// Cancel one timer; returns whether it was pending
    pub fn cancel(&mut self, key: &K) -> bool {
        match self.timers.remove(key) {
            Some(handle) => {
                handle.abort();
                tracing::debug!(key = ?key, "Timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel every timer whose key satisfies `predicate`
    pub fn cancel_where<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&K) -> bool,
    {
        let keys: Vec<K> = self
            .timers
            .keys()
            .filter(|k| predicate(*k))
            .cloned()
            .collect();

        keys.iter().filter(|k| self.cancel(*k)).count()
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) -> usize {
        self.cancel_where(|_| true)
    }

    /// Whether a timer is registered under `key`
    pub fn is_scheduled(&self, key: &K) -> bool {
        self.timers.contains_key(key)
    }

    /// Number of timers still registered
    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

impl<K> Default for TimerRegistry<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for TimerRegistry<K> {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for TimerRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("pending", &self.timers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::sleep;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let fired = counter();
        let mut timers = TimerRegistry::new();

        let f = fired.clone();
        timers.schedule("a", Duration::from_millis(1000), move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(990)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(20)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let fired = counter();
        let mut timers = TimerRegistry::new();

        let f = fired.clone();
        timers.schedule("a", Duration::from_millis(100), move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        assert!(timers.cancel(&"a"));
        assert!(!timers.cancel(&"a"));

        sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(timers.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_where_is_selective() {
        let fired = counter();
        let mut timers = TimerRegistry::new();
        let a = EntryId::new();

        for key in [TimerKey::Highlight(a), TimerKey::Fade(a)] {
            let f = fired.clone();
            timers.schedule(key, Duration::from_millis(100), move || {
                f.fetch_add(1, Ordering::SeqCst);
            });
        }

        let cancelled = timers.cancel_where(|k| matches!(k, TimerKey::Fade(_)));
        assert_eq!(cancelled, 1);
        assert!(timers.is_scheduled(&TimerKey::Highlight(a)));

        sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_previous() {
        let fired = counter();
        let mut timers = TimerRegistry::new();

        for _ in 0..3 {
            let f = fired.clone();
            timers.schedule("a", Duration::from_millis(100), move || {
                f.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(timers.pending(), 1);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending() {
        let fired = counter();
        {
            let mut timers = TimerRegistry::new();
            let f = fired.clone();
            timers.schedule(1u8, Duration::from_millis(100), move || {
                f.fetch_add(1, Ordering::SeqCst);
            });
        }

        sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_timer_key_entry() {
        let id = EntryId::new();
        assert_eq!(TimerKey::Highlight(id).entry(), id);
        assert_eq!(TimerKey::Fade(id).entry(), id);
        assert!(TimerKey::Fade(id).to_string().starts_with("fade:"));
    }
}
