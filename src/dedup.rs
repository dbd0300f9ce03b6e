//! Answer dedup cache.
//!
//! Users tend to mention the bot several times in a row, and each mention
//! would otherwise produce another comparison. The cache remembers, per
//! `(channel, user)`, until when further mentions are ignored.
//!
//! A key is only marked once its mention has been answered, so a Slack
//! delivery retry that lands while the first completion is still in flight
//! is not suppressed.
//!
//! The map is shared between request handlers and a single background sweep
//! task, so every access goes through one mutex. Entries are only ever removed
//! by the sweep; there is no size bound.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Build the dedup key for a channel/user pair.
pub fn answer_key(channel: &str, user: &str) -> String {
    format!("{channel}_{user}")
}

/// Process-wide expiring set of recently answered participants.
#[derive(Debug)]
pub struct AnswerCache {
    window: Duration,
    entries: Mutex<HashMap<String, Instant>>,
}

impl AnswerCache {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is safe to keep using.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True while `key` has an unexpired entry.
    pub fn should_skip(&self, key: &str, now: Instant) -> bool {
        self.lock().get(key).is_some_and(|expiry| *expiry > now)
    }

    /// Record an answer for `key`, extending any existing expiry.
    pub fn mark_answered(&self, key: &str, now: Instant) {
        self.lock().insert(key.to_string(), now + self.window);
    }

    /// Remove every entry whose expiry is not after `now`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, expiry| *expiry > now);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Spawn the background sweep task.
///
/// The first tick fires after one full `interval`. The task runs until the
/// returned handle is aborted or the runtime shuts down.
pub fn spawn_sweeper(cache: Arc<AnswerCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let removed = cache.sweep(Instant::now());
            if removed > 0 {
                debug!(removed, remaining = cache.len(), "Swept expired answer entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn key_joins_channel_and_user() {
        assert_eq!(answer_key("C1", "U1"), "C1_U1");
    }

    #[test]
    fn window_is_kept() {
        assert_eq!(AnswerCache::new(HOUR).window(), HOUR);
    }

    #[test]
    fn unknown_key_is_not_skipped() {
        let cache = AnswerCache::new(HOUR);
        assert!(!cache.should_skip("C1_U1", Instant::now()));
    }

    #[test]
    fn skip_until_expiry_then_allow() {
        let cache = AnswerCache::new(HOUR);
        let t0 = Instant::now();
        cache.mark_answered("C1_U1", t0);

        assert!(cache.should_skip("C1_U1", t0));
        assert!(cache.should_skip("C1_U1", t0 + Duration::from_secs(3599)));
        assert!(!cache.should_skip("C1_U1", t0 + HOUR));
        assert!(!cache.should_skip("C1_U1", t0 + HOUR + Duration::from_secs(1)));
        // other keys unaffected
        assert!(!cache.should_skip("C1_U2", t0));
    }

    #[test]
    fn mark_again_extends_expiry() {
        let cache = AnswerCache::new(HOUR);
        let t0 = Instant::now();
        cache.mark_answered("k", t0);
        cache.mark_answered("k", t0 + Duration::from_secs(1800));
        assert!(cache.should_skip("k", t0 + HOUR + Duration::from_secs(60)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn sweep_removes_only_expired() {
        let cache = AnswerCache::new(HOUR);
        let t0 = Instant::now();
        cache.mark_answered("old", t0);
        cache.mark_answered("new", t0 + Duration::from_secs(1800));

        assert_eq!(cache.sweep(t0 + Duration::from_secs(60)), 0);
        assert_eq!(cache.len(), 2);

        let removed = cache.sweep(t0 + HOUR + Duration::from_secs(1));
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.should_skip("new", t0 + HOUR + Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn sweeper_task_clears_expired_entries() {
        let cache = Arc::new(AnswerCache::new(Duration::from_millis(10)));
        cache.mark_answered("k", Instant::now());

        let handle = spawn_sweeper(Arc::clone(&cache), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(cache.is_empty());
    }
}
