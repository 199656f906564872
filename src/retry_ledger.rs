use crate::track_metadata::TrackKey;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Source of the current instant. Injectable so retry windows can be tested
/// against a fixed clock instead of wall time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time, the production clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Time-windowed record of tracks that were already retried, preventing
/// error handlers from chasing the same failing track in a loop.
///
/// Entries are independent per key; the map is shared process-wide and
/// starts empty on every restart.
pub struct RetryLedger {
    entries: DashMap<String, Instant>,
    clock: Arc<dyn Clock>,
    retry_window: Duration,
    entry_ttl: Duration,
}

impl RetryLedger {
    pub fn new(retry_window: Duration, entry_ttl: Duration) -> Self {
        Self::with_clock(retry_window, entry_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(retry_window: Duration, entry_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            retry_window,
            entry_ttl,
        }
    }

    /// True when the key was marked within the retry window.
    pub fn was_recently_retried(&self, key: &TrackKey) -> bool {
        let now = self.clock.now();
        self.entries
            .get(key.as_str())
            .is_some_and(|entry| now.duration_since(*entry) < self.retry_window)
    }

    /// Record a retry attempt for the key, refreshing any earlier mark.
    pub fn mark_retried(&self, key: &TrackKey) {
        debug!("Marking retry attempt for track key {}", key);
        self.entries.insert(key.as_str().to_string(), self.clock.now());
    }

    /// Forget one key, re-allowing an immediate retry.
    pub fn clear(&self, key: &TrackKey) {
        self.entries.remove(key.as_str());
    }

    /// Forget every key.
    pub fn clear_all(&self) {
        self.entries.clear();
    }

    /// Drop entries older than the entry TTL.
    pub fn sweep(&self) {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries
            .retain(|_, marked| now.duration_since(*marked) < self.entry_ttl);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Swept {} stale retry records", removed);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Spawn the periodic maintenance task that sweeps stale entries. The
/// handle owns the loop; abort it on shutdown.
pub fn spawn_sweeper(ledger: Arc<RetryLedger>, interval: Duration) -> JoinHandle<()> {
    info!("Starting retry ledger sweeper every {:?}", interval);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; skip it so the first real
        // sweep happens one full interval in.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            ledger.sweep();
        }
    })
}
