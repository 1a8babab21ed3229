use chrono::{DateTime, Utc};
use std::time::Duration;

/// Cached pages older than this are refreshed when a session starts.
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializeAction {
    /// Serve the cache as is.
    SkipInitialRefresh,
    /// Run a `Refresh` load before serving anything.
    LaunchInitialRefresh,
}

/// Time-based gate deciding whether a new session may start from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheFreshness {
    timeout: Duration,
}

impl Default for CacheFreshness {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TIMEOUT)
    }
}

impl CacheFreshness {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `last_created` is the newest remote key timestamp; `None` counts as
    /// the epoch.
    pub fn evaluate(
        &self,
        last_created: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> InitializeAction {
        let created = last_created.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let elapsed = now.signed_duration_since(created);
        let timeout = chrono::Duration::from_std(self.timeout).unwrap_or(chrono::Duration::MAX);

        if elapsed < timeout {
            InitializeAction::SkipInitialRefresh
        } else {
            InitializeAction::LaunchInitialRefresh
        }
    }
}
