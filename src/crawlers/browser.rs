use crate::error::Result;
use std::time::Duration;
use tokio::time::Instant;

/// A single browser tab that the catalog crawl drives
///
/// Implementations are used strictly sequentially: every call completes
/// before the next one is issued.
#[allow(async_fn_in_trait)]
pub trait Browser {
    /// Navigate to an absolute URL and wait for the page to load
    async fn goto(&self, url: &str) -> Result<()>;

    /// Rendered HTML of the current page
    async fn source(&self) -> Result<String>;

    /// Wait until the current page stops issuing network requests
    async fn wait_for_network_idle(&self) -> Result<()>;
}

/// Tracks page load state across polls to decide when the network is idle
///
/// The network counts as idle once the document is complete and the number
/// of loaded resources has not changed for `quiet_period`.
#[derive(Debug)]
pub struct IdleTracker {
    quiet_period: Duration,
    last_count: Option<u64>,
    stable_since: Instant,
}

impl IdleTracker {
    pub fn new(quiet_period: Duration, now: Instant) -> Self {
        Self {
            quiet_period,
            last_count: None,
            stable_since: now,
        }
    }

    /// Record one poll result, returning true once the page is idle
    pub fn observe(&mut self, ready: bool, resource_count: Option<u64>, now: Instant) -> bool {
        if ready && resource_count.is_some() && resource_count == self.last_count {
            return now.duration_since(self.stable_since) >= self.quiet_period;
        }
        self.last_count = if ready { resource_count } else { None };
        self.stable_since = now;
        false
    }
}
