//! Stream worker configuration

use std::time::Duration;

/// Default delay before retrying a failed read
pub const DEFAULT_READ_BACKOFF: Duration = Duration::from_secs(1);

/// Default bound on how long `stop` waits for the poll loop
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Poll loop tuning shared by every worker in a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Delay before retrying after a failed read
    pub read_backoff: Duration,

    /// How long `stop` waits for the loop to exit before detaching it
    pub stop_timeout: Duration,

    /// Consecutive failed reads after which the worker is marked degraded
    /// (None = never). The loop keeps retrying either way.
    pub degrade_after: Option<u32>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            read_backoff: DEFAULT_READ_BACKOFF,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
            degrade_after: None,
        }
    }
}

impl WorkerConfig {
    /// Set the read retry backoff
    pub fn read_backoff(mut self, backoff: Duration) -> Self {
        self.read_backoff = backoff;
        self
    }

    /// Set the stop timeout
    pub fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Mark workers degraded after `failures` consecutive failed reads
    pub fn degrade_after(mut self, failures: u32) -> Self {
        self.degrade_after = Some(failures.max(1));
        self
    }
}
