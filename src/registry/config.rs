//! Registry configuration

use std::time::Duration;

use crate::worker::WorkerConfig;

/// Configuration for a [`StreamRegistry`](super::StreamRegistry)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Settings applied to every worker the registry creates
    pub worker: WorkerConfig,
}

impl RegistryConfig {
    /// Set the worker settings wholesale
    pub fn worker(mut self, worker: WorkerConfig) -> Self {
        self.worker = worker;
        self
    }

    /// Set the read retry backoff
    pub fn read_backoff(mut self, backoff: Duration) -> Self {
        self.worker = self.worker.read_backoff(backoff);
        self
    }

    /// Set how long stopping a worker may wait for its loop
    pub fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.worker = self.worker.stop_timeout(timeout);
        self
    }

    /// Mark workers degraded after this many consecutive failed reads
    pub fn degrade_after(mut self, failures: u32) -> Self {
        self.worker = self.worker.degrade_after(failures);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();

        assert_eq!(config.worker, WorkerConfig::default());
    }

    #[test]
    fn test_builder_chaining() {
        let config = RegistryConfig::default()
            .read_backoff(Duration::from_millis(250))
            .stop_timeout(Duration::from_secs(2))
            .degrade_after(10);

        assert_eq!(config.worker.read_backoff, Duration::from_millis(250));
        assert_eq!(config.worker.stop_timeout, Duration::from_secs(2));
        assert_eq!(config.worker.degrade_after, Some(10));
    }
}
