//! Stream registry implementation
//!
//! The central registry that owns all active stream workers and serves
//! their cached frames.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinSet;

use crate::camera::CameraConfig;
use crate::worker::{
    CachedFrame, ConnectError, StreamBackend, StreamWorker, WorkerState, WorkerStats,
};

use super::config::RegistryConfig;
use super::error::RegistryError;

/// Central registry for all active streams
///
/// Thread-safe via `RwLock`. Share it behind an `Arc`; its lifetime is the
/// lifetime of the hosting service. Call [`shutdown`](Self::shutdown)
/// before dropping it to stop every worker and wait for their connections
/// to be released.
pub struct StreamRegistry {
    /// Map of stream id to worker
    streams: RwLock<HashMap<String, Arc<StreamWorker>>>,

    /// Transport and encoder for new workers
    backend: StreamBackend,

    /// Configuration
    config: RegistryConfig,
}

impl StreamRegistry {
    /// Create a new registry with default configuration and backend
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self::with_backend(config, StreamBackend::default())
    }

    /// Create a new registry with a custom transport and encoder
    pub fn with_backend(config: RegistryConfig, backend: StreamBackend) -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
            backend,
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// MIME type of the frames this registry serves
    pub fn content_type(&self) -> &'static str {
        self.backend.encoder.content_type()
    }

    /// Add a stream, replacing any existing stream with the same id
    ///
    /// An invalid config is rejected before anything else happens, leaving
    /// an existing stream untouched. Otherwise the existing stream is
    /// stopped first, then the new one is connected. If the connect fails
    /// the id is left absent.
    ///
    /// The write lock is held for the whole connect, so `get_frame` on every
    /// other id waits until the camera answers or the transport gives up
    /// (up to ten seconds with GStreamer). Cancelling the returned future
    /// leaves the id absent and releases any connection opened meanwhile.
    pub async fn add(&self, id: &str, config: CameraConfig) -> Result<(), RegistryError> {
        if let Err(e) = config.validate() {
            return Err(RegistryError::Connect {
                id: id.to_string(),
                error: ConnectError::InvalidConfig(e),
            });
        }

        let mut streams = self.streams.write().await;

        if let Some(previous) = streams.remove(id) {
            tracing::info!(stream = %id, "Replacing existing stream");
            previous.stop().await;
        }

        let worker = StreamWorker::connect(id, config, self.config.worker.clone(), &self.backend)
            .await
            .map_err(|error| RegistryError::Connect {
                id: id.to_string(),
                error,
            })?;

        streams.insert(id.to_string(), Arc::new(worker));

        tracing::info!(stream = %id, streams = streams.len(), "Stream added");
        Ok(())
    }

    /// Stop and remove a stream
    pub async fn remove(&self, id: &str) -> Result<(), RegistryError> {
        let mut streams = self.streams.write().await;

        let worker = streams
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        worker.stop().await;

        tracing::info!(stream = %id, streams = streams.len(), "Stream removed");
        Ok(())
    }

    /// Get the latest cached frame of a stream
    ///
    /// Returns `NotFound` for unknown ids and `NoFrameYet` while a stream
    /// has not produced its first frame.
    pub async fn get_frame(&self, id: &str) -> Result<CachedFrame, RegistryError> {
        let worker = self
            .worker(id)
            .await
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        worker
            .cached_frame()
            .ok_or_else(|| RegistryError::NoFrameYet(id.to_string()))
    }

    /// Clone the handle of a stream's worker
    async fn worker(&self, id: &str) -> Option<Arc<StreamWorker>> {
        self.streams.read().await.get(id).cloned()
    }

    /// Check if a stream exists
    pub async fn contains(&self, id: &str) -> bool {
        self.streams.read().await.contains_key(id)
    }

    /// Sorted ids of all active streams
    pub async fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.streams.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Get total number of streams
    pub async fn len(&self) -> usize {
        self.streams.read().await.len()
    }

    /// Whether no streams are registered
    pub async fn is_empty(&self) -> bool {
        self.streams.read().await.is_empty()
    }

    /// Config a stream was added with
    pub async fn config_of(&self, id: &str) -> Option<CameraConfig> {
        self.worker(id).await.map(|w| w.config().clone())
    }

    /// Get stream statistics
    pub async fn stream_stats(&self, id: &str) -> Option<WorkerStats> {
        self.worker(id).await.map(|w| w.stats())
    }

    /// Ids of streams currently marked degraded
    pub async fn degraded(&self) -> Vec<String> {
        let streams = self.streams.read().await;
        let mut ids: Vec<String> = streams
            .iter()
            .filter(|(_, worker)| worker.state() == WorkerState::Degraded)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Stop every stream and empty the registry
    ///
    /// Workers are stopped concurrently, each bounded by the configured
    /// stop timeout.
    pub async fn shutdown(&self) {
        let mut streams = self.streams.write().await;
        let count = streams.len();

        let mut stopping = JoinSet::new();
        for (_, worker) in streams.drain() {
            stopping.spawn(async move { worker.stop().await });
        }
        while let Some(result) = stopping.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Stream stop task failed");
            }
        }

        tracing::info!(streams = count, "Registry shut down");
    }
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}
