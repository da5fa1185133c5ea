//! Camera catalog
//!
//! JSON persistence of camera definitions, keyed by stream id. The registry
//! never touches the catalog; hosts load it and feed each entry to
//! [`StreamRegistry::add`](crate::registry::StreamRegistry::add).
//!
//! The file is a single JSON object:
//!
//! ```json
//! {
//!   "front_door": {
//!     "name": "Front door",
//!     "address": "rtsp://192.168.1.10:554/stream1",
//!     "username": "admin",
//!     "password": "secret",
//!     "fps": 15,
//!     "resolution": [1280, 720]
//!   }
//! }
//! ```
//!
//! `rtsp_url` is accepted in place of `address` when loading.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::camera::CameraConfig;

/// Error loading or saving a catalog file
#[derive(Debug)]
pub enum CatalogError {
    /// Reading or writing the file failed
    Io { path: PathBuf, source: io::Error },
    /// The file is not a valid catalog
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
            CatalogError::Json { path, source } => {
                write!(f, "{}: invalid catalog: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io { source, .. } => Some(source),
            CatalogError::Json { source, .. } => Some(source),
        }
    }
}

/// Camera definitions backed by a JSON file
#[derive(Debug, Clone)]
pub struct CameraCatalog {
    path: PathBuf,
    cameras: BTreeMap<String, CameraConfig>,
}

impl CameraCatalog {
    /// Empty catalog that will be saved to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cameras: BTreeMap::new(),
        }
    }

    /// Load a catalog, treating a missing file as empty
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Catalog file missing, starting empty");
                return Ok(Self::new(path));
            }
            Err(source) => return Err(CatalogError::Io { path, source }),
        };

        let cameras: BTreeMap<String, CameraConfig> = match serde_json::from_str(&text) {
            Ok(cameras) => cameras,
            Err(source) => return Err(CatalogError::Json { path, source }),
        };

        tracing::info!(path = %path.display(), cameras = cameras.len(), "Catalog loaded");
        Ok(Self { path, cameras })
    }

    /// Write the catalog as pretty-printed JSON
    ///
    /// The file is replaced through a sibling temp file so a crash mid-write
    /// never leaves a truncated catalog behind.
    pub async fn save(&self) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(&self.cameras).map_err(|source| {
            CatalogError::Json {
                path: self.path.clone(),
                source,
            }
        })?;

        let io_err = |source| CatalogError::Io {
            path: self.path.clone(),
            source,
        };

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), cameras = self.cameras.len(), "Catalog saved");
        Ok(())
    }

    /// File the catalog is saved to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace a camera, returning the previous definition
    pub fn upsert(&mut self, id: impl Into<String>, config: CameraConfig) -> Option<CameraConfig> {
        self.cameras.insert(id.into(), config)
    }

    pub fn remove(&mut self, id: &str) -> Option<CameraConfig> {
        self.cameras.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&CameraConfig> {
        self.cameras.get(id)
    }

    /// Cameras in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CameraConfig)> {
        self.cameras.iter().map(|(id, config)| (id.as_str(), config))
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let catalog = CameraCatalog::load(dir.path().join("cameras.json"))
            .await
            .unwrap();

        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cameras.json");

        let mut catalog = CameraCatalog::new(&path);
        catalog.upsert(
            "front",
            CameraConfig::new("rtsp://10.0.0.2/live")
                .name("Front door")
                .credentials("admin", "secret")
                .fps(15),
        );
        catalog.upsert("yard", CameraConfig::new("rtsp://10.0.0.3/live"));
        catalog.save().await.unwrap();

        let loaded = CameraCatalog::load(&path).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("front"), catalog.get("front"));
        assert_eq!(loaded.get("yard").unwrap().fps, 30);

        let ids: Vec<&str> = loaded.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["front", "yard"]);
        assert!(!dir.path().join("cameras.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_accepts_rtsp_url_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cameras.json");
        tokio::fs::write(
            &path,
            r#"{"cam1": {"name": "Lobby", "rtsp_url": "rtsp://cam1/live",
                "username": null, "password": null, "fps": 10,
                "resolution": [640, 480]}}"#,
        )
        .await
        .unwrap();

        let catalog = CameraCatalog::load(&path).await.unwrap();
        let cam = catalog.get("cam1").unwrap();

        assert_eq!(cam.address, "rtsp://cam1/live");
        assert_eq!(cam.fps, 10);
        assert_eq!((cam.resolution.width, cam.resolution.height), (640, 480));
        assert_eq!(cam.login(), None);
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cameras.json");
        tokio::fs::write(&path, "[1, 2").await.unwrap();

        let err = CameraCatalog::load(&path).await.unwrap_err();

        assert!(matches!(err, CatalogError::Json { .. }));
        assert!(err.to_string().contains("cameras.json"));
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut catalog = CameraCatalog::new("unused.json");

        assert!(catalog.upsert("a", CameraConfig::new("rtsp://a/1")).is_none());
        let previous = catalog.upsert("a", CameraConfig::new("rtsp://a/2"));

        assert_eq!(previous.unwrap().address, "rtsp://a/1");
        assert_eq!(catalog.remove("a").unwrap().address, "rtsp://a/2");
        assert!(catalog.remove("a").is_none());
    }
}
