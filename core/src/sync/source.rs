//! Snapshot loading
//!
//! Reads a mock payment-source snapshot from disk. This is one of the three
//! legitimate suspension points named in spec §5 ("Source-snapshot file read
//! in the Sync Engine (disk I/O)"), so the trait is async even though the
//! default implementation is a plain file read.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::snapshot::{snapshot_filename, SourceSnapshot};

/// Errors loading a snapshot. Both variants map to spec §4.1's recoverable
/// `SnapshotNotFound` / `SnapshotInvalid` conditions.
#[derive(Debug, Error)]
pub enum SnapshotLoadError {
    #[error("snapshot file not found: {0}")]
    NotFound(PathBuf),
    #[error("snapshot file at {path} is not valid JSON: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not read snapshot file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Abstraction over "load the snapshot for this connection's display name."
/// A trait (rather than a bare function) so tests can substitute an
/// in-memory fixture instead of touching the filesystem, the same way a
/// pluggable policy trait lets callers swap real and fake implementations.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn load(&self, display_name: &str) -> Result<SourceSnapshot, SnapshotLoadError>;
}

/// Reads snapshots from a directory of JSON files, keyed by the display-name
/// mapping in spec §6.
pub struct FileSnapshotSource {
    root: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, display_name: &str) -> PathBuf {
        self.root.join(snapshot_filename(display_name))
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn load(&self, display_name: &str) -> Result<SourceSnapshot, SnapshotLoadError> {
        let path = self.path_for(display_name);
        if !path.exists() {
            return Err(SnapshotLoadError::NotFound(path));
        }
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SnapshotLoadError::Io {
                path: path.clone(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| SnapshotLoadError::Invalid { path, source })
    }
}

/// Test/in-memory snapshot source, keyed by the same display-name → filename
/// mapping so behavior matches [`FileSnapshotSource`] without disk I/O.
#[derive(Default)]
pub struct InMemorySnapshotSource {
    snapshots: std::collections::HashMap<String, SourceSnapshot>,
}

impl InMemorySnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, display_name: &str, snapshot: SourceSnapshot) -> Self {
        self.snapshots
            .insert(snapshot_filename(display_name), snapshot);
        self
    }
}

#[async_trait]
impl SnapshotSource for InMemorySnapshotSource {
    async fn load(&self, display_name: &str) -> Result<SourceSnapshot, SnapshotLoadError> {
        self.snapshots
            .get(&snapshot_filename(display_name))
            .cloned()
            .ok_or_else(|| SnapshotLoadError::NotFound(Path::new(&snapshot_filename(display_name)).to_path_buf()))
    }
}
