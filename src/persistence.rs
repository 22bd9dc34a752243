//! Snapshot persistence for [`ContainerRegistry`].
//!
//! On-disk layout: 4-byte little-endian format version, then
//! `bincode(SnapshotRecord)`. Writes go through a temporary file and a rename.

use crate::error::NavigationError;
use crate::registry::ContainerRegistry;
use chrono::{DateTime, SecondsFormat, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SNAPSHOT_VERSION: u32 = 1;

/// A registry together with the moment it was saved.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub saved_at: DateTime<Utc>,
    pub registry: ContainerRegistry,
}

#[derive(Serialize, Deserialize)]
struct SnapshotRecord {
    /// RFC 3339, UTC
    saved_at: String,
    registry: ContainerRegistry,
}

#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the user data directory: `$XDG_DATA_HOME/backstack/navigation.bin`.
    pub fn in_data_dir() -> Option<Self> {
        let dirs = ProjectDirs::from("", "", "backstack")?;
        Some(Self::new(dirs.data_dir().join("navigation.bin")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, registry: &ContainerRegistry) -> Result<DateTime<Utc>, NavigationError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let saved_at = Utc::now();
        let record = SnapshotRecord {
            saved_at: saved_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            registry: registry.clone(),
        };
        let payload = bincode::serialize(&record)?;
        let mut bytes = Vec::with_capacity(4 + payload.len());
        bytes.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&payload);

        let temp_path = self.path.with_extension("bin.tmp");
        fs::write(&temp_path, &bytes)?;
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!(path = ?self.path, containers = registry.container_ids().len(), "Saved navigation snapshot");
        Ok(saved_at)
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<Snapshot>, NavigationError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        if bytes.len() < 4 {
            return Err(NavigationError::Serialization(format!(
                "Snapshot file {:?} is too short",
                self.path
            )));
        }
        let version = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if version != SNAPSHOT_VERSION {
            return Err(NavigationError::Serialization(format!(
                "Unsupported snapshot version: {}",
                version
            )));
        }

        let record: SnapshotRecord = bincode::deserialize(&bytes[4..])?;
        let saved_at = DateTime::parse_from_rfc3339(&record.saved_at)
            .map_err(|e| NavigationError::Serialization(format!("Invalid snapshot timestamp: {}", e)))?
            .with_timezone(&Utc);

        debug!(path = ?self.path, %saved_at, "Loaded navigation snapshot");
        Ok(Some(Snapshot {
            saved_at,
            registry: record.registry,
        }))
    }

    /// Remove the saved snapshot. Missing files are fine.
    pub fn clear(&self) -> Result<(), NavigationError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
