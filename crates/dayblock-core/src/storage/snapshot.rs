//! JSON snapshot of a session's blocks.
//!
//! The snapshot is the hand-off point to persistence: the session exports
//! one, the caller writes it wherever it likes, and a later session is
//! rebuilt from it. Validation happens on import, not here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::schedule::ScheduledBlock;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Serialized block collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Date the session was showing when exported
    #[serde(default)]
    pub active_date: Option<NaiveDate>,
    #[serde(default)]
    pub blocks: Vec<ScheduledBlock>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            active_date: None,
            blocks: Vec::new(),
        }
    }
}

impl Snapshot {
    /// `blocks.json` inside `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join("blocks.json")
    }

    /// Read a snapshot. A missing file yields an empty snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the snapshot as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), blocks = self.blocks.len(), "snapshot written");
        Ok(())
    }
}
