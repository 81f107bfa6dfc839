mod config;
mod snapshot;

pub use config::{AxisConfig, DragConfig, PlannerConfig};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};

use std::path::PathBuf;

/// Returns `~/.config/dayblock/`, creating it if needed.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("dayblock");

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
