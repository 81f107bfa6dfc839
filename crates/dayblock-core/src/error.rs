//! Core error types for dayblock-core.
//!
//! Recoverable errors (`NotFound`, `InvalidDuration`, `DuplicateId`) leave the
//! block store untouched. Configuration errors are raised at construction time
//! and are not expected to be handled at runtime.

use std::path::PathBuf;
use thiserror::Error;

use crate::schedule::BlockId;

/// Core error type for dayblock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A mutation referenced a block id that is not in the store
    #[error("Block not found: {id}")]
    NotFound { id: BlockId },

    /// A duration supplied directly (not through the snapping path) was
    /// non-positive or not a multiple of the snap unit
    #[error("Invalid duration: {minutes} minutes (must be a positive multiple of {snap_unit})")]
    InvalidDuration { minutes: i64, snap_unit: i64 },

    /// Two blocks in an imported snapshot share the same id
    #[error("Duplicate block id in snapshot: {id}")]
    DuplicateId { id: BlockId },

    /// A template id was not present in the session's template catalog
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The day window does not divide into a whole number of slots
    #[error("Day window {start}..{end} is not a whole number of {snap_unit}-minute slots")]
    UnevenSlots { start: i64, end: i64, snap_unit: i64 },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
