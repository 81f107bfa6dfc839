//! TOML-based planner configuration.
//!
//! Holds the day window / grid resolution and the drag hit-region policy.
//! Stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::interaction::{DragPolicy, EDGE_HANDLE_PX, MIN_MOVEMENT_PX};
use crate::timeline::TimeAxis;

/// Day window configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConfig {
    #[serde(default = "default_day_start")]
    pub day_start_minute: i64,
    #[serde(default = "default_day_end")]
    pub day_end_minute: i64,
    #[serde(default = "default_snap_unit")]
    pub snap_unit_minutes: i64,
}

/// Drag interaction policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    #[serde(default = "default_edge_handle")]
    pub edge_handle_px: f64,
    #[serde(default = "default_min_movement")]
    pub min_movement_px: f64,
}

/// Planner configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub axis: AxisConfig,
    #[serde(default)]
    pub drag: DragConfig,
}

// Default functions
fn default_day_start() -> i64 {
    8 * 60
}
fn default_day_end() -> i64 {
    24 * 60
}
fn default_snap_unit() -> i64 {
    30
}
fn default_edge_handle() -> f64 {
    EDGE_HANDLE_PX
}
fn default_min_movement() -> f64 {
    MIN_MOVEMENT_PX
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            day_start_minute: default_day_start(),
            day_end_minute: default_day_end(),
            snap_unit_minutes: default_snap_unit(),
        }
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            edge_handle_px: default_edge_handle(),
            min_movement_px: default_min_movement(),
        }
    }
}

impl PlannerConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::invalid(key, "unknown config key");
        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(ConfigError::invalid(key, "config key is empty"));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    ConfigError::invalid(key, format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(ConfigError::invalid(
                                key,
                                format!("cannot parse '{value}' as number"),
                            ));
                        }
                    }
                    serde_json::Value::Object(_) => {
                        return Err(ConfigError::invalid(key, "cannot replace a whole section"));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// `config.toml` inside `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join("config.toml")
    }

    /// Load from `path`, writing and returning defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. The result must still
    /// describe a valid axis and drag policy; otherwise nothing changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the updated config is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: PlannerConfig = serde_json::from_value(json)
            .map_err(|e| ConfigError::invalid(key, e.to_string()))?;
        updated.time_axis()?;
        updated.drag_policy()?;
        *self = updated;
        Ok(())
    }

    /// Build the validated time axis.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the window does not split into whole slots.
    pub fn time_axis(&self) -> Result<TimeAxis, ConfigError> {
        TimeAxis::new(
            self.axis.day_start_minute,
            self.axis.day_end_minute,
            self.axis.snap_unit_minutes,
        )
    }

    /// Build the validated drag policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a threshold is negative or not finite.
    pub fn drag_policy(&self) -> Result<DragPolicy, ConfigError> {
        for (key, value) in [
            ("drag.edge_handle_px", self.drag.edge_handle_px),
            ("drag.min_movement_px", self.drag.min_movement_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(key, format!("must be a non-negative number, got {value}")));
            }
        }
        Ok(DragPolicy {
            edge_handle_px: self.drag.edge_handle_px,
            min_movement_px: self.drag.min_movement_px,
        })
    }
}
