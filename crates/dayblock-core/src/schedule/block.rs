//! Scheduled block types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique, immutable identifier of a scheduled block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BlockId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BlockId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A single time allocation on one calendar date.
///
/// `start_minute` and `duration_minutes` are grid-aligned after every
/// store-driven mutation. The end may run past the day window; only the start
/// is clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledBlock {
    pub id: BlockId,
    pub date: NaiveDate,
    pub start_minute: i64,
    pub duration_minutes: i64,
    #[serde(default)]
    pub goal_id: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl ScheduledBlock {
    /// Exclusive end minute.
    pub fn end_minute(&self) -> i64 {
        self.start_minute.saturating_add(self.duration_minutes)
    }

    /// Check if this block overlaps with another on the same date
    pub fn overlaps(&self, other: &Self) -> bool {
        self.date == other.date
            && self.start_minute < other.end_minute()
            && self.end_minute() > other.start_minute
    }
}

/// Input for creating a block.
///
/// `start_minute` falls back to the start of the day window when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub date: NaiveDate,
    #[serde(default)]
    pub start_minute: Option<i64>,
    pub duration_minutes: i64,
    #[serde(default)]
    pub goal_id: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl BlockSpec {
    pub fn new(date: NaiveDate, duration_minutes: i64) -> Self {
        Self {
            date,
            start_minute: None,
            duration_minutes,
            goal_id: None,
            template_id: None,
            note: None,
        }
    }

    pub fn with_start(mut self, minute: i64) -> Self {
        self.start_minute = Some(minute);
        self
    }

    pub fn with_goal(mut self, goal_id: impl Into<String>) -> Self {
        self.goal_id = Some(goal_id.into());
        self
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Merge-update for the non-temporal fields of a block.
///
/// The outer `Option` selects whether a field is touched; the inner one is
/// the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPatch {
    #[serde(default)]
    pub goal_id: Option<Option<String>>,
    #[serde(default)]
    pub template_id: Option<Option<String>>,
    #[serde(default)]
    pub note: Option<Option<String>>,
}

impl BlockPatch {
    pub fn goal(goal_id: Option<String>) -> Self {
        Self {
            goal_id: Some(goal_id),
            ..Self::default()
        }
    }

    pub fn note(note: Option<String>) -> Self {
        Self {
            note: Some(note),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.goal_id.is_none() && self.template_id.is_none() && self.note.is_none()
    }

    pub(crate) fn apply(self, block: &mut ScheduledBlock) {
        if let Some(goal_id) = self.goal_id {
            block.goal_id = goal_id;
        }
        if let Some(template_id) = self.template_id {
            block.template_id = template_id;
        }
        if let Some(note) = self.note {
            block.note = note;
        }
    }
}
