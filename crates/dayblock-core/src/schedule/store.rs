//! In-memory block store.
//!
//! The store is the sole owner of every [`ScheduledBlock`] in a session. It
//! knows the [`TimeAxis`] so it can keep starts and durations on the grid,
//! but nothing about pointers or gestures.
//!
//! Overlapping blocks on the same date are a valid state and are never
//! rejected or rearranged. A block's end may run past the day window; only
//! its start is clamped.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::block::{BlockId, BlockPatch, BlockSpec, ScheduledBlock};
use crate::error::{CoreError, Result};
use crate::timeline::TimeAxis;

/// Canonical collection of scheduled blocks.
#[derive(Debug, Clone)]
pub struct BlockStore {
    axis: TimeAxis,
    blocks: BTreeMap<BlockId, ScheduledBlock>,
}

impl BlockStore {
    /// Create an empty store on the given axis.
    pub fn new(axis: TimeAxis) -> Self {
        Self {
            axis,
            blocks: BTreeMap::new(),
        }
    }

    /// Build a store from previously exported blocks.
    ///
    /// Starts are normalized onto the grid. The import is all-or-nothing.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDuration`] for a non-positive or off-grid
    /// duration and [`CoreError::DuplicateId`] if an id repeats.
    pub fn from_blocks(axis: TimeAxis, blocks: impl IntoIterator<Item = ScheduledBlock>) -> Result<Self> {
        let mut store = Self::new(axis);
        for block in blocks {
            store.insert(block)?;
        }
        tracing::info!(count = store.len(), "imported blocks");
        Ok(store)
    }

    pub fn axis(&self) -> &TimeAxis {
        &self.axis
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: BlockId) -> Option<&ScheduledBlock> {
        self.blocks.get(&id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a block from `spec` and return its new id.
    ///
    /// The start (default: start of the day window) is snapped and the
    /// duration rounded onto the grid.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDuration`] if the duration is not positive.
    pub fn add(&mut self, spec: BlockSpec) -> Result<BlockId> {
        if spec.duration_minutes <= 0 {
            return Err(self.invalid_duration(spec.duration_minutes));
        }

        let id = BlockId::new();
        let start = spec.start_minute.unwrap_or(self.axis.day_start_minute());
        let block = ScheduledBlock {
            id,
            date: spec.date,
            start_minute: self.axis.snap(start),
            duration_minutes: self.axis.snap_duration(spec.duration_minutes),
            goal_id: spec.goal_id,
            template_id: spec.template_id,
            note: spec.note,
        };
        tracing::debug!(
            %id,
            date = %block.date,
            start = block.start_minute,
            duration = block.duration_minutes,
            "block added"
        );
        self.blocks.insert(id, block);
        Ok(id)
    }

    /// Insert an existing block, keeping its id.
    ///
    /// Durations must already be valid: positive, on the grid and no longer
    /// than [`TimeAxis::max_duration_minutes`]. The start is snapped.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDuration`] or [`CoreError::DuplicateId`].
    pub fn insert(&mut self, mut block: ScheduledBlock) -> Result<()> {
        let duration = block.duration_minutes;
        if duration <= 0
            || duration > self.axis.max_duration_minutes()
            || !self.axis.is_aligned(duration)
        {
            tracing::warn!(id = %block.id, duration = block.duration_minutes, "rejected block");
            return Err(self.invalid_duration(block.duration_minutes));
        }
        if self.blocks.contains_key(&block.id) {
            tracing::warn!(id = %block.id, "rejected duplicate block id");
            return Err(CoreError::DuplicateId { id: block.id });
        }
        block.start_minute = self.axis.snap(block.start_minute);
        self.blocks.insert(block.id, block);
        Ok(())
    }

    /// Delete a block. Absent ids are ignored.
    pub fn remove(&mut self, id: BlockId) -> Option<ScheduledBlock> {
        let removed = self.blocks.remove(&id);
        if removed.is_some() {
            tracing::debug!(%id, "block removed");
        }
        removed
    }

    /// Move a block's start to `snap(minute)`. Duration is unchanged.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if `id` is absent.
    pub fn set_start(&mut self, id: BlockId, minute: i64) -> Result<()> {
        let start = self.axis.snap(minute);
        let block = self.block_mut(id)?;
        block.start_minute = start;
        tracing::debug!(%id, start, "block start set");
        Ok(())
    }

    /// Set a block's duration to `max(snap_unit, round(duration))`, capped at
    /// [`TimeAxis::max_duration_minutes`].
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if `id` is absent.
    pub fn set_duration(&mut self, id: BlockId, duration: i64) -> Result<()> {
        let duration = self.axis.snap_duration(duration);
        let block = self.block_mut(id)?;
        block.duration_minutes = duration;
        tracing::debug!(%id, duration, "block duration set");
        Ok(())
    }

    /// Set start and duration together. Both are normalized as in
    /// [`set_start`](Self::set_start) and [`set_duration`](Self::set_duration);
    /// either both change or neither does.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if `id` is absent.
    pub fn set_span(&mut self, id: BlockId, start: i64, duration: i64) -> Result<()> {
        let start = self.axis.snap(start);
        let duration = self.axis.snap_duration(duration);
        let block = self.block_mut(id)?;
        block.start_minute = start;
        block.duration_minutes = duration;
        tracing::debug!(%id, start, duration, "block span set");
        Ok(())
    }

    /// Merge non-temporal fields into a block.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if `id` is absent.
    pub fn patch(&mut self, id: BlockId, patch: BlockPatch) -> Result<()> {
        let block = self.block_mut(id)?;
        patch.apply(block);
        tracing::debug!(%id, "block patched");
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Blocks on `date`, ordered by start minute then id.
    pub fn query_by_date(&self, date: NaiveDate) -> Vec<&ScheduledBlock> {
        let mut blocks: Vec<_> = self.blocks.values().filter(|b| b.date == date).collect();
        blocks.sort_by_key(|b| (b.start_minute, b.id));
        blocks
    }

    /// Blocks dated within `from..=to`, ordered by date, start, then id.
    pub fn query_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&ScheduledBlock> {
        let mut blocks: Vec<_> = self
            .blocks
            .values()
            .filter(|b| b.date >= from && b.date <= to)
            .collect();
        blocks.sort_by_key(|b| (b.date, b.start_minute, b.id));
        blocks
    }

    /// Every block, ordered by date, start, then id.
    pub fn export(&self) -> Vec<ScheduledBlock> {
        let mut blocks: Vec<_> = self.blocks.values().cloned().collect();
        blocks.sort_by_key(|b| (b.date, b.start_minute, b.id));
        blocks
    }

    fn block_mut(&mut self, id: BlockId) -> Result<&mut ScheduledBlock> {
        self.blocks.get_mut(&id).ok_or(CoreError::NotFound { id })
    }

    fn invalid_duration(&self, minutes: i64) -> CoreError {
        CoreError::InvalidDuration {
            minutes,
            snap_unit: self.axis.snap_unit_minutes(),
        }
    }
}
