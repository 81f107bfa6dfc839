//! Drag interaction controller.
//!
//! Turns one press/move/release sequence into at most one grid-snapped
//! mutation. Positions are recomputed from the absolute pointer at release,
//! never accumulated from deltas.
//!
//! ## Usage
//!
//! ```ignore
//! let mut drag = DragController::new(axis, DragPolicy::default());
//! drag.begin(&store, id, pointer_y, rendered_height)?;
//! drag.update(pointer_y);
//! let outcome = drag.end(&mut store, pointer_y)?;
//! ```

use serde::{Deserialize, Serialize};

use super::gesture::{DragPolicy, Gesture, GesturePhase};
use crate::error::{CoreError, Result};
use crate::schedule::{BlockId, BlockStore, ScheduledBlock};
use crate::timeline::TimeAxis;

/// Mutation surface the controller drives.
///
/// [`BlockStore`] is the production implementation; the seam exists so a
/// gesture's effect on the store can be observed call by call.
pub trait BlockMutator {
    fn block(&self, id: BlockId) -> Option<&ScheduledBlock>;
    fn set_start(&mut self, id: BlockId, minute: i64) -> Result<()>;
    fn set_duration(&mut self, id: BlockId, duration: i64) -> Result<()>;
    /// Apply start and duration as one unit.
    fn set_span(&mut self, id: BlockId, start: i64, duration: i64) -> Result<()>;
}

impl BlockMutator for BlockStore {
    fn block(&self, id: BlockId) -> Option<&ScheduledBlock> {
        self.get(id)
    }

    fn set_start(&mut self, id: BlockId, minute: i64) -> Result<()> {
        BlockStore::set_start(self, id, minute)
    }

    fn set_duration(&mut self, id: BlockId, duration: i64) -> Result<()> {
        BlockStore::set_duration(self, id, duration)
    }

    fn set_span(&mut self, id: BlockId, start: i64, duration: i64) -> Result<()> {
        BlockStore::set_span(self, id, start, duration)
    }
}

/// What a finished gesture did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureOutcome {
    Moved {
        id: BlockId,
        start_minute: i64,
    },
    ResizedStart {
        id: BlockId,
        start_minute: i64,
        duration_minutes: i64,
    },
    ResizedEnd {
        id: BlockId,
        duration_minutes: i64,
    },
    /// Released below the movement threshold; nothing changed.
    Click { id: BlockId },
    /// Release with no gesture in progress.
    Ignored,
}

/// Per-session drag state machine.
#[derive(Debug, Clone)]
pub struct DragController {
    axis: TimeAxis,
    policy: DragPolicy,
    gesture: Option<Gesture>,
}

impl DragController {
    pub fn new(axis: TimeAxis, policy: DragPolicy) -> Self {
        Self {
            axis,
            policy,
            gesture: None,
        }
    }

    pub fn policy(&self) -> &DragPolicy {
        &self.policy
    }

    pub fn phase(&self) -> GesturePhase {
        self.gesture
            .as_ref()
            .map(|g| g.phase)
            .unwrap_or(GesturePhase::Idle)
    }

    /// Block targeted by the in-progress gesture.
    pub fn active_block(&self) -> Option<BlockId> {
        self.gesture.as_ref().map(|g| g.block_id)
    }

    // ── Gesture events ───────────────────────────────────────────────

    /// Pointer pressed on block `id` at `pointer` within a rendered axis of
    /// `axis_extent`. Returns the phase entered; `Idle` if the press missed
    /// the block or the extent is unusable.
    ///
    /// Any gesture still in progress is dropped first.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if the block does not exist.
    pub fn begin<M: BlockMutator>(
        &mut self,
        store: &M,
        id: BlockId,
        pointer: f64,
        axis_extent: f64,
    ) -> Result<GesturePhase> {
        if let Some(stale) = self.gesture.take() {
            tracing::warn!(id = %stale.block_id, phase = stale.phase.as_str(), "abandoned gesture");
        }

        let block = store.block(id).ok_or(CoreError::NotFound { id })?;
        if axis_extent.is_nan() || axis_extent <= 0.0 || !pointer.is_finite() {
            return Ok(GesturePhase::Idle);
        }

        let top = self.axis.minute_to_fraction(block.start_minute) * axis_extent;
        let bottom = self.axis.minute_to_fraction(block.end_minute()) * axis_extent;
        let Some(phase) = self.policy.classify(top, bottom, pointer) else {
            return Ok(GesturePhase::Idle);
        };

        self.gesture = Some(Gesture {
            block_id: id,
            phase,
            axis_extent,
            origin: pointer,
            grab_offset: pointer - top,
            max_travel: 0.0,
        });
        tracing::debug!(%id, phase = phase.as_str(), "gesture started");
        Ok(phase)
    }

    /// Pointer moved. Only tracks travel; nothing is applied until release.
    pub fn update(&mut self, pointer: f64) -> GesturePhase {
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.track(pointer);
        }
        self.phase()
    }

    /// Pointer released. The controller is back to `Idle` when this returns,
    /// whether or not the mutation succeeded.
    ///
    /// # Errors
    /// Propagates [`CoreError::NotFound`] if the block vanished mid-gesture.
    pub fn end<M: BlockMutator>(&mut self, store: &mut M, pointer: f64) -> Result<GestureOutcome> {
        let Some(mut gesture) = self.gesture.take() else {
            return Ok(GestureOutcome::Ignored);
        };
        gesture.track(pointer);

        let id = gesture.block_id;
        if gesture.max_travel < self.policy.min_movement_px || !pointer.is_finite() {
            tracing::debug!(%id, travel = gesture.max_travel, "gesture below threshold");
            return Ok(GestureOutcome::Click { id });
        }

        let extent = gesture.axis_extent;
        match gesture.phase {
            GesturePhase::Dragging => {
                self.complete_move(store, id, (pointer - gesture.grab_offset) / extent)
            }
            GesturePhase::ResizingStart => self.complete_resize_start(store, id, pointer / extent),
            GesturePhase::ResizingEnd => self.complete_resize_end(store, id, pointer / extent),
            GesturePhase::Idle => Ok(GestureOutcome::Ignored),
        }
    }

    /// Abort the gesture without touching the store. Returns whether a
    /// gesture was in progress.
    pub fn cancel(&mut self) -> bool {
        match self.gesture.take() {
            Some(gesture) => {
                tracing::debug!(id = %gesture.block_id, phase = gesture.phase.as_str(), "gesture cancelled");
                true
            }
            None => false,
        }
    }

    // ── Completed-gesture handlers ───────────────────────────────────

    /// Move the block so its start lands on the grid line nearest `fraction`.
    pub fn complete_move<M: BlockMutator>(
        &self,
        store: &mut M,
        id: BlockId,
        fraction: f64,
    ) -> Result<GestureOutcome> {
        let minute = self.axis.fraction_to_minute(fraction, 1.0);
        self.move_to_minute(store, id, minute)
    }

    /// Drag the start edge to `fraction`, holding the end fixed.
    pub fn complete_resize_start<M: BlockMutator>(
        &self,
        store: &mut M,
        id: BlockId,
        fraction: f64,
    ) -> Result<GestureOutcome> {
        let minute = self.axis.fraction_to_minute(fraction, 1.0);
        self.resize_start_to_minute(store, id, minute)
    }

    /// Drag the end edge to `fraction`, holding the start fixed.
    pub fn complete_resize_end<M: BlockMutator>(
        &self,
        store: &mut M,
        id: BlockId,
        fraction: f64,
    ) -> Result<GestureOutcome> {
        let minute = self.axis.fraction_to_end_minute(fraction, 1.0);
        self.resize_end_to_minute(store, id, minute)
    }

    // ── Minute-based edits ───────────────────────────────────────────

    /// Move the block's start to `snap(minute)`.
    pub fn move_to_minute<M: BlockMutator>(
        &self,
        store: &mut M,
        id: BlockId,
        minute: i64,
    ) -> Result<GestureOutcome> {
        store.set_start(id, self.axis.snap(minute))?;
        let block = store.block(id).ok_or(CoreError::NotFound { id })?;
        Ok(GestureOutcome::Moved {
            id,
            start_minute: block.start_minute,
        })
    }

    /// Move the start edge to `snap(minute)`, holding the end fixed.
    ///
    /// The start never passes within one slot of the end.
    pub fn resize_start_to_minute<M: BlockMutator>(
        &self,
        store: &mut M,
        id: BlockId,
        minute: i64,
    ) -> Result<GestureOutcome> {
        let block = store.block(id).ok_or(CoreError::NotFound { id })?;
        let end = block.end_minute();
        let start = self
            .axis
            .snap(minute)
            .min(end - self.axis.snap_unit_minutes());
        store.set_span(id, start, end - start)?;
        let block = store.block(id).ok_or(CoreError::NotFound { id })?;
        Ok(GestureOutcome::ResizedStart {
            id,
            start_minute: block.start_minute,
            duration_minutes: block.duration_minutes,
        })
    }

    /// Move the end edge to `snap_end(minute)`, holding the start fixed.
    pub fn resize_end_to_minute<M: BlockMutator>(
        &self,
        store: &mut M,
        id: BlockId,
        minute: i64,
    ) -> Result<GestureOutcome> {
        let block = store.block(id).ok_or(CoreError::NotFound { id })?;
        let end = self.axis.snap_end(minute);
        let duration = (end - block.start_minute).max(self.axis.snap_unit_minutes());
        store.set_duration(id, duration)?;
        let block = store.block(id).ok_or(CoreError::NotFound { id })?;
        Ok(GestureOutcome::ResizedEnd {
            id,
            duration_minutes: block.duration_minutes,
        })
    }
}
