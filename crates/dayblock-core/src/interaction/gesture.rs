//! Gesture phases and hit-region policy.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Dragging      -> Idle
//! Idle -> ResizingStart -> Idle
//! Idle -> ResizingEnd   -> Idle
//! ```
//!
//! Every release and every cancel returns to `Idle`.

use serde::{Deserialize, Serialize};

use crate::schedule::BlockId;

/// Height (in rendered units) of the grab region at each block edge.
pub const EDGE_HANDLE_PX: f64 = 6.0;

/// Pointer travel below which a press/release pair counts as a click.
pub const MIN_MOVEMENT_PX: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Idle,
    Dragging,
    ResizingStart,
    ResizingEnd,
}

impl GesturePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
            Self::ResizingStart => "resizing_start",
            Self::ResizingEnd => "resizing_end",
        }
    }
}

/// Hit-region and click-threshold policy, fixed for a controller's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragPolicy {
    pub edge_handle_px: f64,
    pub min_movement_px: f64,
}

impl Default for DragPolicy {
    fn default() -> Self {
        Self {
            edge_handle_px: EDGE_HANDLE_PX,
            min_movement_px: MIN_MOVEMENT_PX,
        }
    }
}

impl DragPolicy {
    /// Decide which phase a press at `pointer` enters for a block rendered
    /// between `top` and `bottom`. `None` means the press missed the block.
    ///
    /// The start handle wins when the block is too short for both handles.
    pub fn classify(&self, top: f64, bottom: f64, pointer: f64) -> Option<GesturePhase> {
        if pointer < top || pointer > bottom {
            return None;
        }
        if pointer - top <= self.edge_handle_px {
            Some(GesturePhase::ResizingStart)
        } else if bottom - pointer <= self.edge_handle_px {
            Some(GesturePhase::ResizingEnd)
        } else {
            Some(GesturePhase::Dragging)
        }
    }
}

/// An in-progress gesture.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Gesture {
    pub block_id: BlockId,
    pub phase: GesturePhase,
    pub axis_extent: f64,
    /// Pointer position at press
    pub origin: f64,
    /// Distance from the block's top edge to the press point
    pub grab_offset: f64,
    /// Largest distance from `origin` seen so far
    pub max_travel: f64,
}

impl Gesture {
    pub fn track(&mut self, pointer: f64) {
        if pointer.is_finite() {
            self.max_travel = self.max_travel.max((pointer - self.origin).abs());
        }
    }
}
