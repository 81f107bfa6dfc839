//! Pointer gesture interpretation.
//!
//! A gesture is one press/move/release sequence on a block. It resolves to a
//! move, a start-edge resize, an end-edge resize, or nothing at all.

mod controller;
mod gesture;

pub use controller::{BlockMutator, DragController, GestureOutcome};
pub use gesture::{DragPolicy, GesturePhase, EDGE_HANDLE_PX, MIN_MOVEMENT_PX};
