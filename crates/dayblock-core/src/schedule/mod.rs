//! Schedule data model and the block store.
//!
//! - [`ScheduledBlock`]: the one mutable entity, owned by [`BlockStore`]
//! - [`Goal`] / [`BlockTemplate`]: read-only reference data, looked up by id

mod block;
mod goal;
mod store;

pub use block::{BlockId, BlockPatch, BlockSpec, ScheduledBlock};
pub use goal::{BlockTemplate, Goal, GoalCatalog, GoalLevel};
pub use store::BlockStore;
