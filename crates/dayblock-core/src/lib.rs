//! # Dayblock Core Library
//!
//! Core logic for a personal time-block planner: named, goal-tagged blocks
//! placed on a single day's timeline over a fixed grid, with per-goal totals.
//! The UI and persistence backend sit outside this crate; everything here is
//! synchronous and single-threaded.
//!
//! ## Architecture
//!
//! - **Timeline**: the day window, grid snapping and coordinate conversion
//! - **Schedule**: block/goal/template types and the in-memory block store
//! - **Interaction**: drag gesture state machine (move, resize start, resize end)
//! - **Stats**: per-goal totals, hierarchy roll-up, weekly target progress
//! - **Storage**: TOML configuration and JSON snapshots
//!
//! ## Key Components
//!
//! - [`TimeAxis`]: grid coordinate system
//! - [`BlockStore`]: sole owner of scheduled blocks
//! - [`DragController`]: gesture to mutation translation
//! - [`GoalAggregator`]: read-side totals
//! - [`PlannerSession`]: orchestrator for one active date

pub mod error;
pub mod interaction;
pub mod schedule;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timeline;

pub use error::{ConfigError, CoreError, Result};
pub use interaction::{BlockMutator, DragController, DragPolicy, GestureOutcome, GesturePhase};
pub use schedule::{
    BlockId, BlockPatch, BlockSpec, BlockStore, BlockTemplate, Goal, GoalCatalog, GoalLevel,
    ScheduledBlock,
};
pub use session::PlannerSession;
pub use stats::{GoalAggregator, GoalKey, GoalProgress, GoalTotal, GoalTotals};
pub use storage::{data_dir, PlannerConfig, Snapshot};
pub use timeline::{format_label, format_range, parse_clock, FreeSlot, TimeAxis};
