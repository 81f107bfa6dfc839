//! Statistics over scheduled blocks.
//!
//! Currently per-goal totals, hierarchy roll-up and weekly target progress.

mod goal_totals;

pub use goal_totals::{GoalAggregator, GoalKey, GoalProgress, GoalTotal, GoalTotals};
