//! Per-goal time totals.
//!
//! Totals are recomputed from scratch on every call; nothing is cached or
//! maintained incrementally. Blocks without a goal are summed under
//! [`GoalKey::Unassigned`].

use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};

use crate::schedule::{GoalCatalog, GoalLevel, ScheduledBlock};

/// Bucket a block's minutes are summed into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GoalKey {
    Goal(String),
    Unassigned,
}

impl GoalKey {
    pub fn goal_id(&self) -> Option<&str> {
        match self {
            Self::Goal(id) => Some(id),
            Self::Unassigned => None,
        }
    }
}

impl From<Option<&str>> for GoalKey {
    fn from(goal_id: Option<&str>) -> Self {
        match goal_id {
            Some(id) => Self::Goal(id.to_string()),
            None => Self::Unassigned,
        }
    }
}

/// One row of a totals table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalTotal {
    /// `None` for the unassigned bucket
    pub goal_id: Option<String>,
    pub minutes: i64,
}

/// Summed minutes keyed by goal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalTotals {
    minutes: BTreeMap<GoalKey, i64>,
}

impl GoalTotals {
    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn get(&self, key: &GoalKey) -> Option<i64> {
        self.minutes.get(key).copied()
    }

    /// Minutes for a goal id, zero if absent.
    pub fn minutes_for(&self, goal_id: &str) -> i64 {
        self.get(&GoalKey::Goal(goal_id.to_string())).unwrap_or(0)
    }

    /// Minutes in the unassigned bucket, zero if absent.
    pub fn unassigned(&self) -> i64 {
        self.get(&GoalKey::Unassigned).unwrap_or(0)
    }

    /// Sum across all buckets.
    pub fn total(&self) -> i64 {
        self.minutes.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GoalKey, i64)> {
        self.minutes.iter().map(|(k, v)| (k, *v))
    }

    /// Rows ordered by goal id, unassigned last.
    pub fn rows(&self) -> Vec<GoalTotal> {
        self.iter()
            .map(|(key, minutes)| GoalTotal {
                goal_id: key.goal_id().map(str::to_string),
                minutes,
            })
            .collect()
    }

    fn add(&mut self, key: GoalKey, minutes: i64) {
        *self.minutes.entry(key).or_insert(0) += minutes;
    }
}

impl Serialize for GoalTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows().serialize(serializer)
    }
}

/// Progress of one goal against its weekly target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: String,
    pub label: String,
    pub level: GoalLevel,
    pub scheduled_minutes: i64,
    pub target_minutes: i64,
    /// Minutes still needed to reach the target (never negative)
    pub remaining_minutes: i64,
    /// scheduled / target; `None` when the goal has no target
    pub ratio: Option<f64>,
}

/// Read-side aggregation over a block sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalAggregator;

impl GoalAggregator {
    /// Sum durations by goal id. Blocks with no goal go to the unassigned
    /// bucket. An empty input gives empty totals.
    pub fn totals_by_goal<'a>(blocks: impl IntoIterator<Item = &'a ScheduledBlock>) -> GoalTotals {
        let mut totals = GoalTotals::default();
        for block in blocks {
            totals.add(GoalKey::from(block.goal_id.as_deref()), block.duration_minutes);
        }
        totals
    }

    /// Like [`totals_by_goal`](Self::totals_by_goal), but goal ids missing
    /// from `catalog` count as unassigned.
    pub fn totals_resolved<'a>(
        blocks: impl IntoIterator<Item = &'a ScheduledBlock>,
        catalog: &GoalCatalog,
    ) -> GoalTotals {
        let mut totals = GoalTotals::default();
        for block in blocks {
            let goal_id = block.goal_id.as_deref().filter(|id| catalog.contains(id));
            totals.add(GoalKey::from(goal_id), block.duration_minutes);
        }
        totals
    }

    /// Add each goal's minutes to every ancestor reachable through
    /// `parent_id`. The walk stops at a missing parent or a cycle.
    pub fn rollup(totals: &GoalTotals, catalog: &GoalCatalog) -> GoalTotals {
        let mut rolled = totals.clone();
        for (key, minutes) in totals.iter() {
            let Some(goal_id) = key.goal_id() else {
                continue;
            };
            let mut seen = HashSet::from([goal_id]);
            let mut parent = catalog.get(goal_id).and_then(|g| g.parent_id.as_deref());
            while let Some(parent_id) = parent {
                let Some(goal) = catalog.get(parent_id) else {
                    break;
                };
                if !seen.insert(parent_id) {
                    break;
                }
                rolled.add(GoalKey::Goal(goal.id.clone()), minutes);
                parent = goal.parent_id.as_deref();
            }
        }
        rolled
    }

    /// Compare totals against each catalog goal's weekly target. Goals are
    /// listed by id, including those with nothing scheduled.
    pub fn progress(totals: &GoalTotals, catalog: &GoalCatalog) -> Vec<GoalProgress> {
        let mut report: Vec<_> = catalog
            .iter()
            .map(|goal| {
                let scheduled = totals.minutes_for(&goal.id);
                let target = goal.weekly_target_minutes;
                GoalProgress {
                    goal_id: goal.id.clone(),
                    label: goal.label.clone(),
                    level: goal.level,
                    scheduled_minutes: scheduled,
                    target_minutes: target,
                    remaining_minutes: (target - scheduled).max(0),
                    ratio: (target > 0).then(|| scheduled as f64 / target as f64),
                }
            })
            .collect();
        report.sort_by(|a, b| a.goal_id.cmp(&b.goal_id));
        report
    }
}
