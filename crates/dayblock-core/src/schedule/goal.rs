//! Goals and block templates.
//!
//! Both are reference data owned by the surrounding application. The core
//! only ever looks them up by id; blocks never hold them directly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Grouping level of a goal in the planning hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GoalLevel {
    Year,
    Quarter,
    Month,
}

impl GoalLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Quarter => "QUARTER",
            Self::Month => "MONTH",
        }
    }
}

/// A category used to group and budget time across blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub label: String,
    /// Weekly budget in minutes
    #[serde(default)]
    pub weekly_target_minutes: i64,
    pub level: GoalLevel,
    /// Parent goal id, if any. Never dereferenced as ownership.
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Goal {
    pub fn new(id: impl Into<String>, label: impl Into<String>, level: GoalLevel) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            weekly_target_minutes: 0,
            level,
            parent_id: None,
        }
    }

    pub fn with_weekly_target(mut self, minutes: i64) -> Self {
        self.weekly_target_minutes = minutes.max(0);
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

/// A reusable block preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTemplate {
    pub id: String,
    pub label: String,
    pub default_duration_minutes: i64,
    #[serde(default)]
    pub default_goal_id: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl BlockTemplate {
    pub fn new(id: impl Into<String>, label: impl Into<String>, default_duration_minutes: i64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            default_duration_minutes,
            default_goal_id: None,
            color: None,
        }
    }

    pub fn with_goal(mut self, goal_id: impl Into<String>) -> Self {
        self.default_goal_id = Some(goal_id.into());
        self
    }
}

/// Read-only goal lookup keyed by id.
#[derive(Debug, Clone, Default)]
pub struct GoalCatalog {
    goals: HashMap<String, Goal>,
}

impl GoalCatalog {
    pub fn new(goals: impl IntoIterator<Item = Goal>) -> Self {
        Self {
            goals: goals.into_iter().map(|g| (g.id.clone(), g)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.goals.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.goals.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Goal> {
        self.goals.values()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_level_serializes_uppercase() {
        let goal = Goal::new("g1", "Fitness", GoalLevel::Quarter).with_parent("y1");
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["level"], "QUARTER");
        assert_eq!(json["parent_id"], "y1");
        assert_eq!(GoalLevel::Month.as_str(), "MONTH");
    }

    #[test]
    fn weekly_target_never_negative() {
        let goal = Goal::new("g1", "Reading", GoalLevel::Month).with_weekly_target(-30);
        assert_eq!(goal.weekly_target_minutes, 0);
    }

    #[test]
    fn catalog_lookup() {
        let catalog = GoalCatalog::new(vec![
            Goal::new("g1", "One", GoalLevel::Year),
            Goal::new("g2", "Two", GoalLevel::Month),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("g2").map(|g| g.label.as_str()), Some("Two"));
        assert!(!catalog.contains("missing"));
    }
}
