//! Planner session: one explicitly scoped owner of a day's planning state.
//!
//! The session owns the block store and the drag controller, holds the
//! caller-supplied goal and template catalogs, and tracks which date is
//! visible. There is no global state; construct a session from a snapshot
//! and export a snapshot when done.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;

use crate::error::{CoreError, Result};
use crate::interaction::{DragController, DragPolicy, GestureOutcome, GesturePhase};
use crate::schedule::{
    BlockId, BlockPatch, BlockSpec, BlockStore, BlockTemplate, Goal, GoalCatalog, ScheduledBlock,
};
use crate::stats::{GoalAggregator, GoalProgress, GoalTotals};
use crate::storage::{PlannerConfig, Snapshot, SNAPSHOT_VERSION};
use crate::timeline::{free_slots, FreeSlot, TimeAxis};

/// Orchestrates the store, drag controller and aggregation for one active date.
#[derive(Debug, Clone)]
pub struct PlannerSession {
    store: BlockStore,
    drag: DragController,
    active_date: NaiveDate,
    goals: GoalCatalog,
    templates: HashMap<String, BlockTemplate>,
}

impl PlannerSession {
    /// Empty session on `active_date` with the given axis and drag policy.
    pub fn new(axis: TimeAxis, policy: DragPolicy, active_date: NaiveDate) -> Self {
        Self {
            store: BlockStore::new(axis),
            drag: DragController::new(axis, policy),
            active_date,
            goals: GoalCatalog::default(),
            templates: HashMap::new(),
        }
    }

    /// Empty session configured from `config`.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if the configured axis or drag policy is invalid.
    pub fn from_config(config: &PlannerConfig, active_date: NaiveDate) -> Result<Self> {
        Ok(Self::new(config.time_axis()?, config.drag_policy()?, active_date))
    }

    /// Rebuild a session from a snapshot. The snapshot's active date wins
    /// over `fallback_date` when present.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] for an invalid config, and
    /// [`CoreError::InvalidDuration`] / [`CoreError::DuplicateId`] if a block
    /// in the snapshot is malformed. Nothing is loaded in that case.
    pub fn load(config: &PlannerConfig, snapshot: Snapshot, fallback_date: NaiveDate) -> Result<Self> {
        let mut session = Self::from_config(config, snapshot.active_date.unwrap_or(fallback_date))?;
        if snapshot.version != SNAPSHOT_VERSION {
            tracing::warn!(version = snapshot.version, "loading snapshot from a different format version");
        }
        session.store = BlockStore::from_blocks(*session.store.axis(), snapshot.blocks)?;
        tracing::info!(date = %session.active_date, blocks = session.store.len(), "session loaded");
        Ok(session)
    }

    /// Snapshot of every block in the session, for the persistence layer.
    pub fn export(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            active_date: Some(self.active_date),
            blocks: self.store.export(),
        }
    }

    pub fn with_goals(mut self, goals: impl IntoIterator<Item = Goal>) -> Self {
        self.goals = GoalCatalog::new(goals);
        self
    }

    pub fn with_templates(mut self, templates: impl IntoIterator<Item = BlockTemplate>) -> Self {
        self.templates = templates.into_iter().map(|t| (t.id.clone(), t)).collect();
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn axis(&self) -> &TimeAxis {
        self.store.axis()
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn goals(&self) -> &GoalCatalog {
        &self.goals
    }

    pub fn active_date(&self) -> NaiveDate {
        self.active_date
    }

    pub fn block(&self, id: BlockId) -> Option<&ScheduledBlock> {
        self.store.get(id)
    }

    /// Blocks on the active date, ordered by start then id.
    pub fn blocks(&self) -> Vec<&ScheduledBlock> {
        self.store.query_by_date(self.active_date)
    }

    /// Per-goal totals for the active date. Goal ids missing from the
    /// catalog count as unassigned.
    pub fn current_totals(&self) -> GoalTotals {
        GoalAggregator::totals_resolved(self.blocks(), &self.goals)
    }

    /// Progress against weekly targets for the Monday-to-Sunday week
    /// containing the active date. Minutes on child goals count toward
    /// their ancestors.
    pub fn weekly_progress(&self) -> Vec<GoalProgress> {
        let offset = i64::from(self.active_date.weekday().num_days_from_monday());
        let monday = self.active_date - Duration::days(offset);
        let sunday = monday + Duration::days(6);
        let totals = GoalAggregator::totals_resolved(self.store.query_range(monday, sunday), &self.goals);
        GoalAggregator::progress(&GoalAggregator::rollup(&totals, &self.goals), &self.goals)
    }

    /// Uncovered stretches of the active date's window.
    pub fn free_slots(&self) -> Vec<FreeSlot> {
        free_slots(self.store.axis(), self.blocks())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch the visible date. Blocks are not touched; any gesture in
    /// progress is dropped.
    pub fn set_active_date(&mut self, date: NaiveDate) {
        if date != self.active_date {
            self.drag.cancel();
            tracing::info!(from = %self.active_date, to = %date, "active date changed");
            self.active_date = date;
        }
    }

    /// Add an ad hoc block. The spec's date is used as given.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDuration`] for a non-positive duration.
    pub fn add_block(&mut self, spec: BlockSpec) -> Result<BlockId> {
        self.store.add(spec)
    }

    /// Instantiate `template` on the active date at the start of the window.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDuration`] if the template's default
    /// duration is not positive.
    pub fn add_from_template(&mut self, template: &BlockTemplate) -> Result<BlockId> {
        let mut spec = BlockSpec::new(self.active_date, template.default_duration_minutes)
            .with_start(self.axis().day_start_minute())
            .with_template(template.id.clone());
        spec.goal_id = template.default_goal_id.clone();
        self.store.add(spec)
    }

    /// Like [`add_from_template`](Self::add_from_template), looking the
    /// template up in the session's catalog.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownTemplate`] if the id is not in the catalog.
    pub fn add_from_template_id(&mut self, template_id: &str) -> Result<BlockId> {
        let template = self
            .templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| CoreError::UnknownTemplate(template_id.to_string()))?;
        self.add_from_template(&template)
    }

    /// Delete a block; absent ids are ignored.
    pub fn remove_block(&mut self, id: BlockId) -> Option<ScheduledBlock> {
        if self.drag.active_block() == Some(id) {
            self.drag.cancel();
        }
        self.store.remove(id)
    }

    /// Merge goal/template/note changes into a block.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if the block does not exist.
    pub fn patch_block(&mut self, id: BlockId, patch: BlockPatch) -> Result<()> {
        self.store.patch(id, patch)
    }

    /// Move a block so its start edge lands at `fraction` of the axis.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if the block does not exist.
    pub fn move_block(&mut self, id: BlockId, fraction: f64) -> Result<GestureOutcome> {
        self.drag.complete_move(&mut self.store, id, fraction)
    }

    /// Move a block's start edge to `fraction`, keeping its end.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if the block does not exist.
    pub fn resize_block_start(&mut self, id: BlockId, fraction: f64) -> Result<GestureOutcome> {
        self.drag.complete_resize_start(&mut self.store, id, fraction)
    }

    /// Move a block's end edge to `fraction`, keeping its start.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if the block does not exist.
    pub fn resize_block_end(&mut self, id: BlockId, fraction: f64) -> Result<GestureOutcome> {
        self.drag.complete_resize_end(&mut self.store, id, fraction)
    }

    /// Move a block's start to `minute`, snapped onto the grid.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if the block does not exist.
    pub fn move_block_to(&mut self, id: BlockId, minute: i64) -> Result<GestureOutcome> {
        self.drag.move_to_minute(&mut self.store, id, minute)
    }

    /// Move a block's start edge to `minute`, keeping its end.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if the block does not exist.
    pub fn resize_block_start_to(&mut self, id: BlockId, minute: i64) -> Result<GestureOutcome> {
        self.drag.resize_start_to_minute(&mut self.store, id, minute)
    }

    /// Move a block's end edge to `minute`, keeping its start.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if the block does not exist.
    pub fn resize_block_end_to(&mut self, id: BlockId, minute: i64) -> Result<GestureOutcome> {
        self.drag.resize_end_to_minute(&mut self.store, id, minute)
    }

    // ── Pointer gestures ─────────────────────────────────────────────

    pub fn gesture_phase(&self) -> GesturePhase {
        self.drag.phase()
    }

    /// # Errors
    /// Returns [`CoreError::NotFound`] if the block does not exist.
    pub fn begin_gesture(&mut self, id: BlockId, pointer: f64, axis_extent: f64) -> Result<GesturePhase> {
        self.drag.begin(&self.store, id, pointer, axis_extent)
    }

    pub fn update_gesture(&mut self, pointer: f64) -> GesturePhase {
        self.drag.update(pointer)
    }

    /// # Errors
    /// Returns [`CoreError::NotFound`] if the block vanished mid-gesture.
    pub fn end_gesture(&mut self, pointer: f64) -> Result<GestureOutcome> {
        self.drag.end(&mut self.store, pointer)
    }

    pub fn cancel_gesture(&mut self) -> bool {
        self.drag.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::GoalLevel;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn session() -> PlannerSession {
        PlannerSession::new(TimeAxis::default(), DragPolicy::default(), date(1))
    }

    #[test]
    fn template_defaults_apply_on_active_date() {
        let mut s = session();
        s.set_active_date(date(3));
        let template = BlockTemplate::new("t1", "Deep work", 90).with_goal("g1");
        let id = s.add_from_template(&template).unwrap();
        let b = s.block(id).unwrap();
        assert_eq!(b.date, date(3));
        assert_eq!((b.start_minute, b.duration_minutes), (480, 90));
        assert_eq!(b.goal_id.as_deref(), Some("g1"));
        assert_eq!(b.template_id.as_deref(), Some("t1"));
    }

    #[test]
    fn unknown_template_id() {
        let mut s = session().with_templates(vec![BlockTemplate::new("t1", "Run", 30)]);
        assert!(s.add_from_template_id("t1").is_ok());
        assert!(matches!(
            s.add_from_template_id("nope"),
            Err(CoreError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn switching_date_leaves_other_days_alone() {
        let mut s = session();
        let id = s.add_block(BlockSpec::new(date(1), 60).with_start(600)).unwrap();
        s.set_active_date(date(2));
        assert!(s.blocks().is_empty());
        s.set_active_date(date(1));
        assert_eq!(s.blocks()[0].id, id);
        assert_eq!(s.blocks()[0].start_minute, 600);
    }

    #[test]
    fn switching_date_drops_gesture() {
        let mut s = session();
        let id = s.add_block(BlockSpec::new(date(1), 60).with_start(600)).unwrap();
        s.begin_gesture(id, 150.0, 960.0).unwrap();
        assert_eq!(s.gesture_phase(), GesturePhase::Dragging);
        s.set_active_date(date(2));
        assert_eq!(s.gesture_phase(), GesturePhase::Idle);
    }

    #[test]
    fn totals_resolve_dangling_goals() {
        let mut s = session().with_goals(vec![Goal::new("g1", "One", GoalLevel::Month)]);
        s.add_block(BlockSpec::new(date(1), 30).with_goal("g1")).unwrap();
        s.add_block(BlockSpec::new(date(1), 60).with_goal("gone")).unwrap();
        s.add_block(BlockSpec::new(date(2), 90).with_goal("g1")).unwrap();
        let totals = s.current_totals();
        assert_eq!(totals.minutes_for("g1"), 30);
        assert_eq!(totals.unassigned(), 60);
    }

    #[test]
    fn weekly_progress_spans_monday_to_sunday() {
        // 2024-01-01 is a Monday
        let mut s = session()
            .with_goals(vec![
                Goal::new("q", "Quarter", GoalLevel::Quarter).with_weekly_target(300),
                Goal::new("m", "Month", GoalLevel::Month)
                    .with_parent("q")
                    .with_weekly_target(120),
            ]);
        s.add_block(BlockSpec::new(date(1), 60).with_goal("m")).unwrap();
        s.add_block(BlockSpec::new(date(7), 60).with_goal("m")).unwrap();
        s.add_block(BlockSpec::new(date(8), 60).with_goal("m")).unwrap();
        s.set_active_date(date(4));

        let report = s.weekly_progress();
        let month = report.iter().find(|p| p.goal_id == "m").unwrap();
        let quarter = report.iter().find(|p| p.goal_id == "q").unwrap();
        assert_eq!(month.scheduled_minutes, 120);
        assert_eq!(month.remaining_minutes, 0);
        assert_eq!(quarter.scheduled_minutes, 120);
        assert_eq!(quarter.remaining_minutes, 180);
    }

    #[test]
    fn remove_cancels_gesture_on_that_block() {
        let mut s = session();
        let id = s.add_block(BlockSpec::new(date(1), 60).with_start(600)).unwrap();
        s.begin_gesture(id, 150.0, 960.0).unwrap();
        assert!(s.remove_block(id).is_some());
        assert_eq!(s.gesture_phase(), GesturePhase::Idle);
        assert!(s.remove_block(id).is_none());
    }

    #[test]
    fn free_slots_for_active_date() {
        let mut s = session();
        s.add_block(BlockSpec::new(date(1), 60).with_start(480)).unwrap();
        let slots = s.free_slots();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_minute, 540);
    }

    #[test]
    fn export_records_active_date() {
        let mut s = session();
        s.add_block(BlockSpec::new(date(1), 60)).unwrap();
        let snapshot = s.export();
        assert_eq!(snapshot.active_date, Some(date(1)));
        assert_eq!(snapshot.blocks.len(), 1);
    }
}
