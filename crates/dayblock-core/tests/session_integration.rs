//! Integration tests for the planner session.

use chrono::NaiveDate;
use dayblock_core::{
    BlockPatch, BlockSpec, BlockStore, CoreError, DragPolicy, GestureOutcome, GesturePhase,
    GoalAggregator, PlannerConfig, PlannerSession, TimeAxis,
};

fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn session() -> PlannerSession {
    let axis = TimeAxis::new(480, 1440, 30).unwrap();
    PlannerSession::new(axis, DragPolicy::default(), jan(1))
}

#[test]
fn add_then_move_snaps_to_nearest_slot() {
    let mut s = session();
    let id = s
        .add_block(BlockSpec::new(jan(1), 90).with_goal("g1"))
        .unwrap();
    let b = s.block(id).unwrap();
    assert_eq!((b.start_minute, b.duration_minutes), (480, 90));

    let fraction = s.axis().minute_to_fraction(500);
    let outcome = s.move_block(id, fraction).unwrap();
    assert_eq!(
        outcome,
        GestureOutcome::Moved {
            id,
            start_minute: 510
        }
    );
    let b = s.block(id).unwrap();
    assert_eq!((b.start_minute, b.duration_minutes), (510, 90));
}

#[test]
fn resize_end_rounds_half_up() {
    let mut s = session();
    let axis = *s.axis();

    let id = s.add_block(BlockSpec::new(jan(1), 60)).unwrap();
    s.resize_block_end(id, axis.minute_to_fraction(555)).unwrap();
    assert_eq!(s.block(id).unwrap().duration_minutes, 90);

    s.resize_block_end(id, axis.minute_to_fraction(554)).unwrap();
    assert_eq!(s.block(id).unwrap().duration_minutes, 60);

    s.resize_block_end(id, axis.minute_to_fraction(560)).unwrap();
    assert_eq!(s.block(id).unwrap().duration_minutes, 90);
    assert_eq!(s.block(id).unwrap().start_minute, 480);
}

#[test]
fn half_slot_rounds_up_on_uneven_window() {
    let axis = TimeAxis::new(0, 330, 30).unwrap();
    let mut s = PlannerSession::new(axis, DragPolicy::default(), jan(1));
    let id = s.add_block(BlockSpec::new(jan(1), 30)).unwrap();

    s.move_block(id, axis.minute_to_fraction(225)).unwrap();
    assert_eq!(s.block(id).unwrap().start_minute, axis.snap(225));
    assert_eq!(s.block(id).unwrap().start_minute, 240);

    s.move_block_to(id, 75).unwrap();
    assert_eq!(s.block(id).unwrap().start_minute, 90);
    s.resize_block_end_to(id, 330).unwrap();
    assert_eq!(s.block(id).unwrap().end_minute(), 330);
    s.resize_block_start_to(id, 15).unwrap();
    let b = s.block(id).unwrap();
    assert_eq!((b.start_minute, b.duration_minutes), (30, 300));
}

#[test]
fn extreme_minutes_do_not_overflow() {
    let mut s = session();
    let id = s.add_block(BlockSpec::new(jan(1), 60)).unwrap();
    s.move_block_to(id, i64::MAX).unwrap();
    s.resize_block_end_to(id, i64::MAX).unwrap();
    let b = s.block(id).unwrap();
    assert_eq!((b.start_minute, b.duration_minutes), (1410, 30));
    s.resize_block_start_to(id, i64::MIN).unwrap();
    let b = s.block(id).unwrap();
    assert_eq!((b.start_minute, b.end_minute()), (480, 1440));
    assert!(s.free_slots().is_empty());
}

#[test]
fn resize_start_keeps_end_fixed() {
    let mut s = session();
    let axis = *s.axis();
    let id = s
        .add_block(BlockSpec::new(jan(1), 60).with_start(600))
        .unwrap();

    s.resize_block_start(id, axis.minute_to_fraction(530)).unwrap();
    let b = s.block(id).unwrap();
    assert_eq!((b.start_minute, b.duration_minutes, b.end_minute()), (540, 120, 660));

    s.resize_block_start(id, axis.minute_to_fraction(1000)).unwrap();
    let b = s.block(id).unwrap();
    assert_eq!((b.start_minute, b.duration_minutes, b.end_minute()), (630, 30, 660));
}

#[test]
fn overlapping_blocks_are_allowed() {
    let mut s = session();
    let outer = s
        .add_block(BlockSpec::new(jan(1), 180).with_start(540).with_goal("work"))
        .unwrap();
    let inner = s
        .add_block(BlockSpec::new(jan(1), 30).with_start(600).with_goal("walk"))
        .unwrap();

    let blocks = s.blocks();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].overlaps(blocks[1]));
    assert!(s.block(outer).is_some());
    assert!(s.block(inner).is_some());

    let fraction = s.axis().minute_to_fraction(570);
    s.move_block(inner, fraction).unwrap();
    assert_eq!(s.block(inner).unwrap().start_minute, 570);
    assert_eq!(s.block(outer).unwrap().start_minute, 540);
}

#[test]
fn not_found_propagates_without_effect() {
    let mut s = session();
    let id = s.add_block(BlockSpec::new(jan(1), 60)).unwrap();
    s.remove_block(id);

    assert!(matches!(s.move_block(id, 0.5), Err(CoreError::NotFound { .. })));
    assert!(matches!(s.resize_block_start(id, 0.5), Err(CoreError::NotFound { .. })));
    assert!(matches!(s.resize_block_end(id, 0.5), Err(CoreError::NotFound { .. })));
    assert!(matches!(
        s.patch_block(id, BlockPatch::note(Some("late".into()))),
        Err(CoreError::NotFound { .. })
    ));
    assert!(s.store().is_empty());
}

#[test]
fn pointer_gesture_below_threshold_changes_nothing() {
    let mut s = session();
    let id = s
        .add_block(BlockSpec::new(jan(1), 60).with_start(600))
        .unwrap();
    let before = s.export();

    // 960px extent: one pixel per minute; block spans 120..180
    assert_eq!(s.begin_gesture(id, 150.0, 960.0).unwrap(), GesturePhase::Dragging);
    s.update_gesture(152.0);
    assert_eq!(s.end_gesture(151.0).unwrap(), GestureOutcome::Click { id });
    assert_eq!(s.gesture_phase(), GesturePhase::Idle);
    assert_eq!(s.export(), before);
}

#[test]
fn pointer_gesture_drag_end_to_end() {
    let mut s = session();
    let id = s
        .add_block(BlockSpec::new(jan(1), 60).with_start(600))
        .unwrap();

    assert_eq!(s.begin_gesture(id, 178.0, 960.0).unwrap(), GesturePhase::ResizingEnd);
    s.update_gesture(200.0);
    s.end_gesture(242.0).unwrap();
    let b = s.block(id).unwrap();
    assert_eq!((b.start_minute, b.duration_minutes), (600, 120));

    assert_eq!(s.begin_gesture(id, 150.0, 960.0).unwrap(), GesturePhase::Dragging);
    assert!(s.cancel_gesture());
    assert_eq!(s.end_gesture(400.0).unwrap(), GestureOutcome::Ignored);
    assert_eq!(s.block(id).unwrap().start_minute, 600);
}

#[test]
fn export_import_roundtrip_is_exact() {
    let mut s = session();
    let a = s
        .add_block(BlockSpec::new(jan(1), 90).with_goal("g1").with_note("plan"))
        .unwrap();
    s.add_block(BlockSpec::new(jan(2), 30).with_start(1410)).unwrap();
    s.resize_block_end(a, 1.0).unwrap();
    s.patch_block(a, BlockPatch::goal(None)).unwrap();

    let snapshot = s.export();
    let restored = PlannerSession::load(&PlannerConfig::default(), snapshot.clone(), jan(9)).unwrap();
    assert_eq!(restored.active_date(), jan(1));
    assert_eq!(restored.export(), snapshot);

    let store = BlockStore::from_blocks(*s.axis(), snapshot.blocks.clone()).unwrap();
    assert_eq!(store.export(), snapshot.blocks);
}

#[test]
fn load_rejects_misaligned_duration() {
    let mut s = session();
    let id = s.add_block(BlockSpec::new(jan(1), 60)).unwrap();
    let mut snapshot = s.export();
    snapshot.blocks[0].duration_minutes = 50;

    let err = PlannerSession::load(&PlannerConfig::default(), snapshot, jan(1)).unwrap_err();
    assert!(matches!(err, CoreError::InvalidDuration { minutes: 50, .. }));
    assert!(s.block(id).is_some());
}

#[test]
fn load_rejects_bad_config() {
    let mut config = PlannerConfig::default();
    config.axis.day_end_minute = 1430;
    let err = PlannerSession::load(&config, Default::default(), jan(1)).unwrap_err();
    assert!(matches!(err, CoreError::Config(_)));
}

#[test]
fn totals_follow_active_date() {
    let mut s = session();
    s.add_block(BlockSpec::new(jan(1), 30).with_goal("g1")).unwrap();
    s.add_block(BlockSpec::new(jan(1), 60).with_goal("g1")).unwrap();
    s.add_block(BlockSpec::new(jan(2), 120).with_goal("g1")).unwrap();

    let raw = GoalAggregator::totals_by_goal(s.blocks());
    assert_eq!(raw.minutes_for("g1"), 90);
    assert_eq!(raw.len(), 1);

    s.set_active_date(jan(3));
    assert!(GoalAggregator::totals_by_goal(s.blocks()).is_empty());
    assert!(s.current_totals().is_empty());
}
