//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a temporary data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_dayblock"))
        .arg("--data-dir")
        .arg(dir)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "CLI command failed: {:?}\n{}", args, stderr);
    stdout
}

#[test]
fn test_label() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(dir.path(), &["label", "810"]).trim(), "1:30 PM");
}

#[test]
fn test_add_move_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let id = run_ok(
        dir.path(),
        &["block", "add", "--date", "2024-01-01", "--duration", "90", "--goal", "g1"],
    )
    .trim()
    .to_string();

    let listed = run_ok(dir.path(), &["block", "list", "--date", "2024-01-01", "--json"]);
    let blocks: serde_json::Value = serde_json::from_str(&listed).unwrap();
    assert_eq!(blocks[0]["id"], id.as_str());
    assert_eq!(blocks[0]["start_minute"], 480);
    assert_eq!(blocks[0]["duration_minutes"], 90);

    run_ok(dir.path(), &["block", "move", &id, "--start", "08:20"]);
    let listed = run_ok(dir.path(), &["block", "list", "--date", "2024-01-01", "--json"]);
    let blocks: serde_json::Value = serde_json::from_str(&listed).unwrap();
    assert_eq!(blocks[0]["start_minute"], 510);
}

#[test]
fn test_resize_and_totals() {
    let dir = tempfile::tempdir().unwrap();
    let id = run_ok(
        dir.path(),
        &["block", "add", "--date", "2024-01-01", "--duration", "60", "--goal", "g1"],
    )
    .trim()
    .to_string();
    run_ok(
        dir.path(),
        &["block", "add", "--date", "2024-01-01", "--start", "10:00", "--duration", "30"],
    );
    run_ok(dir.path(), &["block", "resize", &id, "--edge", "end", "--to", "09:30"]);

    let totals = run_ok(dir.path(), &["block", "totals", "--date", "2024-01-01", "--json"]);
    let rows: serde_json::Value = serde_json::from_str(&totals).unwrap();
    assert_eq!(
        rows,
        serde_json::json!([
            {"goal_id": "g1", "minutes": 90},
            {"goal_id": null, "minutes": 30}
        ])
    );
}

#[test]
fn test_edges_reach_day_end_and_round_half_up() {
    let dir = tempfile::tempdir().unwrap();
    let id = run_ok(dir.path(), &["block", "add", "--date", "2024-01-01", "--duration", "30"])
        .trim()
        .to_string();
    run_ok(dir.path(), &["block", "move", &id, "--start", "08:15"]);
    run_ok(dir.path(), &["block", "resize", &id, "--edge", "end", "--to", "24:00"]);

    let listed = run_ok(dir.path(), &["block", "list", "--date", "2024-01-01", "--json"]);
    let blocks: serde_json::Value = serde_json::from_str(&listed).unwrap();
    assert_eq!(blocks[0]["start_minute"], 510);
    assert_eq!(blocks[0]["duration_minutes"], 930);
}

#[test]
fn test_remove_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let id = run_ok(dir.path(), &["block", "add", "--date", "2024-01-01", "--duration", "30"])
        .trim()
        .to_string();
    run_ok(dir.path(), &["block", "remove", &id]);
    run_ok(dir.path(), &["block", "remove", &id]);
    let listed = run_ok(dir.path(), &["block", "list", "--date", "2024-01-01", "--json"]);
    let blocks: serde_json::Value = serde_json::from_str(&listed).unwrap();
    assert_eq!(blocks, serde_json::json!([]));
}

#[test]
fn test_errors_exit_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["block", "add", "--date", "2024-01-01", "--duration", "0"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error: Invalid duration"));

    let missing = "00000000-0000-0000-0000-000000000000";
    let (_, stderr, code) = run_cli(dir.path(), &["block", "move", missing, "--start", "09:00"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Block not found"));
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["config", "set", "axis.snap_unit_minutes", "15"]);
    assert_eq!(
        run_ok(dir.path(), &["config", "get", "axis.snap_unit_minutes"]).trim(),
        "15"
    );
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "axis.day_end_minute", "1430"]);
    assert_ne!(code, 0);
    assert!(run_ok(dir.path(), &["config", "show"]).contains("snap_unit_minutes = 15"));
}
