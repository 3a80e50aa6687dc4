use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn sla() -> Command {
    let mut cmd = Command::cargo_bin("sla").unwrap();
    cmd.env_remove("SLA_BUSINESS_START")
        .env_remove("SLA_BUSINESS_END")
        .env_remove("SLA_BUSINESS_DAYS");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

fn write_policy(name: &str, body: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("sla-cli-{}-{name}.json", std::process::id()));
    std::fs::write(&path, body).unwrap();
    path
}

// ── due ──────────────────────────────────────────────────────────────

#[test]
fn test_due_rolls_into_next_business_day() {
    let out = json_output(sla().args(["due", "--from", "2026-03-18T16:00:00Z", "--minutes", "240"]));
    assert_eq!(out["due"], "2026-03-19T11:00:00");
    assert_eq!(out["business_hours"], true);
}

#[test]
fn test_due_skips_weekend() {
    let out = json_output(sla().args(["due", "--from", "2026-03-20T17:30:00", "--minutes", "60"]));
    assert_eq!(out["due"], "2026-03-23T09:30:00");
}

#[test]
fn test_due_calendar_flag() {
    let out = json_output(sla().args([
        "due",
        "--from",
        "2026-03-18T16:00:00",
        "--minutes",
        "240",
        "--calendar",
    ]));
    assert_eq!(out["due"], "2026-03-18T20:00:00");
    assert_eq!(out["business_hours"], false);
}

#[test]
fn test_due_with_inline_policy() {
    let out = json_output(sla().args([
        "--start", "10:00", "--end", "12:00", "--days", "6,7", "due", "--from",
        "2026-03-20T11:00:00", "--minutes", "150",
    ]));
    // Saturday 10:00–12:00, then Sunday 10:00–10:30.
    assert_eq!(out["due"], "2026-03-22T10:30:00");
}

#[test]
fn test_due_policy_from_env() {
    let out = json_output(
        sla()
            .env("SLA_BUSINESS_START", "08:00")
            .env("SLA_BUSINESS_END", "16:00")
            .args(["due", "--from", "2026-03-18T15:00:00", "--minutes", "120"]),
    );
    assert_eq!(out["due"], "2026-03-19T09:00:00");
}

// ── elapsed ──────────────────────────────────────────────────────────

#[test]
fn test_elapsed_business_minutes() {
    let out = json_output(sla().args([
        "elapsed",
        "--from",
        "2026-03-18T16:00:00",
        "--to",
        "2026-03-19T11:00:00",
    ]));
    assert_eq!(out["minutes"], 240);
}

#[test]
fn test_elapsed_reversed_is_zero() {
    let out = json_output(sla().args([
        "elapsed",
        "--from",
        "2026-03-19T11:00:00",
        "--to",
        "2026-03-18T16:00:00",
    ]));
    assert_eq!(out["minutes"], 0);
}

// ── check ────────────────────────────────────────────────────────────

#[test]
fn test_check_at_closing_time() {
    let out = json_output(sla().args(["check", "--at", "2026-03-18T18:00:00"]));
    assert_eq!(out["weekday"], "Wednesday");
    assert_eq!(out["is_business_day"], true);
    assert_eq!(out["is_business_hours"], false);
    assert_eq!(out["next_business_start"], "2026-03-19T09:00:00");
    assert_eq!(out["business_end_of_day"], "2026-03-18T18:00:00");
}

// ── policy file, deadlines, status ───────────────────────────────────

#[test]
fn test_deadlines_from_policy_file() {
    let path = write_policy(
        "deadlines",
        r#"{"business_start": "09:00", "business_end": "18:00", "business_days": [1,2,3,4,5],
            "business_hours_only": true, "first_response_minutes": 60, "resolution_minutes": 1080}"#,
    );
    let out = json_output(sla().arg("--policy").arg(&path).args([
        "deadlines",
        "--from",
        "2026-03-18T16:00:00",
    ]));
    assert_eq!(out["first_response_due"], "2026-03-18T17:00:00");
    assert_eq!(out["resolution_due"], "2026-03-20T16:00:00");
    std::fs::remove_file(path).ok();
}

#[test]
fn test_flags_override_policy_file() {
    let path = write_policy("override", r#"{"business_start": "07:00", "business_days": [1]}"#);
    let out = json_output(sla().arg("--policy").arg(&path).args(["--days", "1,2", "policy"]));
    assert_eq!(out["business_start"], "07:00");
    assert_eq!(out["business_end"], "18:00");
    assert_eq!(out["business_days"], serde_json::json!([1, 2]));
    assert_eq!(out["business_minutes_per_day"], 660);
    std::fs::remove_file(path).ok();
}

#[test]
fn test_status_breached() {
    let out = json_output(sla().args([
        "status",
        "--from",
        "2026-03-18T16:00:00",
        "--due",
        "2026-03-19T11:00:00",
        "--now",
        "2026-03-19T12:30:00",
    ]));
    assert_eq!(out["breached"], true);
    assert_eq!(out["remaining_minutes"], -90);
    assert_eq!(out["elapsed_minutes"], 330);
}

#[test]
fn test_business_hours_flag_overrides_calendar_record() {
    let path = write_policy("calendar", r#"{"business_hours_only": false}"#);

    let out = json_output(sla().arg("--policy").arg(&path).args([
        "due",
        "--from",
        "2026-03-18T16:00:00",
        "--minutes",
        "240",
    ]));
    assert_eq!(out["due"], "2026-03-18T20:00:00");

    let out = json_output(sla().arg("--policy").arg(&path).args([
        "--business-hours",
        "due",
        "--from",
        "2026-03-18T16:00:00",
        "--minutes",
        "240",
    ]));
    assert_eq!(out["due"], "2026-03-19T11:00:00");
    assert_eq!(out["business_hours"], true);
    std::fs::remove_file(path).ok();
}

#[test]
fn test_due_accepts_space_separated_minutes() {
    let out = json_output(sla().args(["due", "--from", "2026-03-18 16:00", "--minutes", "240"]));
    assert_eq!(out["due"], "2026-03-19T11:00:00");
}

// ── errors ───────────────────────────────────────────────────────────

#[test]
fn test_calendar_and_business_hours_conflict() {
    sla()
        .args(["--calendar", "--business-hours", "policy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_inverted_window_is_rejected() {
    sla()
        .args(["--start", "18:00", "--end", "09:00", "policy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid policy"));
}

#[test]
fn test_bad_weekday_is_rejected() {
    sla()
        .args(["--days", "0", "policy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid weekday"));
}

#[test]
fn test_bad_datetime_is_rejected() {
    sla()
        .args(["due", "--from", "yesterday", "--minutes", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--from"));
}

#[test]
fn test_missing_policy_file() {
    sla()
        .args(["--policy", "/nonexistent/sla-policy.json", "policy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read policy file"));
}
