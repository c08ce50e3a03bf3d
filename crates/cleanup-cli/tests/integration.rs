#![allow(deprecated)]
use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const NOW: &str = "2020-03-05T17:29:45Z";

fn visit_cleanup(config: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("visit-cleanup").unwrap();
    cmd.arg("--config")
        .arg(config)
        .env_remove("TEMPLATE_ID")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, server_url: &str, extra: &str) -> PathBuf {
    let path = dir.path().join("cleanup.yaml");
    let yaml = format!(
        "services:\n  activities_url: {server_url}\n  test_results_url: {server_url}\n  request_timeout_secs: 5\n\
         notify:\n  base_url: {server_url}\n  template_id: 2af4ff8e-af5b-4f32-80a9-d03719180647\n{extra}"
    );
    std::fs::write(&path, yaml).unwrap();
    path
}

fn mock_open_visits(server: &mut mockito::ServerGuard, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("GET", "/activities/cleanup")
        .match_query(Matcher::UrlEncoded("activityType".into(), "visit".into()))
        .with_status(status)
        .with_body(body)
        .create()
}

// ---------------------------------------------------------------------------
// visit-cleanup config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_accepts_good_config() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "http://localhost:3004", "");

    visit_cleanup(&config)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_rejects_inverted_thresholds() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        "http://localhost:3004",
        "thresholds:\n  reminder_after_hours: 4\n  close_after_hours: 3\n",
    );

    visit_cleanup(&config)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"))
        .stderr(predicate::str::contains("config validation found errors"));
}

#[test]
fn config_validate_rejects_out_of_range_threshold() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        "http://localhost:3004",
        "thresholds:\n  reminder_after_hours: 3\n  close_after_hours: 2600000000\n",
    );

    visit_cleanup(&config)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("close_after_hours (2600000000) exceeds"));

    visit_cleanup(&config)
        .args(["run", "--now", NOW])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config has errors"));
}

#[test]
fn config_validate_rejects_unparseable_url() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "http://exa mple.com:99999", "");

    visit_cleanup(&config)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("not a valid URL"));
}

#[test]
fn config_show_json_reports_thresholds() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "http://localhost:3004", "");

    let output = visit_cleanup(&config)
        .args(["--json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["thresholds"]["reminder_after_hours"], 3);
    assert_eq!(value["thresholds"]["close_after_hours"], 4);
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nope.yaml");

    visit_cleanup(&config)
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

// ---------------------------------------------------------------------------
// visit-cleanup run
// ---------------------------------------------------------------------------

#[test]
fn run_with_no_open_visits_is_nothing_to_do() {
    let mut server = mockito::Server::new();
    let visits = mock_open_visits(&mut server, 404, "No resources match the search criteria");
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.url(), "");

    visit_cleanup(&config)
        .args(["run", "--now", NOW])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No stale visits found. Nothing to act on.",
        ));
    visits.assert();
}

#[test]
fn run_closes_stale_visit_and_reports_json() {
    let mut server = mockito::Server::new();
    mock_open_visits(
        &mut server,
        200,
        r#"[{"id":"v-a","testerStaffId":"132","testerEmail":"t@example.com",
            "startTime":"2020-03-05T13:00:00.000Z","endTime":null}]"#,
    );
    let sub_activities = server
        .mock("GET", "/activities/cleanup")
        .match_query(Matcher::UrlEncoded("isOpen".into(), "false".into()))
        .with_status(404)
        .expect(2)
        .create();
    let test_results = server
        .mock("GET", "/test-results/getTestResultsByTesterStaffId")
        .match_query(Matcher::Any)
        .with_status(404)
        .create();
    let end = server
        .mock("PUT", "/activities/v-a/end")
        .match_body(Matcher::Json(serde_json::json!({
            "endTime": "2020-03-05T13:00:00.000Z"
        })))
        .with_status(200)
        .with_body("{}")
        .create();

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.url(), "");

    let output = visit_cleanup(&config)
        .args(["--json", "run", "--now", NOW])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "completed");
    assert_eq!(value["decisions"][0]["visit_id"], "v-a");
    assert_eq!(value["decisions"][0]["action"], "CLOSE");
    assert_eq!(value["decisions"][0]["outcome"], "success");

    sub_activities.assert();
    test_results.assert();
    end.assert();
}

#[test]
fn run_records_failed_close_but_succeeds() {
    let mut server = mockito::Server::new();
    mock_open_visits(
        &mut server,
        200,
        r#"[{"id":"v-a","testerStaffId":"132","startTime":"2020-03-05T12:00:00.000Z","endTime":null}]"#,
    );
    server
        .mock("GET", "/activities/cleanup")
        .match_query(Matcher::UrlEncoded("isOpen".into(), "false".into()))
        .with_status(200)
        .with_body("[]")
        .create();
    server
        .mock("GET", "/test-results/getTestResultsByTesterStaffId")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create();
    server
        .mock("PUT", "/activities/v-a/end")
        .with_status(500)
        .with_body("Ending activities encountered failures")
        .create();

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.url(), "");

    visit_cleanup(&config)
        .args(["run", "--now", NOW])
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed to close"))
        .stdout(predicate::str::contains("could not be actioned"));
}

#[test]
fn run_fails_when_open_visits_cannot_be_listed() {
    let mut server = mockito::Server::new();
    mock_open_visits(&mut server, 418, "bad things");
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.url(), "");

    visit_cleanup(&config)
        .args(["run", "--now", NOW])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cleanup pass failed"))
        .stderr(predicate::str::contains("list_open_visits failed with status 418"));
}
