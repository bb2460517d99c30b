use assert_cmd::Command;

fn fixture_issues() -> String {
  serde_json::json!([
    {
      "key": "DEMO-1",
      "fields": {
        "issuetype": { "name": "Defect" },
        "status": { "name": "Open" },
        "priority": { "name": "Blocker" }
      }
    },
    {
      "key": "DEMO-2",
      "fields": {
        "issuetype": { "name": "Defect" },
        "status": { "name": "Open" },
        "priority": { "name": "Low" }
      }
    },
    {
      "key": "DEMO-3",
      "fields": {
        "issuetype": { "name": "Defect" },
        "status": { "name": "Done" },
        "priority": null
      }
    },
    {
      "key": "DEMO-4",
      "fields": {
        "issuetype": { "name": "Test Case" },
        "status": { "name": "Accepted" },
        "priority": { "name": "Blocker" }
      }
    },
    {
      "key": "DEMO-5",
      "fields": {
        "issuetype": { "name": "Test Case" },
        "status": { "name": "Rejected" }
      }
    }
  ])
  .to_string()
}

fn bin() -> Command {
  let mut cmd = Command::cargo_bin("tracker-board-report").unwrap();
  cmd.env_remove("TRACKER_URL").env_remove("JIRA_URL");
  cmd
}

#[test]
fn summary_outputs_expected_shape() {
  let mut cmd = bin();
  cmd
    .env("TBR_TEST_SEARCH_JSON", fixture_issues())
    .args(["summary", "--project", "DEMO"]);

  let out = cmd.output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["total_records"], 5);
  assert_eq!(v["status_counts"]["Open"], 2);
  assert_eq!(v["status_counts"]["Done"], 1);
  assert_eq!(v["status_counts"]["Accepted"], 1);

  // DEMO-4 is a blocker but a test artifact; only DEMO-1 counts as urgent
  assert_eq!(v["urgent_count"], 1);
  assert_eq!(v["urgent_message"], "Needs immediate attention");

  assert_eq!(v["outcome_counts"]["Accepted"], 1);
  assert_eq!(v["outcome_counts"]["Rejected"], 1);
  assert_eq!(v["outcome_counts"]["Generated"], 0);
}

#[test]
fn summary_paginates_small_pages_without_loss() {
  let mut cmd = bin();
  cmd
    .env("TBR_TEST_SEARCH_JSON", fixture_issues())
    .args(["summary", "--page-size", "2"]);

  let out = cmd.output().unwrap();
  assert!(out.status.success());

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["total_records"], 5);
}

#[test]
fn summary_calm_message_without_urgent_items() {
  let issues = serde_json::json!([
    { "key": "DEMO-1", "fields": { "issuetype": { "name": "Defect" }, "status": { "name": "Open" }, "priority": { "name": "Low" } } }
  ])
  .to_string();

  let mut cmd = bin();
  cmd.env("TBR_TEST_SEARCH_JSON", issues).arg("summary");

  let out = cmd.output().unwrap();
  assert!(out.status.success());

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["urgent_count"], 0);
  assert_eq!(v["urgent_message"], "No urgent items");
}

#[test]
fn summary_writes_report_file() {
  let td = tempfile::TempDir::new().unwrap();
  let path = td.path().join("summary.json");

  let mut cmd = bin();
  cmd
    .env("TBR_TEST_SEARCH_JSON", fixture_issues())
    .args(["summary", "--out", path.to_str().unwrap()]);

  cmd.assert().success();

  let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
  assert_eq!(v["total_records"], 5);
}

#[test]
fn custom_urgency_vocabulary_applies() {
  let issues = serde_json::json!([
    { "key": "DEMO-1", "fields": { "issuetype": { "name": "Defect" }, "status": { "name": "Open" }, "priority": { "name": "Sev1" } } },
    { "key": "DEMO-2", "fields": { "issuetype": { "name": "Defect" }, "status": { "name": "Open" }, "priority": { "name": "Blocker" } } }
  ])
  .to_string();

  let mut cmd = bin();
  cmd
    .env("TBR_TEST_SEARCH_JSON", issues)
    .args(["summary", "--urgent-priority", "sev1"]);

  let out = cmd.output().unwrap();
  assert!(out.status.success());

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  // "Blocker" no longer counts once the vocabulary is replaced
  assert_eq!(v["urgent_count"], 1);
}

#[test]
fn missing_endpoint_is_a_clear_error() {
  let mut cmd = bin();
  cmd
    .env_remove("TBR_TEST_SEARCH_JSON")
    .env_remove("TBR_TEST_PROJECTS_JSON")
    .env_remove("TBR_TEST_SEARCH_ERROR")
    .arg("summary");

  let out = cmd.output().unwrap();
  assert!(!out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("no tracker endpoint"));
}

#[test]
fn search_failure_aborts_without_partial_output() {
  let mut cmd = bin();
  cmd
    .env("TBR_TEST_SEARCH_ERROR", "upstream 503")
    .arg("summary");

  let out = cmd.output().unwrap();
  assert!(!out.status.success());
  assert!(out.stdout.is_empty());
  assert!(String::from_utf8_lossy(&out.stderr).contains("source unavailable"));
}

#[test]
fn gen_man_emits_troff() {
  use predicates::prelude::*;

  let mut cmd = bin();
  cmd.arg("--gen-man");
  cmd
    .assert()
    .success()
    .stdout(predicate::str::contains(".TH"))
    .stdout(predicate::str::contains("tracker-board-report"));
}
