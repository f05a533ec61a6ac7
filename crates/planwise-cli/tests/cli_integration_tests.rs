/// CLI integration tests for planwise
///
/// These tests exercise the binary as a black box against a temporary
/// database, covering command paths, owner scoping and error reporting.
use predicates::prelude::*;
use rstest::rstest;

mod helpers;
use helpers::{assertions, extract_ids, CliTestHarness, TestFixtures};

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("PlanWise"))
        .stdout(predicate::str::contains("task"))
        .stdout(predicate::str::contains("category"));

    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains("planwise"));

    harness
        .run_failure(&["invalid-command"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_user_is_required() {
    let harness = CliTestHarness::new();

    harness
        .anonymous_command()
        .args(["task", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No user configured"));

    harness
        .anonymous_command()
        .args(["--user", "carol", "task", "list"])
        .assert()
        .success()
        .stdout(assertions::empty_result());
}

#[test]
fn test_add_and_list_tasks() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["task", "add", "Basic Task"])
        .stdout(assertions::task_created_successfully());
    harness
        .run_success(&TestFixtures::sample_task_args())
        .stdout(assertions::task_created_successfully());

    harness
        .run_success(&["task", "list"])
        .stdout(assertions::has_task_table_headers())
        .stdout(predicate::str::contains("Basic Task"))
        .stdout(predicate::str::contains("Sample Task"));

    harness
        .run_success(&["task", "list", "--search", "basic"])
        .stdout(predicate::str::contains("Basic Task"))
        .stdout(predicate::str::contains("Sample Task").not());
}

#[rstest]
#[case::blank_title(&["task", "add", "   "])]
#[case::bad_due_date(&["task", "add", "Bad date", "--due", "not a date"])]
#[case::short_id(&["task", "done", "a"])]
#[case::unknown_id(&["task", "done", "ffffffff"])]
fn test_invalid_input_is_reported(#[case] args: &[&str]) {
    let harness = CliTestHarness::new();

    harness.run_failure(args).stderr(assertions::has_error());
}

#[test]
fn test_every_requires_until() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["task", "add", "Gym", "--due", "2024-01-01", "--every", "weekly"])
        .stderr(predicate::str::contains("--until"));
}

#[test]
fn test_recurring_task_creates_clamped_series() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&TestFixtures::pay_rent_args())
        .stdout(predicate::str::contains("Created recurring task"))
        .stdout(predicate::str::contains("4 instances"));

    let events = harness.calendar();
    let mut starts: Vec<i64> = events.iter().map(|e| e["start"].as_i64().unwrap()).collect();
    starts.sort_unstable();
    // Noon UTC on 2024-01-31, 02-29, 03-29 and 04-29
    assert_eq!(
        starts,
        vec![1_706_702_400_000, 1_709_208_000_000, 1_711_713_600_000, 1_714_392_000_000]
    );
    assert!(events.iter().all(|e| e["title"] == "Pay rent"));
    assert!(events.iter().all(|e| e["class"] == "event-important"));
}

#[test]
fn test_due_after_end_creates_nothing() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&[
            "task", "add", "Too late",
            "--due", "2024-02-01",
            "--every", "daily",
            "--until", "2024-01-31",
        ])
        .stdout(predicate::str::contains("No task created"));

    harness
        .run_success(&["task", "list"])
        .stdout(assertions::empty_result());
}

#[test]
fn test_subtasks_gate_completion_and_deletion() {
    let harness = CliTestHarness::new();

    let parent = harness.created_id(&["task", "add", "Move house"]);
    let child = harness.created_id(&["task", "reply", &parent[..8], "Pack books"]);

    harness
        .run_success(&["task", "show", &parent])
        .stdout(predicate::str::contains("Move house"))
        .stdout(predicate::str::contains("Pack books"));

    harness
        .run_failure(&["task", "done", &parent])
        .stderr(predicate::str::contains("Blocked by incomplete subtasks"))
        .stderr(predicate::str::contains("Pack books"));
    harness
        .run_failure(&["task", "delete", &parent, "--force"])
        .stderr(predicate::str::contains("Blocked by incomplete subtasks"));

    harness
        .run_success(&["task", "done", &child])
        .stdout(predicate::str::contains("Completed task: 'Pack books'"));
    harness
        .run_success(&["task", "done", &parent])
        .stdout(predicate::str::contains("Completed task: 'Move house'"));
    harness
        .run_success(&["task", "done", &parent])
        .stdout(predicate::str::contains("Reopened task: 'Move house'"));

    harness
        .run_success(&["task", "delete", &parent, "--force"])
        .stdout(predicate::str::contains("1 subtask(s)"));
    harness
        .run_success(&["task", "list", "--all"])
        .stdout(assertions::empty_result());
}

#[test]
fn test_delete_without_confirmation_is_cancelled() {
    let harness = CliTestHarness::new();
    let id = harness.created_id(&["task", "add", "Keep me"]);

    // No terminal to confirm on, so the prompt declines
    harness
        .run_success(&["task", "delete", &id])
        .stdout(predicate::str::contains("Deletion cancelled"));
    harness
        .run_success(&["task", "list"])
        .stdout(predicate::str::contains("Keep me"));
}

#[test]
fn test_tasks_are_scoped_to_their_owner() {
    let harness = CliTestHarness::new();
    let id = harness.created_id(&["task", "add", "Alice's secret"]);

    harness
        .command_as("bob")
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(assertions::empty_result());

    for args in [
        vec!["task", "done", id.as_str()],
        vec!["task", "show", id.as_str()],
        vec!["task", "delete", id.as_str(), "--force"],
        vec!["task", "edit", id.as_str(), "--title", "Stolen"],
    ] {
        harness
            .command_as("bob")
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found"));
    }

    harness
        .run_success(&["task", "show", &id])
        .stdout(predicate::str::contains("Alice's secret"));
}

#[test]
fn test_edit_task_fields() {
    let harness = CliTestHarness::new();
    let id = harness.created_id(&["task", "add", "Draft", "--due", "2030-01-01"]);

    harness
        .run_success(&["task", "edit", &id, "--title", "Final", "--due-clear", "--completed"])
        .stdout(predicate::str::contains("Updated task: 'Final'"));

    harness
        .run_success(&["task", "show", &id])
        .stdout(predicate::str::contains("Final"))
        .stdout(predicate::str::contains("Completed"))
        .stdout(predicate::str::contains("Due:").not());
}

#[test]
fn test_editing_series_regenerates_it() {
    let harness = CliTestHarness::new();
    harness.run_success(&TestFixtures::pay_rent_args());

    let before = harness.calendar();
    let id = before[0]["id"].as_str().unwrap().to_string();

    harness
        .run_success(&["task", "edit", &id, "--title", "Pay rent (flat 2)", "--force"])
        .stdout(predicate::str::contains("4 instances"));

    let after = harness.calendar();
    assert_eq!(after.len(), 4);
    assert!(after.iter().all(|e| e["title"] == "Pay rent (flat 2)"));
    assert!(after.iter().all(|e| before.iter().all(|b| b["id"] != e["id"])));
}

#[test]
fn test_making_task_recurring_requires_end_date() {
    let harness = CliTestHarness::new();
    let id = harness.created_id(&["task", "add", "Dentist", "--due", "2024-05-01"]);

    harness
        .run_failure(&["task", "edit", &id, "--every", "weekly", "--force"])
        .stderr(predicate::str::contains("needs a due date and an end date"));
    harness
        .run_success(&["task", "show", &id])
        .stdout(predicate::str::contains("Dentist"));

    harness
        .run_success(&["task", "edit", &id, "--every", "weekly", "--until", "2024-05-15", "--force"])
        .stdout(predicate::str::contains("3 instances"));
}

#[test]
fn test_category_lifecycle() {
    let harness = CliTestHarness::new();

    let category = harness.created_id(&["category", "add", "Home"]);
    harness
        .run_success(&["category", "list"])
        .stdout(predicate::str::contains("Home"));

    let task = harness.created_id(&["task", "add", "Vacuum", "--category", &category[..8]]);
    harness
        .run_success(&["category", "tasks", &category])
        .stdout(predicate::str::contains("Vacuum"));
    harness
        .run_success(&["task", "list", "--category", &category])
        .stdout(predicate::str::contains("Home"));

    harness
        .run_failure(&["category", "delete", &category, "--force"])
        .stderr(predicate::str::contains("Cannot delete category"));

    harness
        .run_success(&["category", "rename", &category, "House"])
        .stdout(predicate::str::contains("Renamed category to 'House'"));
    harness
        .command_as("bob")
        .args(["category", "rename", category.as_str(), "Mine"])
        .assert()
        .failure();

    harness.run_success(&["task", "delete", &task, "--force"]);
    harness
        .run_success(&["category", "delete", &category, "--force"])
        .stdout(predicate::str::contains("Deleted category: 'House'"));
    harness
        .run_success(&["category", "list"])
        .stdout(predicate::str::contains("No categories found"));
}

#[test]
fn test_summary_counts() {
    let harness = CliTestHarness::new();
    harness.run_success(&["task", "add", "Old", "--due", "2000-01-01"]);
    let done = harness.created_id(&["task", "add", "Done"]);
    harness.run_success(&["task", "done", &done]);
    harness.run_success(&["task", "add", "Open"]);

    let stdout = strip_colours(&harness.stdout_of(&["task", "summary"]));
    assert!(stdout.contains("3 total"));
    assert!(stdout.contains("1 completed"));
    assert!(stdout.contains("2 pending"));
    assert!(stdout.contains("1 overdue"));
}

#[test]
fn test_summary_overdue_uses_configured_timezone() {
    let harness = CliTestHarness::new();
    // UTC+14 is always at least a day ahead of UTC-12
    let ahead_today = (chrono::Utc::now() + chrono::Duration::hours(14)).date_naive();
    let due = (ahead_today - chrono::Duration::days(1)).to_string();
    harness.run_success(&["task", "add", "Call back", "--due", &due]);

    let summary_in = |zone: &str| {
        let output = harness
            .command()
            .env("PLANWISE_TIMEZONE", zone)
            .args(["task", "summary"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        strip_colours(&String::from_utf8_lossy(&output))
    };

    assert!(summary_in("Pacific/Kiritimati").contains("1 overdue"));
    assert!(summary_in("Etc/GMT+12").contains("0 overdue"));
}

/// Drops ANSI colour sequences such as `\x1b[1m`.
fn strip_colours(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[test]
fn test_calendar_is_json() {
    let harness = CliTestHarness::new();
    assert!(harness.calendar().is_empty());

    let stdout = harness.stdout_of(&["task", "add", "Dentist", "--due", "2030-06-01"]);
    let id = extract_ids(&stdout)[0].to_string();

    let events = harness.calendar();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], id.as_str());
    assert_eq!(events[0]["url"], format!("/task/{}/", id).as_str());
    assert_eq!(events[0]["class"], "event-info");
}
