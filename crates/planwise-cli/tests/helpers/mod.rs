use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;
use uuid::Uuid;

pub const DEFAULT_USER: &str = "alice";

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// Command without any acting user
    pub fn anonymous_command(&self) -> Command {
        let mut cmd = Command::cargo_bin("planwise").expect("Failed to find planwise binary");

        // Run inside the temp dir so no stray planwise.toml is picked up
        cmd.current_dir(self.temp_dir.path());
        cmd.env("PLANWISE_DATABASE_PATH", &self.db_path);
        cmd.env("PLANWISE_TIMEZONE", "UTC");
        cmd.env_remove("PLANWISE_USER");
        cmd.env_remove("RUST_LOG");

        cmd
    }

    /// Get a Command instance acting as `user`
    pub fn command_as(&self, user: &str) -> Command {
        let mut cmd = self.anonymous_command();
        cmd.env("PLANWISE_USER", user);
        cmd
    }

    /// Get a Command instance acting as the default user
    pub fn command(&self) -> Command {
        self.command_as(DEFAULT_USER)
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs a successful command and returns its stdout
    pub fn stdout_of(&self, args: &[&str]) -> String {
        let output = self.run_success(args).get_output().stdout.clone();
        String::from_utf8_lossy(&output).into_owned()
    }

    /// Runs a successful command and returns the first id it printed
    pub fn created_id(&self, args: &[&str]) -> String {
        let stdout = self.stdout_of(args);
        extract_ids(&stdout)
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("no id in output: {}", stdout))
            .to_string()
    }

    /// Parses the calendar feed
    pub fn calendar(&self) -> Vec<serde_json::Value> {
        let stdout = self.stdout_of(&["calendar"]);
        serde_json::from_str(&stdout).expect("calendar output is not JSON")
    }
}

/// Every UUID in `output`, in order; tolerates colour escape codes around them.
pub fn extract_ids(output: &str) -> Vec<Uuid> {
    output
        .split(|c: char| !(c.is_ascii_hexdigit() || c == '-'))
        .filter(|token| token.len() == 36)
        .filter_map(|token| token.parse().ok())
        .collect()
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Monthly series clamped at the end of February
    pub fn pay_rent_args() -> Vec<&'static str> {
        vec![
            "task", "add", "Pay rent",
            "--due", "2024-01-31",
            "--every", "monthly",
            "--until", "2024-04-30",
        ]
    }

    pub fn sample_task_args() -> Vec<&'static str> {
        vec!["task", "add", "Sample Task", "--due", "tomorrow", "--description", "Test task"]
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check if output contains task table headers
    pub fn has_task_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Title"))
            .and(predicate::str::contains("Status"))
    }

    /// Predicate to check if output indicates successful task creation
    pub fn task_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("Created task").or(predicate::str::contains("Created recurring task"))
    }

    /// Predicate to check for empty result set
    pub fn empty_result() -> impl Predicate<str> {
        predicate::str::contains("No tasks found")
    }

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
