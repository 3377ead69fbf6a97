//! Outcome of one environment run.
//!
//! Command failures are data, not errors: the runner records every command
//! with its status and the CLI turns the report into exit codes and output.

use serde::Serialize;

/// What happened to a single command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandStatus {
    /// Exited zero.
    Passed,
    /// Exited non-zero and stopped the run.
    Failed { code: i32 },
    /// Exited non-zero but was marked continue-on-failure.
    Ignored { code: i32 },
    /// Never ran because an earlier command failed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRecord {
    /// Shell-style rendering of the command, for display.
    pub command: String,
    #[serde(flatten)]
    pub status: CommandStatus,
    pub duration_ms: u64,
}

impl CommandRecord {
    pub fn new(command: impl Into<String>, status: CommandStatus, duration_ms: u64) -> Self {
        Self {
            command: command.into(),
            status,
            duration_ms,
        }
    }
}

/// Full record of one `envrun run` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub env_name: String,
    pub records: Vec<CommandRecord>,
}

impl RunReport {
    pub fn new(env_name: impl Into<String>) -> Self {
        Self {
            env_name: env_name.into(),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: CommandRecord) {
        self.records.push(record);
    }

    /// The first hard failure, if any.
    pub fn failure(&self) -> Option<&CommandRecord> {
        self.records
            .iter()
            .find(|r| matches!(r.status, CommandStatus::Failed { .. }))
    }

    /// Exit code the whole run should report: the first failing command's
    /// code, zero otherwise.
    pub fn exit_code(&self) -> i32 {
        match self.failure() {
            Some(record) => match record.status {
                CommandStatus::Failed { code } => code,
                _ => 1,
            },
            None => 0,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure().is_none()
    }

    pub fn passed(&self) -> usize {
        self.count(|s| matches!(s, CommandStatus::Passed))
    }

    pub fn ignored(&self) -> usize {
        self.count(|s| matches!(s, CommandStatus::Ignored { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, CommandStatus::Skipped))
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.records.iter().map(|r| r.duration_ms).sum()
    }

    fn count(&self, pred: impl Fn(&CommandStatus) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.status)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_passed() {
        let mut report = RunReport::new("pytest");
        report.push(CommandRecord::new("pytest", CommandStatus::Passed, 1200));
        report.push(CommandRecord::new("flake8 src", CommandStatus::Passed, 300));

        assert!(report.succeeded());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.passed(), 2);
        assert_eq!(report.total_duration_ms(), 1500);
    }

    #[test]
    fn test_exit_code_is_first_failure() {
        let mut report = RunReport::new("qa");
        report.push(CommandRecord::new("black --check src", CommandStatus::Passed, 10));
        report.push(CommandRecord::new(
            "pytest",
            CommandStatus::Failed { code: 2 },
            900,
        ));
        report.push(CommandRecord::new("flake8 src", CommandStatus::Skipped, 0));

        assert!(!report.succeeded());
        assert_eq!(report.exit_code(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failure().unwrap().command, "pytest");
    }

    #[test]
    fn test_ignored_failure_does_not_fail_the_run() {
        let mut report = RunReport::new("qa");
        report.push(CommandRecord::new(
            "pydocstyle src",
            CommandStatus::Ignored { code: 1 },
            40,
        ));
        report.push(CommandRecord::new("pytest", CommandStatus::Passed, 800));

        assert!(report.succeeded());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.ignored(), 1);
    }

    #[test]
    fn test_serializes_with_status_tags() {
        let mut report = RunReport::new("qa");
        report.push(CommandRecord::new(
            "pytest",
            CommandStatus::Failed { code: 7 },
            5,
        ));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(json.contains("\"code\":7"));
        assert!(json.contains("\"env_name\":\"qa\""));
    }
}
