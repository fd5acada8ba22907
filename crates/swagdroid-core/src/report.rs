//! Run reports.
//!
//! Every executed scenario produces a [`ScenarioRecord`]. The records of one
//! run are collected into a [`SuiteReport`] and, when a [`ReportLog`] is
//! attached, appended as JSON Lines to `~/.swagdroid/logs/run_<timestamp>.jsonl`
//! as each scenario finishes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::logs_dir;
use crate::scenario::{Scenario, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub id: Uuid,
    pub name: String,
    pub tag: Tag,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub status: ScenarioStatus,
    /// Failure description; `None` when the scenario passed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure screenshot, if one was captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
}

impl ScenarioRecord {
    pub fn passed(scenario: Scenario, started_at: DateTime<Utc>, duration: Duration) -> Self {
        Self::new(scenario, started_at, duration, ScenarioStatus::Passed, None)
    }

    pub fn failed(
        scenario: Scenario,
        started_at: DateTime<Utc>,
        duration: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            scenario,
            started_at,
            duration,
            ScenarioStatus::Failed,
            Some(message.into()),
        )
    }

    fn new(
        scenario: Scenario,
        started_at: DateTime<Utc>,
        duration: Duration,
        status: ScenarioStatus,
        message: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: scenario.name().to_string(),
            tag: scenario.tag(),
            started_at,
            duration_ms: duration.as_millis() as u64,
            status,
            message,
            screenshot: None,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

/// All records of one suite run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub records: Vec<ScenarioRecord>,
}

impl SuiteReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: ScenarioRecord) {
        self.records.push(record);
    }

    pub fn passed(&self) -> usize {
        self.records.iter().filter(|r| r.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.records.iter().filter(|r| !r.is_passed())
    }
}

impl Default for SuiteReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Append-only JSON Lines file of scenario records.
pub struct ReportLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ReportLog {
    /// Create `run_<timestamp>.jsonl` in the default logs directory.
    pub fn create_default(started_at: DateTime<Utc>) -> std::io::Result<Self> {
        Self::create_in(&logs_dir(), started_at)
    }

    /// Errors name the directory or file that could not be created.
    pub fn create_in(dir: &Path, started_at: DateTime<Utc>) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| with_path(e, "create log directory", dir))?;
        let timestamp = started_at.format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("run_{}.jsonl", timestamp));
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| with_path(e, "open run log", &path))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, record: &ScenarioRecord) -> std::io::Result<()> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()
    }
}

impl std::fmt::Debug for ReportLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportLog")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn with_path(err: std::io::Error, action: &str, path: &Path) -> std::io::Error {
    std::io::Error::new(err.kind(), format!("cannot {} {}: {}", action, path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AcceptedUsername;

    #[test]
    fn counts_passes_and_failures() {
        let now = Utc::now();
        let mut report = SuiteReport::new();
        report.push(ScenarioRecord::passed(
            Scenario::StandardUserLogin,
            now,
            Duration::from_millis(1500),
        ));
        report.push(ScenarioRecord::failed(
            Scenario::EmptyPassword,
            now,
            Duration::from_millis(20),
            "assertion failed",
        ));
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_passed());
        let failures: Vec<_> = report.failures().map(|r| r.name.as_str()).collect();
        assert_eq!(failures, ["cant_authenticate_with_empty_password"]);
    }

    #[test]
    fn record_serializes_without_empty_fields() {
        let record = ScenarioRecord::passed(
            Scenario::Autofill(AcceptedUsername::Problem),
            Utc::now(),
            Duration::from_millis(42),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "passed");
        assert_eq!(json["tag"], "positive");
        assert_eq!(json["duration_ms"], 42);
        assert!(json.get("message").is_none());
        assert!(json.get("screenshot").is_none());
    }

    #[test]
    fn log_appends_one_line_per_record() {
        let dir = std::env::temp_dir().join(format!("swagdroid-report-{}", Uuid::new_v4()));
        let started = Utc::now();
        let mut log = ReportLog::create_in(&dir, started).unwrap();
        let record = ScenarioRecord::failed(
            Scenario::WrongPassword,
            started,
            Duration::from_secs(1),
            "boom",
        );
        log.append(&record).unwrap();
        log.append(&record).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: ScenarioRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.message.as_deref(), Some("boom"));
        assert!(log
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("run_"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn log_creation_error_names_the_directory() {
        let blocker = std::env::temp_dir().join(format!("swagdroid-blocker-{}", Uuid::new_v4()));
        std::fs::write(&blocker, b"not a directory").unwrap();
        let dir = blocker.join("logs");

        let err = ReportLog::create_in(&dir, Utc::now()).err().unwrap();

        let message = err.to_string();
        assert!(message.contains("create log directory"), "got {message}");
        assert!(message.contains(&dir.display().to_string()), "got {message}");
        std::fs::remove_file(&blocker).ok();
    }
}
