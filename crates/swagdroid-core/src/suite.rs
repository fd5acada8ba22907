//! Sequential scenario runner.
//!
//! [`SuiteRunner`] runs scenarios one after another, each in its own app
//! session obtained from a [`SessionFactory`]. The session is quit after the
//! scenario whether it passed or not. Failures become records in the
//! [`SuiteReport`]; only selection errors stop a run.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::app::App;
use crate::config::{Credentials, SessionConfig};
use crate::driver::DriverError;
use crate::report::{ReportLog, ScenarioRecord, SuiteReport};
use crate::scenario::{Scenario, Tag};

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Unknown scenario '{0}'. Run `swagdroid list` to see available scenarios")]
    UnknownScenario(String),

    #[error("No scenarios match the given filters")]
    NothingSelected,
}

/// Opens a fresh app session for each scenario.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<App, DriverError>;
}

/// Opens sessions on an Appium server.
pub struct AppiumSessionFactory {
    config: SessionConfig,
}

impl AppiumSessionFactory {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for AppiumSessionFactory {
    async fn open(&self) -> Result<App, DriverError> {
        App::launch(&self.config).await
    }
}

/// Which scenarios to run. Empty filters select everything.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub tags: Vec<Tag>,
    pub names: Vec<String>,
}

impl Selection {
    /// Resolve the filters against [`Scenario::ALL`], keeping declaration order.
    pub fn resolve(&self) -> Result<Vec<Scenario>, SuiteError> {
        for name in &self.names {
            if Scenario::from_name(name).is_none() {
                return Err(SuiteError::UnknownScenario(name.clone()));
            }
        }
        let selected: Vec<Scenario> = Scenario::ALL
            .into_iter()
            .filter(|s| self.tags.is_empty() || self.tags.contains(&s.tag()))
            .filter(|s| self.names.is_empty() || self.names.iter().any(|n| n == s.name()))
            .collect();
        if selected.is_empty() {
            return Err(SuiteError::NothingSelected);
        }
        Ok(selected)
    }
}

pub struct SuiteRunner {
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
    screenshot_dir: Option<PathBuf>,
    log: Option<ReportLog>,
}

impl SuiteRunner {
    pub fn new(factory: Arc<dyn SessionFactory>, credentials: Credentials) -> Self {
        Self {
            factory,
            credentials,
            screenshot_dir: None,
            log: None,
        }
    }

    /// Save a screenshot into `dir` when a scenario fails.
    pub fn with_screenshots(mut self, dir: PathBuf) -> Self {
        self.screenshot_dir = Some(dir);
        self
    }

    /// Append every record to `log` as it is produced.
    pub fn with_log(mut self, log: ReportLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn log(&self) -> Option<&ReportLog> {
        self.log.as_ref()
    }

    pub async fn run(&mut self, scenarios: &[Scenario]) -> SuiteReport {
        let mut report = SuiteReport::new();
        info!(run_id = %report.run_id, count = scenarios.len(), "suite started");
        for scenario in scenarios {
            let record = self.run_one(*scenario).await;
            if let Some(log) = self.log.as_mut() {
                if let Err(e) = log.append(&record) {
                    warn!(path = %log.path().display(), error = %e, "failed to write run log");
                }
            }
            report.push(record);
        }
        info!(passed = report.passed(), failed = report.failed(), "suite finished");
        report
    }

    /// Run one scenario in its own session.
    pub async fn run_one(&self, scenario: Scenario) -> ScenarioRecord {
        let started_at = Utc::now();
        let clock = std::time::Instant::now();

        let app = match self.factory.open().await {
            Ok(app) => app,
            Err(e) => {
                error!(scenario = scenario.name(), error = %e, "session setup failed");
                return ScenarioRecord::failed(
                    scenario,
                    started_at,
                    clock.elapsed(),
                    format!("session setup failed: {}", e),
                );
            }
        };

        let result = scenario.run(&app, &self.credentials).await;
        let mut record = match &result {
            Ok(()) => ScenarioRecord::passed(scenario, started_at, clock.elapsed()),
            Err(e) => {
                warn!(scenario = scenario.name(), error = %e, "scenario failed");
                ScenarioRecord::failed(scenario, started_at, clock.elapsed(), e.to_string())
            }
        };

        if result.is_err() {
            record.screenshot = self.capture_failure(&app, &record).await;
        }

        if let Err(e) = app.quit().await {
            warn!(scenario = scenario.name(), error = %e, "session teardown failed");
        }
        record
    }

    async fn capture_failure(&self, app: &App, record: &ScenarioRecord) -> Option<PathBuf> {
        let dir = self.screenshot_dir.as_ref()?;
        let png = match app.screenshot().await {
            Ok(png) => png,
            Err(e) => {
                warn!(scenario = %record.name, error = %e, "failed to capture screenshot");
                return None;
            }
        };
        let timestamp = record.started_at.format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("{}_{}.png", record.name, timestamp));
        let written = std::fs::create_dir_all(dir).and_then(|_| std::fs::write(&path, png));
        match written {
            Ok(()) => {
                info!(path = %path.display(), "failure screenshot saved");
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save screenshot");
                None
            }
        }
    }
}
