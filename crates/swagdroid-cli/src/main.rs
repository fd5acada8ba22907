//! Command-line runner for the Swag Labs Android login scenarios.
//!
//! Credentials come from the `STANDARD_USER`, `PROBLEM_USER`,
//! `LOCKED_OUT_USER` and `PASSWORD` environment variables. Session settings
//! come from `~/.swagdroid/config.json` (or `--config`).
//!
//! # Usage
//!
//! ```bash
//! # List scenarios and their tags
//! swagdroid list
//!
//! # Run everything against the local Appium server
//! swagdroid run
//!
//! # Run only negative scenarios, saving screenshots of failures
//! swagdroid run --tag negative --screenshots
//!
//! # Run one scenario on another server, JSON report on stdout
//! swagdroid --format json run -s cant_authenticate_with_empty_password \
//!     --server http://10.0.0.5:4723
//!
//! # Shell completions
//! swagdroid completions zsh > _swagdroid
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use swagdroid_core::config::{logs_dir, Credentials, SessionConfig};
use swagdroid_core::report::{ReportLog, SuiteReport};
use swagdroid_core::scenario::{Scenario, Tag};
use swagdroid_core::suite::{AppiumSessionFactory, Selection, SuiteRunner};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Run Swag Labs Android UI scenarios through Appium.
#[derive(Parser)]
#[command(name = "swagdroid")]
#[command(about = "Run Swag Labs Android login scenarios against an Appium server")]
#[command(version)]
struct Cli {
    /// Output format: text or json
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    /// Log engine activity (retries, swipes) at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, env = "SWAGDROID_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List available scenarios
    List {
        /// Only scenarios with this tag
        #[arg(short, long)]
        tag: Option<Tag>,
    },

    /// Run scenarios, each in a fresh app session
    Run {
        /// Only scenarios with this tag (repeatable)
        #[arg(short, long)]
        tag: Vec<Tag>,
        /// Only the named scenario (repeatable)
        #[arg(short, long)]
        scenario: Vec<String>,
        /// Appium server URL, overriding the config file
        #[arg(long, env = "SWAGDROID_SERVER")]
        server: Option<String>,
        /// Session config file (defaults to ~/.swagdroid/config.json)
        #[arg(short, long, env = "SWAGDROID_CONFIG")]
        config: Option<PathBuf>,
        /// Save a screenshot when a scenario fails
        #[arg(long)]
        screenshots: bool,
    },

    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = log_file.and_then(|path| {
        let name = path.file_name()?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let appender = tracing_appender::rolling::never(dir, name);
        Some(fmt::layer().with_writer(appender).with_ansi(false))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();
}

#[derive(Debug)]
enum CliError {
    Config(String),
    ScenariosFailed(usize),
    Io(String),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::ScenariosFailed(_) => ExitCode::from(1),
            CliError::Config(_) => ExitCode::from(2),
            CliError::Io(_) => ExitCode::from(3),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ScenariosFailed(n) => write!(f, "{} scenario(s) failed", n),
            CliError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List { tag } => {
            list_scenarios(tag, cli.format);
            Ok(())
        }
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "swagdroid", &mut io::stdout());
            Ok(())
        }
        Command::Run {
            tag,
            scenario,
            server,
            config,
            screenshots,
        } => {
            let credentials =
                Credentials::from_env().map_err(|e| CliError::Config(e.to_string()))?;
            let scenarios = Selection {
                tags: tag,
                names: scenario,
            }
            .resolve()
            .map_err(|e| CliError::Config(e.to_string()))?;

            let mut session_config = match config {
                Some(path) => {
                    SessionConfig::load_from(&path).map_err(|e| CliError::Config(e.to_string()))?
                }
                None => SessionConfig::load(),
            };
            if let Some(server) = server {
                session_config.server_url = server;
            }
            info!(server = %session_config.server_url, count = scenarios.len(), "running scenarios");

            let log = ReportLog::create_default(chrono::Utc::now())
                .map_err(|e| CliError::Io(format!("Failed to create run log: {}", e)))?;
            let mut runner = SuiteRunner::new(
                Arc::new(AppiumSessionFactory::new(session_config)),
                credentials,
            )
            .with_log(log);
            if screenshots {
                runner = runner.with_screenshots(logs_dir().join("screenshots"));
            }

            let report = runner.run(&scenarios).await;
            let log_path = runner.log().map(|l| l.path().to_path_buf());
            print_report(&report, log_path.as_deref(), cli.format)?;

            if report.all_passed() {
                Ok(())
            } else {
                Err(CliError::ScenariosFailed(report.failed()))
            }
        }
    }
}

fn list_scenarios(tag: Option<Tag>, format: OutputFormat) {
    let scenarios: Vec<Scenario> = Scenario::ALL
        .into_iter()
        .filter(|s| tag.map_or(true, |t| s.tag() == t))
        .collect();

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = scenarios
                .iter()
                .map(|s| serde_json::json!({ "name": s.name(), "tag": s.tag() }))
                .collect();
            println!("{}", serde_json::Value::Array(entries));
        }
        OutputFormat::Text => {
            for s in &scenarios {
                println!("{:<60} {}", s.name(), s.tag());
            }
        }
    }
}

fn print_report(
    report: &SuiteReport,
    log_path: Option<&Path>,
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report)
                .map_err(|e| CliError::Io(format!("Failed to serialize report: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for record in &report.records {
                let status = if record.is_passed() { "PASS" } else { "FAIL" };
                println!("{} {} ({} ms)", status, record.name, record.duration_ms);
                if let Some(message) = &record.message {
                    println!("     {}", message);
                }
                if let Some(path) = &record.screenshot {
                    println!("     screenshot: {}", path.display());
                }
            }
            println!("{} passed, {} failed", report.passed(), report.failed());
            if let Some(path) = log_path {
                eprintln!("Run log: {}", path.display());
            }
        }
    }
    Ok(())
}
