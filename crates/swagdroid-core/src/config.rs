//! Configuration for swagdroid runs.
//!
//! Two pieces, both built once at startup and passed by reference:
//!
//! - [`Credentials`]: the four required login values, read from the process
//!   environment. Any missing variable is fatal.
//! - [`SessionConfig`]: how to reach the Appium server and which app to
//!   launch. Stored in `~/.swagdroid/config.json`; defaults are used when the
//!   file does not exist.
//!
//! # Example
//!
//! ```no_run
//! use swagdroid_core::config::{Credentials, SessionConfig};
//!
//! let credentials = Credentials::from_env().expect("credentials");
//! let session = SessionConfig::load();
//! println!("{} -> {}", credentials.standard_user, session.server_url);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

const CONFIG_FILENAME: &str = "config.json";

pub const ENV_STANDARD_USER: &str = "STANDARD_USER";
pub const ENV_PROBLEM_USER: &str = "PROBLEM_USER";
pub const ENV_LOCKED_OUT_USER: &str = "LOCKED_OUT_USER";
pub const ENV_PASSWORD: &str = "PASSWORD";

/// Returns the swagdroid state directory (`~/.swagdroid`).
///
/// Creates the directory if it doesn't exist.
pub fn swagdroid_dir() -> PathBuf {
    let dir = dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".swagdroid");
    ensure_dir(&dir);
    dir
}

/// Returns the run log directory (`~/.swagdroid/logs`).
pub fn logs_dir() -> PathBuf {
    let dir = swagdroid_dir().join("logs");
    ensure_dir(&dir);
    dir
}

/// Best-effort directory creation. Failures are logged, not returned.
fn ensure_dir(dir: &Path) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!(path = %dir.display(), error = %e, "failed to create directory");
    }
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("One or more environment variables are not set: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Login values for the three user tiers plus the shared password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub standard_user: String,
    pub problem_user: String,
    pub locked_out_user: String,
    pub password: String,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`, reporting every missing name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut get = |name: &'static str| {
            lookup(name).unwrap_or_else(|| {
                missing.push(name);
                String::new()
            })
        };

        let credentials = Self {
            standard_user: get(ENV_STANDARD_USER),
            problem_user: get(ENV_PROBLEM_USER),
            locked_out_user: get(ENV_LOCKED_OUT_USER),
            password: get(ENV_PASSWORD),
        };

        if missing.is_empty() {
            Ok(credentials)
        } else {
            Err(ConfigError::MissingVariables(missing))
        }
    }
}

/// Appium session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL of the Appium server.
    pub server_url: String,
    /// `appium:deviceName` (adb serial or emulator name).
    pub device_name: String,
    /// Path to the APK; made absolute before it is sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_path: Option<PathBuf>,
    pub app_package: String,
    pub app_activity: String,
    pub automation_name: String,
    /// Server-side implicit wait applied to element lookups.
    pub implicit_wait_ms: u64,
    /// `appium:newCommandTimeout` in seconds.
    pub new_command_timeout_secs: u64,
    /// Client-side bound on a single HTTP command.
    pub http_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:4723".to_string(),
            device_name: "emulator-5554".to_string(),
            app_path: Some(PathBuf::from(
                "apps/android/Android.SauceLabs.Mobile.Sample.app.2.7.1.apk",
            )),
            app_package: "com.swaglabsmobileapp".to_string(),
            app_activity: "com.swaglabsmobileapp.MainActivity".to_string(),
            automation_name: "UiAutomator2".to_string(),
            implicit_wait_ms: 10_000,
            new_command_timeout_secs: 120,
            http_timeout_ms: 60_000,
        }
    }
}

impl SessionConfig {
    /// Default config file location (`~/.swagdroid/config.json`).
    pub fn default_path() -> PathBuf {
        swagdroid_dir().join(CONFIG_FILENAME)
    }

    /// Load config from `~/.swagdroid/config.json`.
    ///
    /// Returns [`Default`] if the file does not exist or cannot be parsed.
    pub fn load() -> Self {
        std::fs::read_to_string(Self::default_path())
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit path. Unlike [`load`](Self::load), a
    /// missing or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to `path`.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }

    pub fn implicit_wait(&self) -> Duration {
        Duration::from_millis(self.implicit_wait_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    /// W3C `alwaysMatch` capabilities for this config.
    pub fn capabilities(&self) -> Value {
        let mut caps = json!({
            "platformName": "Android",
            "appium:automationName": self.automation_name,
            "appium:deviceName": self.device_name,
            "appium:appPackage": self.app_package,
            "appium:appActivity": self.app_activity,
            "appium:newCommandTimeout": self.new_command_timeout_secs,
        });
        if let Some(app) = &self.app_path {
            let app = std::path::absolute(app).unwrap_or_else(|_| app.clone());
            caps["appium:app"] = Value::String(app.display().to_string());
        }
        caps
    }
}
