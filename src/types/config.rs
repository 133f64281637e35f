//! Configuration types for Starchat.
//!
//! Two layers:
//!
//! - [`Settings`] is the optional `config.toml` file. Every field has a
//!   default, so an empty or missing file is valid.
//! - [`Config`] is the resolved runtime configuration handed to
//!   [`crate::app::run`], after CLI flags and environment variables have
//!   been applied on top of the file.
//!
//! # Example file
//!
//! ```toml
//! base_url = "https://answers.example.com"
//! language = "hindi"
//!
//! [profile]
//! name = "Asha"
//! date = "1990-04-12"
//! time = "06:45"
//! place = "Pune"
//! latitude = 18.52
//! longitude = 73.85
//!
//! [retry]
//! max_attempts = 3
//! base_delay_ms = 1000
//! max_delay_ms = 4000
//! ```

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::request::{BirthProfile, Language};

/// Errors that can occur while loading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`Settings`].
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The platform config directory could not be determined.
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Retry tuning for transient failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay_ms: u64,
    /// Upper bound for any single delay.
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 4000,
        }
    }
}

/// Loading-status ticker tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoadingSettings {
    /// Milliseconds between status messages.
    pub interval_ms: u64,
    /// Rotation of placeholder messages.
    pub messages: Vec<String>,
}

impl LoadingSettings {
    /// Returns the tick interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

impl Default for LoadingSettings {
    fn default() -> Self {
        Self {
            interval_ms: 3000,
            messages: [
                "Reading your birth chart…",
                "Calculating planetary positions…",
                "Consulting the nakshatras…",
                "Analyzing dasha periods…",
                "Preparing your answer…",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Path of the streaming answer endpoint on the default service.
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/chat/stream";

/// Contents of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Scheme and host of the answer service.
    pub base_url: String,
    /// Path of the streaming answer endpoint.
    pub endpoint_path: String,
    /// Default response language.
    pub language: Language,
    /// Default birth profile.
    pub profile: Option<BirthProfile>,
    /// Retry tuning.
    pub retry: RetrySettings,
    /// Loading ticker tuning.
    pub loading: LoadingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            language: Language::default(),
            profile: None,
            retry: RetrySettings::default(),
            loading: LoadingSettings::default(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Toml` if the text is not valid.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads settings from an explicit file. The file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Loads settings from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields [`Settings::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, or any file fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = default_config_path()?;
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    tracing::debug!(path = %path.display(), "No config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Returns the full endpoint URL.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        join_url(&self.base_url, &self.endpoint_path)
    }
}

/// Returns the default settings path (`<config dir>/starchat/config.toml`).
///
/// # Errors
///
/// Returns `ConfigError::NoConfigDir` if the config directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dirs = directories::ProjectDirs::from("com", "starchat", "starchat")
        .ok_or(ConfigError::NoConfigDir)?;
    Ok(dirs.config_dir().join("config.toml"))
}

/// Joins a base URL and a path with exactly one slash between them.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// How the final answer is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Styled terminal lines.
    #[default]
    Styled,
    /// `serde_json` array of content blocks.
    Json,
}

/// Resolved runtime configuration.
///
/// # Security Note
///
/// The `api_key` field uses [`SecretString`] to prevent accidental logging.
pub struct Config {
    /// Optional bearer token for the answer service.
    pub api_key: Option<SecretString>,
    /// Full URL of the streaming answer endpoint.
    pub endpoint_url: String,
    /// Birth profile used for every question.
    pub profile: BirthProfile,
    /// Response language.
    pub language: Language,
    /// Retry tuning.
    pub retry: RetrySettings,
    /// Loading ticker tuning.
    pub loading: LoadingSettings,
    /// Question to ask once and exit; `None` starts interactive mode.
    pub question: Option<String>,
    /// Output format.
    pub output: OutputMode,
}
