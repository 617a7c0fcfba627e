//! StudyPlanner configuration types and loading

use chrono::{NaiveDate, Weekday};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::calendar::{self, ExamCalendar};

/// Main StudyPlanner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generative API configuration
    pub generator: GeneratorConfig,

    /// Document store configuration
    pub storage: StorageConfig,

    /// How the user is identified
    pub identity: IdentityConfig,

    /// Exam date and seminar day
    pub calendar: CalendarConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Parses the calendar fields and checks the retry settings so that a bad
    /// config fails at startup with a clear message.
    pub fn validate(&self) -> Result<()> {
        self.calendar.resolve()?;
        if self.generator.max_attempts == 0 {
            return Err(eyre::eyre!("generator.max-attempts must be at least 1"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .studyplanner.yml
        let local_config = PathBuf::from(".studyplanner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/studyplanner/studyplanner.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("studyplanner").join("studyplanner.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Generative API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Inline API key, used when the environment variable is unset
    #[serde(rename = "api-key", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Total attempts per generation, including the first
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Base of the exponential backoff in milliseconds
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash-preview-05-20".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_ms: 60_000,
            max_attempts: 5,
            backoff_base_ms: 1000,
        }
    }
}

impl GeneratorConfig {
    /// Resolve the API key: environment variable first, then the inline key
    ///
    /// An empty key is allowed; requests are sent anyway and the service
    /// answers with an error that goes through the normal retry path.
    pub fn get_api_key(&self) -> String {
        if let Ok(key) = std::env::var(&self.api_key_env)
            && !key.is_empty()
        {
            return key;
        }
        match &self.api_key {
            Some(key) => key.clone(),
            None => {
                tracing::warn!(env = %self.api_key_env, "No API key configured, requests will likely fail");
                String::new()
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

/// Document store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store directory (defaults to the platform data dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// The directory holding the store and the anonymous identity file
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => expand_home(path),
            None => docstore::default_store_dir(),
        }
    }
}

/// Identity source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    /// Persisted anonymous id, created on first run
    #[default]
    Anonymous,
    /// Externally issued token used as the user id
    Token,
}

/// Identity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub mode: IdentityMode,

    /// Token used in `token` mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable consulted before `token`
    #[serde(rename = "token-env")]
    pub token_env: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            mode: IdentityMode::Anonymous,
            token: None,
            token_env: "STUDYPLANNER_TOKEN".to_string(),
        }
    }
}

impl IdentityConfig {
    /// Token from the environment, then from the config
    pub fn resolve_token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.token.clone())
    }
}

/// Calendar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Exam date, `DD-MM-YYYY`
    #[serde(rename = "exam-date")]
    pub exam_date: String,

    /// Weekday on which the seminar is offered
    #[serde(rename = "seminar-day")]
    pub seminar_day: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            exam_date: calendar::DEFAULT_EXAM_DATE.to_string(),
            seminar_day: "saturday".to_string(),
        }
    }
}

impl CalendarConfig {
    pub fn exam_date(&self) -> Result<NaiveDate> {
        calendar::parse_date(&self.exam_date)
            .with_context(|| format!("Invalid calendar.exam-date '{}', expected DD-MM-YYYY", self.exam_date))
    }

    pub fn seminar_weekday(&self) -> Result<Weekday> {
        self.seminar_day
            .trim()
            .parse::<Weekday>()
            .map_err(|_| eyre::eyre!("Invalid calendar.seminar-day '{}'", self.seminar_day))
    }

    /// Parse both fields
    pub fn resolve(&self) -> Result<ExamCalendar> {
        Ok(ExamCalendar {
            exam_date: self.exam_date()?,
            seminar_day: self.seminar_weekday()?,
        })
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map(|home| home.join(rest)).unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
