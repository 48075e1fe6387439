use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Database file location; the user data directory is used when unset
    #[serde(default)]
    pub database_path: Option<String>,

    /// Maximum number of questions asked per quiz
    #[serde(default = "default_questions_per_quiz")]
    pub questions_per_quiz: usize,

    /// Subjects offered in the subject menu, in display order
    #[serde(default = "default_subjects")]
    pub subjects: Vec<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_questions_per_quiz() -> usize {
    5
}

fn default_subjects() -> Vec<String> {
    vec!["C++".to_string(), "Python".to_string(), "DSA".to_string()]
}

impl Config {
    /// Load the configuration file, writing a default one when it is missing
    pub fn load_or_create<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        if config_path.exists() {
            let file = File::open(config_path)
                .with_context(|| format!("Failed to open config file: {:?}", config_path))?;

            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

            Ok(config)
        } else {
            warn!("Config file not found at {:?}, creating default config.", config_path);

            let config = Config::default();
            config.save(config_path)?;
            Ok(config)
        }
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, config_path: P) -> Result<()> {
        let config_path = config_path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(config_path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", config_path))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.questions_per_quiz == 0 {
            return Err(anyhow!("questions_per_quiz must be at least 1"));
        }

        if self.subjects.is_empty() {
            return Err(anyhow!("At least one subject must be configured"));
        }

        if let Some(blank) = self.subjects.iter().position(|s| s.trim().is_empty()) {
            return Err(anyhow!("Subject #{} has an empty name", blank + 1));
        }

        if self.database_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(anyhow!("database_path must not be empty when set"));
        }

        Ok(())
    }

    /// Configured database path, if any
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database_path.as_ref().map(PathBuf::from)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: None,
            questions_per_quiz: default_questions_per_quiz(),
            subjects: default_subjects(),
            log_level: LogLevel::default(),
        }
    }
}
