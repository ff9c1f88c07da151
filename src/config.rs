use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::answer_matcher::MatchPolicy;

// Import logging macros
use crate::{log_system_event, log_validation};

/// Complete application configuration loaded from environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub quiz: QuizConfig,
    pub circle: CircleConfig,
    pub logging: LoggingConfig,
}

/// Locations of the deck and shopping list files
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub deck_path: PathBuf,
    pub shopping_list_path: PathBuf,
}

/// Quiz session defaults
#[derive(Debug, Clone, Deserialize)]
pub struct QuizConfig {
    #[serde(skip)]
    pub match_policy: MatchPolicy,
    pub shuffle: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CircleConfig {
    pub max_attempts: u32,
}

/// Logging system configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_enabled: bool,
    pub console_enabled: bool,
    pub console_level: String,
    pub log_directory: String,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Result<Self> {
        log_system_event!(config, "Loading application configuration from environment variables");

        let config = Config {
            storage: StorageConfig::from_env(),
            quiz: QuizConfig::from_env(),
            circle: CircleConfig::from_env()?,
            logging: LoggingConfig::from_env(),
        };

        log_system_event!(config, "Configuration loaded successfully");
        config.log_configuration_summary();

        Ok(config)
    }

    fn log_configuration_summary(&self) {
        info!(
            deck_path = %self.storage.deck_path.display(),
            shopping_list_path = %self.storage.shopping_list_path.display(),
            match_policy = %self.quiz.match_policy,
            shuffle = self.quiz.shuffle,
            circle_max_attempts = self.circle.max_attempts,
            log_level = %self.logging.level,
            "Configuration summary"
        );
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.storage.deck_path.as_os_str().is_empty() {
            return Err(anyhow!("DECK_PATH cannot be empty"));
        }

        if self.storage.shopping_list_path.as_os_str().is_empty() {
            return Err(anyhow!("SHOPPING_LIST_PATH cannot be empty"));
        }

        if self.circle.max_attempts == 0 {
            return Err(anyhow!("CIRCLE_MAX_ATTEMPTS must be greater than 0"));
        }

        if !LOG_LEVELS.contains(&self.logging.console_level.to_lowercase().as_str()) {
            warn!(
                "Invalid console log level '{}', using 'warn' as fallback",
                self.logging.console_level
            );
        }

        log_validation!(success, "configuration", "Configuration validation completed successfully");
        Ok(())
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().to_lowercase().parse::<bool>().ok())
        .unwrap_or(default)
}

impl StorageConfig {
    fn from_env() -> Self {
        let deck_path = env::var("DECK_PATH").unwrap_or_else(|_| "data/mi_deck.json".to_string());
        let shopping_list_path =
            env::var("SHOPPING_LIST_PATH").unwrap_or_else(|_| "lista_compras.json".to_string());

        StorageConfig {
            deck_path: PathBuf::from(deck_path),
            shopping_list_path: PathBuf::from(shopping_list_path),
        }
    }
}

impl QuizConfig {
    fn from_env() -> Self {
        let match_policy = env::var("MATCH_POLICY")
            .map(|name| MatchPolicy::from_name(&name))
            .unwrap_or_default();

        QuizConfig {
            match_policy,
            shuffle: env_flag("QUIZ_SHUFFLE", true),
        }
    }
}

impl CircleConfig {
    fn from_env() -> Result<Self> {
        let attempts_str = env::var("CIRCLE_MAX_ATTEMPTS").unwrap_or_else(|_| "3".to_string());

        let max_attempts = attempts_str.trim().parse::<u32>().map_err(|_| {
            anyhow!(
                "Invalid CIRCLE_MAX_ATTEMPTS value: '{}'. Must be a positive whole number",
                attempts_str
            )
        })?;

        Ok(CircleConfig { max_attempts })
    }
}

impl LoggingConfig {
    /// Read only the logging settings, so logging can start before the rest is loaded
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info,study_engine=debug".to_string());

        let console_level = env::var("LOG_CONSOLE_LEVEL").unwrap_or_else(|_| "warn".to_string());

        let log_directory = env::var("LOG_DIRECTORY").unwrap_or_else(|_| "logs".to_string());

        LoggingConfig {
            level,
            file_enabled: env_flag("LOG_FILE_ENABLED", true),
            console_enabled: env_flag("LOG_CONSOLE_ENABLED", true),
            console_level,
            log_directory,
        }
    }
}
