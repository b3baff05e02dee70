//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{CampusBotError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(CampusBotError::Config("Bot token is required".to_string()));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(CampusBotError::Config(
            "Database URL is required".to_string(),
        ));
    }

    if config.max_connections == 0 {
        return Err(CampusBotError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CampusBotError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(CampusBotError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_missing_token_is_fatal() {
        let settings = Settings::default();
        assert_matches!(
            validate_settings(&settings),
            Err(CampusBotError::Config(message)) if message.contains("token")
        );
    }

    #[test]
    fn test_valid_settings_pass() {
        let mut settings = Settings::default();
        settings.bot.token = "123:abc".to_string();
        validate_settings(&settings).unwrap();
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let mut settings = Settings::default();
        settings.bot.token = "123:abc".to_string();
        settings.logging.level = "verbose".to_string();
        assert_matches!(
            validate_settings(&settings),
            Err(CampusBotError::Config(message)) if message.contains("log level")
        );
    }
}
