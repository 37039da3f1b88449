use crate::config::types::{Config, CrawlerConfig, OutputConfig, SessionConfig};
use crate::ConfigError;

/// Longest accepted pause between discussion visits (milliseconds)
const MAX_REQUEST_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_session_config(&config.session)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates session configuration
fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.cookie_name.is_empty() {
        return Err(ConfigError::Validation(
            "cookie_name cannot be empty".to_string(),
        ));
    }

    if config
        .cookie_name
        .chars()
        .any(|c| c == ';' || c == '=' || c == ',' || c.is_whitespace() || c.is_control())
    {
        return Err(ConfigError::Validation(format!(
            "cookie_name must not contain separators or whitespace, got '{}'",
            config.cookie_name
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_delay_ms > MAX_REQUEST_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "request_delay_ms must be <= {}ms, got {}ms",
            MAX_REQUEST_DELAY_MS, config.request_delay_ms
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.file_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "file_name cannot be empty".to_string(),
        ));
    }

    if let Some(directory) = &config.directory {
        if directory.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "directory cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
