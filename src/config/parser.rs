use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use moodle_forum_export::config::load_config;
///
/// let config = load_config(Path::new("forum.toml")).unwrap();
/// println!("Delay between discussions: {}ms", config.crawler.request_delay_ms);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Resolves the configuration used for a run
///
/// Loads the file when one is given (defaults otherwise), applies
/// environment overrides through `lookup`, then validates the result.
pub fn resolve_config<F>(path: Option<&Path>, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    // OUT_FILE wins over the file
    config.apply_env(lookup);
    validate(&config)?;

    Ok(config)
}
