use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::fs;
use std::path::Path;

/// Loads and validates a TOML configuration file
///
/// # Example
///
/// ```no_run
/// use spinneret::config::load_config;
/// use std::path::Path;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Workers: {}", config.crawler.workers);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    validate(&config)?;
    Ok(config)
}
