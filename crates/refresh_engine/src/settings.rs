use std::fs;
use std::io;
use std::path::Path;

use refresh_core::RefreshConfig;
use refresh_logging::refresh_info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Parse a RON refresh configuration; missing fields take their defaults.
pub fn parse_config(text: &str) -> Result<RefreshConfig, ConfigError> {
    ron::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
}

pub fn load_config(path: &Path) -> Result<RefreshConfig, ConfigError> {
    let text = fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    refresh_info!("Loaded refresh config from {:?}", path);
    Ok(config)
}
