use std::path::{Path, PathBuf};

use log::info;
use roboarena_shared::SimConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration in {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: &'static str },
}

/// Rules from a JSON file, or the defaults when no file is given. The file
/// only needs the fields it overrides.
pub fn load_sim_config(path: Option<&Path>) -> Result<SimConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: SimConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(reason) = config.problem() {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        });
    }
    info!("loaded rules from {}", path.display());
    Ok(config)
}
