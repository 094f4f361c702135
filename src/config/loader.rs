//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::DevServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<DevServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub api: Option<String>,
    pub sso: Option<String>,
    pub static_dir: Option<String>,
    pub no_open: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut DevServerConfig) {
        if let Some(bind) = &self.bind_address {
            config.listener.bind_address = bind.clone();
        }
        if let Some(api) = &self.api {
            config.upstreams.api = api.clone();
        }
        if let Some(sso) = &self.sso {
            config.upstreams.sso = sso.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.dev_server.static_dir = dir.clone();
        }
        if self.no_open {
            config.dev_server.open = false;
        }
    }
}

/// Load configuration, apply overrides, then validate the result.
///
/// Without a path the built-in defaults are the base.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<DevServerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => DevServerConfig::default(),
    };
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
