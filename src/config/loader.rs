use crate::config::schema::{Config, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "astrav.toml";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(path),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(
                f,
                "cannot read loader and symbol settings from {}: {}",
                path.display(),
                source
            ),
            ConfigError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "loader and symbol settings in {} are not valid TOML: {}",
                    path.display(),
                    source
                ),
                None => write!(f, "loader and symbol settings are not valid TOML: {}", source),
            },
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(
                    f,
                    "unusable loader settings in {}: {}",
                    path.display(),
                    source
                ),
                None => write!(f, "unusable loader settings: {}", source),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<Config, ConfigError> {
    let config: Config = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

/// Load a config file. A relative `symbols` path is resolved against the
/// directory holding the file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = load_from_str(&contents).map_err(|error| error.with_path(path))?;
    if let (Some(symbols), Some(dir)) = (&config.symbols, path.parent()) {
        if symbols.is_relative() {
            config.symbols = Some(dir.join(symbols));
        }
    }
    Ok(config)
}

/// Load `dir/astrav.toml` when it exists, defaults otherwise.
pub fn discover(dir: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let candidate = dir.as_ref().join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        load_from_path(candidate)
    } else {
        Ok(Config::default())
    }
}
