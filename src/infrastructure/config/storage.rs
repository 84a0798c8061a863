//! Location, loading and atomic saving of `config.toml`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration loading errors.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("no platform configuration directory available")]
    ConfigDirNotFound,
    #[error("config file io: {0}")]
    Io(#[from] io::Error),
    #[error("config could not be serialized: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("feed url {url:?} is invalid: {source}")]
    InvalidFeedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Handle on one configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Uses `path_override` if given, otherwise `config.toml` in the
    /// platform configuration directory.
    ///
    /// # Errors
    /// Returns [`ConfigError::ConfigDirNotFound`] if no override is given and
    /// the platform has no configuration directory.
    pub fn locate(path_override: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path_override {
            return Ok(Self::at(path.to_path_buf()));
        }

        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| Self::at(dirs.config_dir().join(CONFIG_FILE_NAME)))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Uses the given file.
    #[must_use]
    pub const fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the configuration file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the configuration.
    ///
    /// A missing file is written out with defaults first. A file that does
    /// not parse is left as it is and defaults are returned.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or the default
    /// cannot be written.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No config file, writing defaults");
                let config = AppConfig::default();
                self.save_config(&config)?;
                return Ok(config);
            }
            Err(e) => return Err(e.into()),
        };

        toml::from_str::<AppConfig>(&content).or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Config file is invalid, using defaults");
            Ok(AppConfig::default())
        })
    }

    /// Writes the configuration, replacing the file atomically.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if serialization or the write fails.
    pub fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;
        write_atomically(&self.path, content.as_bytes())?;
        debug!(path = %self.path.display(), "Saved config");
        Ok(())
    }
}

fn write_atomically(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(content)?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
