//! User configuration.
//!
//! Read from `<config dir>/livescroll-reader/config.toml` unless a path is
//! given with `--config`.  A missing file means defaults.
//!
//! ```toml
//! language = "ru"
//! poll_interval_secs = 120
//! feeds = ["https://feeds.bbci.co.uk/news/rss.xml"]
//! log_file = "/tmp/livescroll.log"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::i18n;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {message}")]
    Invalid { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interface language tag.
    pub language: String,
    /// Seconds between polls of every followed feed.
    pub poll_interval_secs: u64,
    /// Feeds subscribed to at startup.
    pub feeds: Vec<String>,
    /// Where to write logs.  The `LIVESCROLL_LOG` variable takes precedence.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            poll_interval_secs: 60,
            feeds: Vec::new(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("livescroll-reader").join("config.toml")
    }

    /// Load from `path`, or defaults if there is no file there.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !i18n::is_supported(&self.language) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "language '{}' is not one of {:?}",
                    self.language,
                    i18n::SUPPORTED_LANGUAGES
                ),
            });
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "poll_interval_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
