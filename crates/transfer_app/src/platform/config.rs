use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use transfer_core::IntervalPolicy;
use transfer_engine::{ClientSettings, DEFAULT_ACTION};
use transfer_logging::transfer_info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    pub webroot: String,
    pub action: String,
    pub poll: PollSection,
    pub client: ClientSection,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            webroot: "http://localhost:8080".to_string(),
            action: DEFAULT_ACTION.to_string(),
            poll: PollSection::default(),
            client: ClientSection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PollSection {
    pub base_interval_ms: u64,
    pub interval_increment_ms: u64,
    /// `None` lets stall backoff grow without bound.
    pub max_interval_ms: Option<u64>,
}

impl Default for PollSection {
    fn default() -> Self {
        let policy = IntervalPolicy::default();
        Self {
            base_interval_ms: millis(policy.base),
            interval_increment_ms: millis(policy.increment),
            max_interval_ms: policy.max.map(millis),
        }
    }
}

impl PollSection {
    pub fn policy(&self) -> IntervalPolicy {
        IntervalPolicy {
            base: Duration::from_millis(self.base_interval_ms),
            increment: Duration::from_millis(self.interval_increment_ms),
            max: self.max_interval_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ClientSection {
    fn default() -> Self {
        let settings = ClientSettings::default();
        Self {
            connect_timeout_ms: millis(settings.connect_timeout),
            request_timeout_ms: millis(settings.request_timeout),
        }
    }
}

impl ClientSection {
    pub fn settings(&self) -> ClientSettings {
        ClientSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

/// Loads the RON config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<TransferConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            transfer_info!("No config at {:?}; using defaults", path);
            return Ok(TransferConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: TransferConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&config)?;

    transfer_info!("Loaded config from {:?}", path);
    Ok(config)
}

fn validate(config: &TransferConfig) -> Result<(), ConfigError> {
    if config.poll.base_interval_ms == 0 {
        return Err(ConfigError::Invalid(
            "poll.base_interval_ms must be greater than 0".to_string(),
        ));
    }
    if config.poll.interval_increment_ms == 0 {
        return Err(ConfigError::Invalid(
            "poll.interval_increment_ms must be greater than 0".to_string(),
        ));
    }
    if config.client.request_timeout_ms == 0 {
        return Err(ConfigError::Invalid(
            "client.request_timeout_ms must be greater than 0".to_string(),
        ));
    }
    if config.webroot.trim().is_empty() {
        return Err(ConfigError::Invalid("webroot must not be empty".to_string()));
    }
    Ok(())
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
