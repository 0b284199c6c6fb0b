//! Daemon configuration loading.
//!
//! lacpd reads a JSON file describing the aggregation ports it should run
//! receive machines for. Per-port fields mirror [`ActorConfig`]; omitted
//! fields take the standard defaults.

use lacp_sm::{ActorConfig, DefaultPolicy};
use lacp_types::MacAddress;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating the daemon configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not read the config file.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// The path that failed.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for the expected schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A semantic constraint was violated.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// One aggregation port entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PortConfig {
    /// Port name (e.g. "lag0/1").
    pub name: String,
    /// System MAC address.
    pub mac: MacAddress,
    /// Port number, unique within the system; zero is reserved.
    pub port_number: u16,
    /// System priority.
    #[serde(default = "defaults::system_priority")]
    pub system_priority: u16,
    /// Port priority.
    #[serde(default = "defaults::port_priority")]
    pub port_priority: u16,
    /// Operational key; defaults to the port number.
    #[serde(default)]
    pub key: Option<u16>,
    /// Active vs passive mode.
    #[serde(default = "defaults::active")]
    pub active: bool,
    /// Short-timeout preference.
    #[serde(default)]
    pub fast_timeouts: bool,
    /// Administrative-default partner policy.
    #[serde(default)]
    pub default_policy: DefaultPolicy,
}

mod defaults {
    pub fn system_priority() -> u16 {
        0x8000
    }

    pub fn port_priority() -> u16 {
        0x80
    }

    pub fn active() -> bool {
        true
    }
}

impl PortConfig {
    /// Converts this entry into the state machine's actor config.
    pub fn actor_config(&self) -> ActorConfig {
        let mut config = ActorConfig::new(self.name.clone(), self.mac, self.port_number);
        config.system_priority = self.system_priority;
        config.port_priority = self.port_priority;
        config.key = self.key.unwrap_or(self.port_number);
        config.active = self.active;
        config.fast_timeouts = self.fast_timeouts;
        config
    }
}

/// Top-level daemon configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Ports to run receive machines for.
    pub ports: Vec<PortConfig>,
}

impl DaemonConfig {
    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<DaemonConfig, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: DaemonConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks semantic constraints: at least one port, unique names and
    /// port numbers, no reserved port number zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ports.is_empty() {
            return Err(ConfigError::Invalid("no ports configured".into()));
        }
        for (i, port) in self.ports.iter().enumerate() {
            if port.port_number == 0 {
                return Err(ConfigError::Invalid(format!(
                    "port '{}': port number 0 is reserved",
                    port.name
                )));
            }
            for other in &self.ports[..i] {
                if other.name == port.name {
                    return Err(ConfigError::Invalid(format!(
                        "duplicate port name '{}'",
                        port.name
                    )));
                }
                if other.port_number == port.port_number {
                    return Err(ConfigError::Invalid(format!(
                        "duplicate port number {} ('{}' and '{}')",
                        port.port_number, other.name, port.name
                    )));
                }
            }
        }
        Ok(())
    }
}
