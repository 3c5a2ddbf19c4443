// Licensed under the Apache-2.0 license

use anyhow::{Context, Result};
use asphodel_protocol::{AsphodelError, AsphodelResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Runtime configuration of a device handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Outstanding transactions allowed at once (1..=255)
    pub transaction_table_size: usize,
    /// Deadline of blocking transfers
    pub transfer_timeout_ms: u64,
    /// Deadline of callback transfers, enforced while polling
    pub transaction_timeout_ms: u64,
    /// Longest single poll inside a blocking loop
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            transaction_table_size: 16,
            transfer_timeout_ms: 1000,
            transaction_timeout_ms: 5000,
            poll_interval_ms: 50,
            connect_timeout_ms: 2000,
        }
    }
}

impl DeviceConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: DeviceConfig =
            toml::from_str(contents).with_context(|| "Failed to parse TOML configuration")?;
        config
            .validate()
            .with_context(|| "Invalid device configuration")?;
        Ok(config)
    }

    pub fn validate(&self) -> AsphodelResult<()> {
        if !(1..=255).contains(&self.transaction_table_size) || self.poll_interval_ms == 0 {
            return Err(AsphodelError::BadParameter);
        }
        Ok(())
    }

    pub fn transfer_timeout(&self) -> Duration {
        Duration::from_millis(self.transfer_timeout_ms)
    }

    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_millis(self.transaction_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
