//! Client configuration
//!
//! Settings come from the environment:
//!
//! * `HCI_DEVICE` - controller index, `0` for `hci0` (default `0`)
//! * `HCI_TIMEOUT_MS` - how long to wait for a response, `0` to wait
//!   forever (default `1000`)

use crate::error::Error;
use std::time::Duration;

pub const DEVICE_VAR: &str = "HCI_DEVICE";
pub const TIMEOUT_VAR: &str = "HCI_TIMEOUT_MS";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub device_id: u16,
    /// `None` blocks until the controller answers
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source, unset keys keep defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(DEVICE_VAR) {
            config.device_id = parse_device(&value).ok_or(Error::Config {
                key: DEVICE_VAR,
                value,
            })?;
        }

        if let Some(value) = lookup(TIMEOUT_VAR) {
            let millis: u64 = value.trim().parse().map_err(|_| Error::Config {
                key: TIMEOUT_VAR,
                value: value.clone(),
            })?;
            config.timeout = match millis {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            };
        }

        Ok(config)
    }
}

/// Accepts `0` as well as `hci0`
fn parse_device(value: &str) -> Option<u16> {
    let value = value.trim();
    value.strip_prefix("hci").unwrap_or(value).parse().ok()
}
