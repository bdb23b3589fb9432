//! Client settings
//!
//! Supports loading settings from (in order of priority):
//! 1. client.json in the Vapor config directory
//! 2. Runtime environment variables
//! 3. Built-in defaults

use log::warn;
use serde::{Deserialize, Serialize};

use crate::inbox::DEFAULT_POLL_INTERVAL_SECS;
use crate::provider::ProviderClient;

/// Settings filename in the Vapor config directory
const CLIENT_FILE: &str = "client.json";

/// Settings for the provider client and the poll loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Provider API base URL
    pub base_url: String,
    /// Seconds between automatic inbox polls
    pub poll_interval_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: ProviderClient::DEFAULT_BASE_URL.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl ClientConfig {
    /// Load settings using the priority chain above.
    ///
    /// Settings are always usable: unreadable files and invalid
    /// environment values are logged and skipped, never fatal.
    pub fn load() -> Self {
        let mut cfg = if config::config_exists(CLIENT_FILE) {
            match config::load_json::<ClientConfig>(CLIENT_FILE) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("Ignoring unreadable client settings: {:#}", e);
                    ClientConfig::default()
                }
            }
        } else {
            ClientConfig::default()
        };

        if let Ok(url) = std::env::var("VAPOR_BASE_URL")
            && !url.is_empty()
        {
            cfg.base_url = url;
        }

        if let Ok(raw) = std::env::var("VAPOR_POLL_INTERVAL") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => cfg.poll_interval_secs = secs,
                _ => warn!("Ignoring invalid VAPOR_POLL_INTERVAL: {}", raw),
            }
        }

        cfg
    }
}
