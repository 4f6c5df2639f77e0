//! # Settings
//!
//! Layered settings: defaults, then an optional settings file, then
//! `DAPR_HELPER_*` environment variables.
//!
//! ```toml
//! # dapr-helper.toml
//! remove_dapr_data = true
//! bind_address = "0.0.0.0:3000"
//! definitions_file = "subscriptions.json"
//! ```
//!
//! The settings file path defaults to `dapr-helper.toml` in the working
//! directory and can be moved with `DAPR_HELPER_SETTINGS`. A missing default
//! file is fine; a missing explicit one is an error.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{env, DEFAULT_BIND_ADDRESS, DEFAULT_SETTINGS_FILE};
use crate::error::{DaprError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaprSettings {
    /// Strip descriptors from routes once discovery has recorded them
    pub remove_dapr_data: bool,
    pub bind_address: String,
    /// JSON array of subscription definitions registered at startup
    pub definitions_file: Option<PathBuf>,
}

impl Default for DaprSettings {
    fn default() -> Self {
        Self {
            remove_dapr_data: false,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            definitions_file: None,
        }
    }
}

impl DaprSettings {
    /// Load from the default location (or `DAPR_HELPER_SETTINGS`) and the
    /// environment
    pub fn load() -> Result<Self> {
        match std::env::var(env::SETTINGS_FILE) {
            Ok(path) => Self::load_from(Some(Path::new(&path))),
            Err(_) => Self::load_from(None),
        }
    }

    /// Load with an explicit settings file. `None` means the optional default
    /// file in the working directory.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };

        let settings: DaprSettings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(env::SETTINGS_PREFIX).try_parsing(true))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| DaprError::configuration(format!("Failed to load settings: {e}")))?;

        settings.validate()?;
        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address.parse().map_err(|e| {
            DaprError::configuration(format!(
                "Invalid bind_address '{}': {e}",
                self.bind_address
            ))
        })
    }
}
