/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

//! Configuration for a [`Stage`](crate::stage::Stage).
//!
//! Every section is `#[serde(default)]`, so a config file only needs the keys it
//! changes:
//!
//! ```toml
//! [bus]
//! max_concurrent_handlers = 64
//! unrouted_policy = "ignore"
//!
//! [pulsar]
//! component_interval_us = 8333
//!
//! [tracing]
//! level = "debug"
//! log_to_file = true
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use theater_core::prelude::{BusConfig, PulsarConfig};
use tracing::{error, info};

use crate::error::StageError;

const CONFIG_FILE: &str = "config.toml";
const XDG_PREFIX: &str = "theater";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TheaterConfig {
    /// Message bus settings.
    pub bus: BusConfig,
    /// Pulsar intervals.
    pub pulsar: PulsarConfig,
    /// Timeouts.
    pub timeouts: TimeoutConfig,
    /// Logging settings.
    pub tracing: TracingConfig,
}

/// Timeouts used by the stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound for [`Stage::shutdown`](crate::stage::Stage::shutdown).
    pub shutdown_timeout_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_ms: 5_000,
        }
    }
}

/// Settings for [`init_tracing`](crate::logging::init_tracing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Write to a daily rolling file instead of stderr.
    pub log_to_file: bool,
    /// Directory for log files.
    pub log_directory: String,
    /// File name prefix for log files.
    pub log_file_prefix: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_directory: "logs".to_string(),
            log_file_prefix: "theater".to_string(),
        }
    }
}

impl TheaterConfig {
    /// Shutdown timeout as a `Duration`.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.shutdown_timeout_ms)
    }

    /// Loads `$XDG_CONFIG_HOME/theater/config.toml`.
    ///
    /// Never fails: a missing file yields defaults, and an unreadable or malformed
    /// file is logged and also yields defaults.
    pub fn load() -> Self {
        let xdg_dirs = match xdg::BaseDirectories::with_prefix(XDG_PREFIX) {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        match xdg_dirs.find_config_file(CONFIG_FILE) {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Self::load_from_path(&path).unwrap_or_else(|e| {
                    error!("{}; using defaults", e);
                    Self::default()
                })
            }
            None => {
                info!("No configuration file found, using defaults");
                Self::default()
            }
        }
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// [`StageError::Config`] if the file cannot be read or is not valid TOML for
    /// this structure.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, StageError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| StageError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| StageError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// [`StageError::Config`] if `contents` is not valid TOML for this structure.
    pub fn from_toml_str(contents: &str) -> Result<Self, StageError> {
        toml::from_str(contents).map_err(|e| StageError::Config {
            path: "<inline>".into(),
            reason: e.to_string(),
        })
    }
}
