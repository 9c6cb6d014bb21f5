// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

//! Client configuration and daemon socket discovery

use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// System-wide socket location (system-mode daemon).
const SYSTEM_SOCKET: &str = "/run/hub-provider/hub-provider.sock";

fn default_io_timeout_ms() -> u64 {
    2500
}

fn default_poll_interval_ms() -> u64 {
    1000
}

/// Client configuration for connecting to the provider daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Explicit socket path override (optional)
    #[serde(default)]
    pub socket_path: String,

    /// Read/write timeout for each daemon call, in milliseconds
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,

    /// Status poll cadence, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket_path: String::new(),
            io_timeout_ms: default_io_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ClientConfig {
    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Resolve the daemon socket path.
    ///
    /// Checks locations in priority order:
    /// 1. Explicit path in `socket_path` (if absolute or relative path)
    /// 2. User runtime directory (/run/user/<uid>/hub-provider/hub-provider.sock)
    /// 3. System-wide location (/run/hub-provider/hub-provider.sock)
    pub fn resolve_socket_path(&self) -> Result<PathBuf> {
        let candidate = self.socket_path.trim();
        if !candidate.is_empty()
            && (candidate.starts_with('/')
                || candidate.starts_with("./")
                || candidate.starts_with("../"))
        {
            return Ok(PathBuf::from(candidate));
        }

        if let Some(runtime_dir) = dirs::runtime_dir() {
            let socket_dir = if runtime_dir.file_name() == Some(OsStr::new("hub-provider")) {
                runtime_dir
            } else {
                runtime_dir.join("hub-provider")
            };
            let user_socket = socket_dir.join("hub-provider.sock");
            if user_socket.exists() {
                return Ok(user_socket);
            }
        }

        let system_socket = PathBuf::from(SYSTEM_SOCKET);
        if system_socket.exists() {
            return Ok(system_socket);
        }

        // Neither exists yet; default to the user location so a daemon
        // started later is picked up without reconfiguration.
        dirs::runtime_dir()
            .map(|runtime_dir| runtime_dir.join("hub-provider").join("hub-provider.sock"))
            .ok_or_else(|| {
                Error::Config(
                    "could not determine runtime directory and no system socket found".to_string(),
                )
            })
    }
}

/// Get the client config file path (~/.config/hub-provider/cli.toml)
pub fn client_config_path() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .ok_or_else(|| Error::Config("could not determine config directory".to_string()))?
        .join("hub-provider")
        .join("cli.toml");
    Ok(path)
}

/// Load client configuration from the config file, falling back to
/// defaults when the file does not exist.
pub fn load_client_config() -> Result<ClientConfig> {
    let config_path = client_config_path()?;
    if !config_path.exists() {
        return Ok(ClientConfig::default());
    }

    let contents = std::fs::read_to_string(&config_path)?;
    let config: ClientConfig = toml::from_str(&contents)?;
    Ok(config)
}
