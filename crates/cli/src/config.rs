// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Global and per-server configuration.
//!
//! The global config lives at `/etc/mcsm.toml` (overridable via `$MCSM_CONF`
//! or `--config`) and supplies fleet-wide paths plus per-server defaults.
//! Each server directory may carry a `server.toml` that overrides any of the
//! defaults for that server alone. Configuration is read-only: mcsm never
//! writes back to either file after creation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// Environment variable overriding the global config path.
pub const CONFIG_ENV: &str = "MCSM_CONF";
/// Default location of the global config.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/mcsm.toml";
/// Per-server override file inside the server directory.
pub const SERVER_CONFIG_FILE: &str = "server.toml";

/// Placeholder substituted with the server name in session-name templates.
pub const SERVER_NAME_PLACEHOLDER: &str = "{SERVER_NAME}";

/// Fleet-wide configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory containing one subdirectory per server.
    pub server_storage: PathBuf,
    /// Whether worlds may be cached on the RAM-backed filesystem at all.
    pub ramdisk_enabled: bool,
    /// RAM-backed root; mirrors live at `<root>/<server>/<world>`.
    pub ramdisk_storage: PathBuf,
    /// Defaults applied to every server unless overridden by `server.toml`.
    pub defaults: ServerDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_storage: PathBuf::from("/opt/mcsm/servers"),
            ramdisk_enabled: true,
            ramdisk_storage: PathBuf::from("/dev/shm/mcsm"),
            defaults: ServerDefaults::default(),
        }
    }
}

/// Per-server settings, as defaulted globally.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerDefaults {
    /// OS user owning the server process.
    pub username: String,
    /// Session-name template; `{SERVER_NAME}` is substituted.
    pub session_name: String,
    /// Jar path, relative to the server root unless absolute.
    pub jar_path: String,
    /// Heap size in megabytes, substituted for `{RAM}`.
    pub ram_mb: u32,
    /// Launch command template with `{RAM}` and `{JAR}` placeholders.
    pub invocation: String,
    pub stop_delay_secs: u64,
    pub restart_delay_secs: u64,
    /// Warning broadcast before a graceful stop; `{DELAY}` is substituted.
    pub message_stop: String,
    /// Warning broadcast before a restart; `{DELAY}` is substituted.
    pub message_restart: String,
    /// Active world storage, relative to the server root unless absolute.
    pub world_storage: String,
    /// Archived world storage.
    pub world_storage_inactive: String,
    /// Properties file the level name is read from.
    pub properties_path: String,
}

impl Default for ServerDefaults {
    fn default() -> Self {
        Self {
            username: "minecraft".to_string(),
            session_name: "mcsm-{SERVER_NAME}".to_string(),
            jar_path: "server.jar".to_string(),
            ram_mb: 1024,
            invocation: "java -Xms{RAM}M -Xmx{RAM}M -jar {JAR} nogui".to_string(),
            stop_delay_secs: 10,
            restart_delay_secs: 10,
            message_stop: "SERVER SHUTTING DOWN IN {DELAY} SECONDS!".to_string(),
            message_restart: "SERVER REBOOT IN {DELAY} SECONDS!".to_string(),
            world_storage: "worldstorage".to_string(),
            world_storage_inactive: "worldstorage_inactive".to_string(),
            properties_path: "server.properties".to_string(),
        }
    }
}

/// Optional overrides read from a server's `server.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerOverrides {
    pub username: Option<String>,
    pub session_name: Option<String>,
    pub jar_path: Option<String>,
    pub ram_mb: Option<u32>,
    pub invocation: Option<String>,
    pub stop_delay_secs: Option<u64>,
    pub restart_delay_secs: Option<u64>,
    pub message_stop: Option<String>,
    pub message_restart: Option<String>,
    pub world_storage: Option<String>,
    pub world_storage_inactive: Option<String>,
    pub properties_path: Option<String>,
}

/// Fully resolved settings for one server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub username: String,
    pub session_name: String,
    pub jar_path: String,
    pub ram_mb: u32,
    pub invocation: String,
    pub stop_delay_secs: u64,
    pub restart_delay_secs: u64,
    pub message_stop: String,
    pub message_restart: String,
    pub world_storage: String,
    pub world_storage_inactive: String,
    pub properties_path: String,
}

impl ServerConfig {
    /// Merge global defaults with a server's overrides, substituting the
    /// server name into the session-name template.
    pub fn resolve(name: &str, defaults: &ServerDefaults, over: ServerOverrides) -> Self {
        let session_template = over.session_name.unwrap_or_else(|| defaults.session_name.clone());
        Self {
            username: over.username.unwrap_or_else(|| defaults.username.clone()),
            session_name: session_template.replace(SERVER_NAME_PLACEHOLDER, name),
            jar_path: over.jar_path.unwrap_or_else(|| defaults.jar_path.clone()),
            ram_mb: over.ram_mb.unwrap_or(defaults.ram_mb),
            invocation: over.invocation.unwrap_or_else(|| defaults.invocation.clone()),
            stop_delay_secs: over.stop_delay_secs.unwrap_or(defaults.stop_delay_secs),
            restart_delay_secs: over.restart_delay_secs.unwrap_or(defaults.restart_delay_secs),
            message_stop: over.message_stop.unwrap_or_else(|| defaults.message_stop.clone()),
            message_restart: over
                .message_restart
                .unwrap_or_else(|| defaults.message_restart.clone()),
            world_storage: over
                .world_storage
                .unwrap_or_else(|| defaults.world_storage.clone()),
            world_storage_inactive: over
                .world_storage_inactive
                .unwrap_or_else(|| defaults.world_storage_inactive.clone()),
            properties_path: over
                .properties_path
                .unwrap_or_else(|| defaults.properties_path.clone()),
        }
    }

    /// Load and resolve the configuration for the server at `server_path`.
    ///
    /// A missing `server.toml` is not an error; the defaults apply as-is.
    pub fn load(name: &str, server_path: &Path, defaults: &ServerDefaults) -> Result<Self> {
        let path = server_path.join(SERVER_CONFIG_FILE);
        let over = match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ServerOverrides::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self::resolve(name, defaults, over))
    }
}

impl Config {
    /// Load the global config.
    ///
    /// Resolution order: explicit `path` argument, `$MCSM_CONF`, then
    /// `/etc/mcsm.toml`. A missing file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match std::env::var(CONFIG_ENV) {
                Ok(p) if !p.is_empty() => PathBuf::from(p),
                _ => PathBuf::from(DEFAULT_CONFIG_PATH),
            },
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no global config, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
