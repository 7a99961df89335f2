// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server model and fleet discovery.
//!
//! Servers are identified by their directory name under the fleet storage
//! root and are reconstructed from disk on every invocation; nothing about a
//! server is persisted as an object. The console session is resolved by a
//! deterministic name derived from the server name, so any invocation can
//! control a process spawned by an earlier one.

pub mod lifecycle;
pub mod sync;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use mcsm_core::{identity, ScreenSession, Session};

use crate::config::{Config, ServerConfig, SERVER_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::world;

/// A managed game server, reconstructed from on-disk layout.
pub struct Server {
    pub name: String,
    /// Server root directory.
    pub path: PathBuf,
    pub config: ServerConfig,
    /// Console session, resolved by name on every operation.
    pub session: Box<dyn Session>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("config", &self.config)
            .field("session", &self.session.name())
            .finish()
    }
}

/// Enumerate every server under the fleet storage root.
///
/// Directories whose configuration fails to load are skipped; a missing
/// storage root yields an empty fleet.
pub fn discover_all(cfg: &Config) -> Result<Vec<Server>> {
    let entries = match fs::read_dir(&cfg.server_storage) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut servers = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        match load(&path, &name, cfg) {
            Ok(server) => servers.push(server),
            Err(e) => tracing::warn!(server = %name, error = %e, "skipping unloadable server"),
        }
    }
    Ok(servers)
}

/// Look up one server by name.
pub fn get(name: &str, cfg: &Config) -> Result<Server> {
    let path = cfg.server_storage.join(name);
    if !path.is_dir() {
        return Err(Error::ServerNotFound(name.to_string()));
    }
    load(&path, name, cfg)
}

/// Build a `Server` from its directory, merging `server.toml` overrides
/// over the global defaults.
pub fn load(path: &Path, name: &str, cfg: &Config) -> Result<Server> {
    let server_cfg = ServerConfig::load(name, path, &cfg.defaults)?;
    let session = ScreenSession::new(server_cfg.session_name.clone());
    Ok(Server {
        name: name.to_string(),
        path: path.to_path_buf(),
        config: server_cfg,
        session: Box::new(session),
    })
}

impl Server {
    /// Resolve a path that may be absolute or relative to the server root.
    pub fn full_path(&self, relative: &str) -> PathBuf {
        let p = Path::new(relative);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.path.join(relative)
        }
    }

    pub fn world_storage_path(&self) -> PathBuf {
        self.full_path(&self.config.world_storage)
    }

    pub fn world_storage_inactive_path(&self) -> PathBuf {
        self.full_path(&self.config.world_storage_inactive)
    }

    pub fn jar_path(&self) -> PathBuf {
        self.full_path(&self.config.jar_path)
    }

    pub fn properties_path(&self) -> PathBuf {
        self.full_path(&self.config.properties_path)
    }

    /// Liveness, re-queried from the session by name as the owning user.
    /// Never cached.
    pub fn is_running(&self) -> bool {
        self.session.is_running(&self.config.username)
    }

    /// Operator-facing state: `running` or `stopped`.
    pub fn status(&self) -> &'static str {
        if self.is_running() {
            "running"
        } else {
            "stopped"
        }
    }

    pub fn can_manage(&self) -> bool {
        identity::can_manage(&self.config.username)
    }

    pub fn check_permission(&self) -> Result<()> {
        if self.can_manage() {
            return Ok(());
        }
        Err(Error::PermissionDenied {
            server: self.name.clone(),
            owner: self.config.username.clone(),
            current: identity::current_user(),
        })
    }

    /// Discover this server's worlds, active and inactive.
    pub fn worlds(&self, cfg: &Config) -> Result<Vec<world::World>> {
        world::discover_all(
            &self.path,
            &self.name,
            cfg,
            &self.config.world_storage,
            &self.config.world_storage_inactive,
        )
    }

    /// Look up one of this server's worlds by name.
    pub fn world(&self, name: &str, cfg: &Config) -> Result<world::World> {
        world::get(
            &self.path,
            &self.name,
            name,
            cfg,
            &self.config.world_storage,
            &self.config.world_storage_inactive,
        )
    }
}

/// Create a new server directory with storage dirs and a `server.toml`
/// naming the owning user.
pub fn create(name: &str, cfg: &Config) -> Result<Server> {
    let path = cfg.server_storage.join(name);
    if path.exists() {
        return Err(Error::ServerExists(name.to_string()));
    }

    let owner = if identity::is_root() {
        cfg.defaults.username.clone()
    } else {
        identity::current_user()
    };

    fs::create_dir_all(&path)?;
    fs::create_dir_all(world::storage_root(&path, &cfg.defaults.world_storage))?;
    fs::create_dir_all(world::storage_root(
        &path,
        &cfg.defaults.world_storage_inactive,
    ))?;

    let mut conf = fs::File::create(path.join(SERVER_CONFIG_FILE))?;
    writeln!(conf, "username = \"{}\"", owner)?;

    tracing::info!(server = %name, %owner, "created server");
    load(&path, name, cfg)
}

/// Delete a stopped server and everything under its directory.
pub fn delete(name: &str, cfg: &Config) -> Result<()> {
    let server = get(name, cfg)?;
    server.check_permission()?;
    if server.is_running() {
        return Err(Error::ServerRunning(name.to_string()));
    }
    fs::remove_dir_all(&server.path)?;
    Ok(())
}

/// Rename a stopped server's directory.
pub fn rename(old: &str, new: &str, cfg: &Config) -> Result<()> {
    let server = get(old, cfg)?;

    let new_path = cfg.server_storage.join(new);
    if new_path.exists() {
        return Err(Error::ServerExists(new.to_string()));
    }

    server.check_permission()?;
    if server.is_running() {
        return Err(Error::ServerRunning(old.to_string()));
    }

    fs::rename(&server.path, &new_path)?;
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
