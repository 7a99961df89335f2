// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! World discovery and lifecycle.
//!
//! A world's data lives authoritatively in one of two storage directories
//! under the server root: the active storage (wired into the server's live
//! world slot) or the inactive archive. Orthogonally to that, a world may be
//! RAM-resident: a zero-content marker file inside its on-disk directory is
//! the sole durable record of residency, and the RAM copy is only ever a
//! cache layer on top of the disk copy.
//!
//! `World` values are reconstructed from disk on every invocation and never
//! persisted; the `in_ram` field is a snapshot of the marker taken at
//! discovery time. Operations that depend on residency re-read the marker.

pub mod ramdisk;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};

/// Name of the zero-content residency marker inside a world directory.
pub const RAM_MARKER: &str = "in_ram";

/// A world as discovered on disk.
#[derive(Debug)]
pub struct World {
    pub name: String,
    /// On-disk directory. Always the authoritative copy.
    pub path: PathBuf,
    pub server_name: String,
    pub server_path: PathBuf,
    /// Whether the world sits in active storage (wired into the live slot).
    pub active: bool,
    /// Residency snapshot from discovery; see [`World::in_ram_now`].
    pub in_ram: bool,
    /// RAM mirror location: `<ramdisk>/<server>/<world>`.
    pub ram_path: PathBuf,
}

/// Resolve a storage dir that may be absolute or relative to the server root.
pub(crate) fn storage_root(server_path: &Path, storage: &str) -> PathBuf {
    let p = Path::new(storage);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        server_path.join(storage)
    }
}

/// Discover every world of one server, active storage first.
pub fn discover_all(
    server_path: &Path,
    server_name: &str,
    cfg: &Config,
    world_storage: &str,
    world_storage_inactive: &str,
) -> Result<Vec<World>> {
    let mut worlds = discover_in_dir(server_path, server_name, cfg, world_storage, true)?;
    worlds.extend(discover_in_dir(
        server_path,
        server_name,
        cfg,
        world_storage_inactive,
        false,
    )?);
    Ok(worlds)
}

fn discover_in_dir(
    server_path: &Path,
    server_name: &str,
    cfg: &Config,
    storage: &str,
    active: bool,
) -> Result<Vec<World>> {
    let root = storage_root(server_path, storage);
    let entries = match fs::read_dir(&root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut worlds = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        // worlds are directories; stray files in storage are ignored
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        worlds.push(World::new(name, path, server_name, server_path, active, cfg));
    }
    Ok(worlds)
}

/// Look up one world by name, searching active then inactive storage.
pub fn get(
    server_path: &Path,
    server_name: &str,
    world_name: &str,
    cfg: &Config,
    world_storage: &str,
    world_storage_inactive: &str,
) -> Result<World> {
    let active_path = storage_root(server_path, world_storage).join(world_name);
    if active_path.is_dir() {
        return Ok(World::new(
            world_name.to_string(),
            active_path,
            server_name,
            server_path,
            true,
            cfg,
        ));
    }

    let inactive_path = storage_root(server_path, world_storage_inactive).join(world_name);
    if inactive_path.is_dir() {
        return Ok(World::new(
            world_name.to_string(),
            inactive_path,
            server_name,
            server_path,
            false,
            cfg,
        ));
    }

    Err(Error::WorldNotFound(world_name.to_string()))
}

impl World {
    fn new(
        name: String,
        path: PathBuf,
        server_name: &str,
        server_path: &Path,
        active: bool,
        cfg: &Config,
    ) -> Self {
        let ram_path = cfg.ramdisk_storage.join(server_name).join(&name);
        let in_ram = path.join(RAM_MARKER).exists();
        Self {
            name,
            path,
            server_name: server_name.to_string(),
            server_path: server_path.to_path_buf(),
            active,
            in_ram,
            ram_path,
        }
    }

    /// Path of the residency marker file.
    pub fn marker_path(&self) -> PathBuf {
        self.path.join(RAM_MARKER)
    }

    /// Re-read residency from the marker file.
    ///
    /// The marker is the source of truth; the `in_ram` field is only a
    /// snapshot and must not be trusted across process boundaries.
    pub fn in_ram_now(&self) -> bool {
        self.marker_path().exists()
    }

    /// Live slot this world occupies in the server root when active.
    pub fn live_slot(&self) -> PathBuf {
        self.server_path.join(&self.name)
    }

    /// Move an inactive world into active storage.
    pub fn activate(&mut self, world_storage: &str) -> Result<()> {
        if self.active {
            return Err(Error::WorldAlreadyActive(self.name.clone()));
        }

        let active_root = storage_root(&self.server_path, world_storage);
        fs::create_dir_all(&active_root)?;

        let new_path = active_root.join(&self.name);
        fs::rename(&self.path, &new_path)?;

        self.path = new_path;
        self.active = true;
        Ok(())
    }

    /// Move an active world into the inactive archive.
    pub fn deactivate(&mut self, world_storage_inactive: &str) -> Result<()> {
        if !self.active {
            return Err(Error::WorldAlreadyInactive(self.name.clone()));
        }

        let inactive_root = storage_root(&self.server_path, world_storage_inactive);
        fs::create_dir_all(&inactive_root)?;

        let new_path = inactive_root.join(&self.name);
        fs::rename(&self.path, &new_path)?;

        self.path = new_path;
        self.active = false;
        Ok(())
    }

    /// Operator-facing status: `active`/`inactive`, suffixed `, in RAM`.
    pub fn status(&self) -> String {
        let mut status = if self.active { "active" } else { "inactive" }.to_string();
        if self.in_ram {
            status.push_str(", in RAM");
        }
        status
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
