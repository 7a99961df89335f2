// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! RAM-disk residency for worlds.
//!
//! Enabling residency creates the marker file, mirrors the world into the
//! RAM root and registers the RAM root in the server's symlink allow-list;
//! the live path binding only changes at the next server start, when
//! [`World::setup_ram_symlink`] repoints the live slot into the mirror.
//!
//! The mirror copy is one-directional and non-destructive: the disk copy is
//! always valid and complete except during an in-flight copy, and the RAM
//! copy is never required for correctness. Both the graceful-stop flush and
//! the sync daemon go through [`mirror_copy`], so a manual stop racing a
//! periodic flush costs at worst a redundant copy.

use std::fs;
use std::io::Write;
use std::path::Path;

use mcsm_core::{identity, session};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::world::{World, RAM_MARKER};

/// Allow-list of symlink-target prefixes honoured by the server process.
pub const ALLOWED_SYMLINKS_FILE: &str = "allowed_symlinks.txt";

impl World {
    /// Enable RAM residency: marker, mirror, allow-list entry.
    ///
    /// Idempotent: re-running refreshes the mirror. The live slot is not
    /// touched here; a restart is required for the binding to change.
    pub fn enable_ram(&mut self, cfg: &Config, user: &str) -> Result<()> {
        if !cfg.ramdisk_enabled {
            return Err(Error::RamdiskDisabled);
        }

        fs::File::create(self.marker_path())?;
        fs::create_dir_all(&self.ram_path)?;
        self.in_ram = true;
        self.to_ram(user)?;
        ensure_allowed_symlink(&self.server_path, &cfg.ramdisk_storage)?;

        tracing::info!(world = %self.name, server = %self.server_name, "RAM residency enabled");
        Ok(())
    }

    /// Disable RAM residency: flush, remove marker, remove mirror,
    /// drop the allow-list entry. No-op when the marker is absent.
    pub fn disable_ram(&mut self, cfg: &Config, user: &str) -> Result<()> {
        if !self.in_ram_now() {
            self.in_ram = false;
            return Ok(());
        }

        self.to_disk(user)?;

        match fs::remove_file(self.marker_path()) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        if self.ram_path.exists() {
            fs::remove_dir_all(&self.ram_path)?;
        }
        remove_allowed_symlink(&self.server_path, &cfg.ramdisk_storage)?;
        self.in_ram = false;

        tracing::info!(world = %self.name, server = %self.server_name, "RAM residency disabled");
        Ok(())
    }

    /// Mirror the on-disk world into its RAM directory.
    pub fn to_ram(&self, user: &str) -> Result<()> {
        mirror_copy(&self.path, &self.ram_path, user)
    }

    /// Mirror the RAM copy back to disk.
    ///
    /// Residency is re-read from the marker file; disk-only worlds and
    /// worlds whose mirror has not been populated yet are a no-op.
    pub fn to_disk(&self, user: &str) -> Result<()> {
        if !self.in_ram_now() || !self.ram_path.exists() {
            return Ok(());
        }
        mirror_copy(&self.ram_path, &self.path, user)
    }

    /// Point the live slot at the RAM mirror, idempotently.
    ///
    /// The live world slot itself becomes the symlink when RAM-resident
    /// (single indirection). A correct existing link is left alone; a stale
    /// link is replaced; a real directory in the slot is an error, since the
    /// world's data belongs in worldstorage.
    pub fn setup_ram_symlink(&self, cfg: &Config) -> Result<()> {
        if !cfg.ramdisk_enabled || !self.in_ram_now() {
            return Ok(());
        }

        ensure_allowed_symlink(&self.server_path, &cfg.ramdisk_storage)?;

        let slot = self.live_slot();
        if let Ok(target) = fs::read_link(&slot) {
            if target == self.ram_path {
                return Ok(());
            }
            fs::remove_file(&slot)?;
        } else if slot.is_dir() {
            return Err(Error::WorldSlotOccupied(slot));
        }

        tracing::debug!(
            world = %self.name,
            slot = %slot.display(),
            target = %self.ram_path.display(),
            "creating RAM symlink"
        );
        symlink_dir(&self.ram_path, &slot)?;
        Ok(())
    }
}

/// One-directional, non-destructive mirror of `src` into `dst`, excluding
/// the residency marker. Safe to invoke repeatedly; an interrupted copy
/// leaves both sides intact beyond requiring a re-run.
///
/// Cross-identity copies go through `rsync` under `su`; same-identity copies
/// are performed natively.
pub fn mirror_copy(src: &Path, dst: &Path, user: &str) -> Result<()> {
    if identity::needs_switch(user) {
        let command = format!(
            "rsync -rt --exclude '{}' '{}/' '{}'",
            RAM_MARKER,
            src.display(),
            dst.display()
        );
        return Ok(session::run_as_user(user, &command)?);
    }

    fs::create_dir_all(dst)?;
    copy_tree(src, dst)?;
    Ok(())
}

fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy() == RAM_MARKER {
            continue;
        }

        let from = entry.path();
        let to = dst.join(&name);
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            fs::create_dir_all(&to)?;
            copy_tree(&from, &to)?;
        } else if file_type.is_file() {
            fs::copy(&from, &to)?;
        }
        // symlinks and special files inside worlds are not mirrored
    }
    Ok(())
}

/// Allow-list entry for a RAM root: a `prefix` keyed path line.
fn allowed_entry(ramdisk_root: &Path) -> String {
    format!("prefix{}", ramdisk_root.display())
}

/// Append the RAM root to the server's symlink allow-list if absent.
pub fn ensure_allowed_symlink(server_path: &Path, ramdisk_root: &Path) -> Result<()> {
    let file = server_path.join(ALLOWED_SYMLINKS_FILE);
    let entry = allowed_entry(ramdisk_root);

    let mut lines: Vec<String> = match fs::read_to_string(&file) {
        Ok(contents) => contents.lines().map(str::to_string).collect(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    if lines.iter().any(|line| line == &entry) {
        return Ok(());
    }
    lines.push(entry);

    let mut out = fs::File::create(&file)?;
    for line in &lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Remove the RAM root from the allow-list, deleting the file when empty.
pub fn remove_allowed_symlink(server_path: &Path, ramdisk_root: &Path) -> Result<()> {
    let file = server_path.join(ALLOWED_SYMLINKS_FILE);
    let entry = allowed_entry(ramdisk_root);

    let contents = match fs::read_to_string(&file) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    let lines: Vec<&str> = contents
        .lines()
        .filter(|line| *line != entry.as_str())
        .collect();

    if lines.is_empty() {
        fs::remove_file(&file)?;
        return Ok(());
    }

    let mut out = fs::File::create(&file)?;
    for line in &lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(unix)]
pub(crate) fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
pub(crate) fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(test)]
#[path = "ramdisk_tests.rs"]
mod tests;
