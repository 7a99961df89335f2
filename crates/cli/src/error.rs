// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

/// All possible errors that can occur in the mcsmrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("server '{0}' not found")]
    ServerNotFound(String),

    #[error("server '{0}' already exists")]
    ServerExists(String),

    #[error("server '{0}' is running\n  hint: stop it first")]
    ServerRunning(String),

    // Start-when-running is the single intentional non-idempotent guard;
    // it surfaces operator mistakes instead of silently succeeding.
    #[error("server '{0}' is already running")]
    AlreadyRunning(String),

    #[error("server '{0}' is not running")]
    NotRunning(String),

    #[error("world '{0}' not found")]
    WorldNotFound(String),

    #[error("world '{0}' is already active")]
    WorldAlreadyActive(String),

    #[error("world '{0}' is already inactive")]
    WorldAlreadyInactive(String),

    #[error("jar file not found: {}", .0.display())]
    JarNotFound(PathBuf),

    #[error("permission denied: server '{server}' is owned by user '{owner}'\n  hint: run with sudo, or as user '{owner}' (you are '{current}')")]
    PermissionDenied {
        server: String,
        owner: String,
        current: String,
    },

    #[error("ramdisk storage is not enabled\n  hint: set ramdisk_enabled = true in the global config")]
    RamdiskDisabled,

    #[error("world directory exists at {}\n  hint: expected a symlink into worldstorage; move the data aside first", .0.display())]
    WorldSlotOccupied(PathBuf),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Core(#[from] mcsm_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for mcsmrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
