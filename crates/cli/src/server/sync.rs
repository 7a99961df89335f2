// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fleet-wide sync daemon controller.
//!
//! The daemon is a single well-known screen session whose body periodically
//! flushes every running server's RAM worlds back to disk. Its desired
//! state is never stored: it is a pure predicate over the fleet (ramdisk
//! enabled, some world RAM-resident, some server running), re-evaluated by
//! [`reconcile_sync_daemon`] after every server start and stop. Start and
//! stop of the daemon itself are idempotent, so the daemon's actual state
//! converges on the fleet's state instead of drifting from a cached flag.

use std::fs;
use std::path::{Path, PathBuf};

use mcsm_core::session::shell_quote;
use mcsm_core::{ScreenSession, Session};

use crate::config::Config;
use crate::error::Result;
use crate::server;
use crate::world::RAM_MARKER;

/// Well-known session name of the fleet sync daemon.
pub const SYNC_SESSION_NAME: &str = "mcsm-sync";
/// Seconds between daemon flush cycles.
pub const SYNC_INTERVAL_SECS: u64 = 600;

/// Resolve the daemon session by its well-known name.
pub fn sync_session() -> ScreenSession {
    ScreenSession::new(SYNC_SESSION_NAME)
}

// The daemon always belongs to the invoking user, never a server owner.
pub fn is_sync_daemon_running() -> bool {
    sync_session().is_running("")
}

/// Whether any discovered server has a live session.
pub fn any_servers_running(cfg: &Config) -> Result<bool> {
    Ok(server::discover_all(cfg)?.iter().any(|s| s.is_running()))
}

/// Whether any world in the fleet carries the RAM residency marker.
///
/// Scans active world storage directly rather than going through full world
/// discovery; the marker file alone is authoritative.
pub fn any_ram_worlds(cfg: &Config) -> Result<bool> {
    if !cfg.ramdisk_enabled {
        return Ok(false);
    }

    for srv in server::discover_all(cfg)? {
        let storage = srv.world_storage_path();
        let Ok(entries) = fs::read_dir(&storage) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && path.join(RAM_MARKER).exists() {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// The daemon's desired state, derived from the fleet.
///
/// `should_run = ramdisk enabled AND some RAM-resident world AND some
/// running server`.
pub fn sync_daemon_should_run(cfg: &Config) -> Result<bool> {
    if !cfg.ramdisk_enabled {
        return Ok(false);
    }
    if !any_ram_worlds(cfg)? {
        return Ok(false);
    }
    any_servers_running(cfg)
}

/// Bring the daemon's actual state in line with the fleet.
///
/// This is the only place the predicate is evaluated; lifecycle operations
/// call it after every state change.
pub fn reconcile_sync_daemon(cfg: &Config) -> Result<()> {
    let daemon = sync_session();
    reconcile_with(sync_daemon_should_run(cfg)?, &daemon, &cfg.server_storage)
}

pub(crate) fn reconcile_with(
    should_run: bool,
    daemon: &dyn Session,
    workdir: &Path,
) -> Result<()> {
    let running = daemon.is_running("");
    if should_run && !running {
        tracing::info!(interval_secs = SYNC_INTERVAL_SECS, "starting sync daemon");
        daemon.start(workdir, &sync_loop_script(), "")?;
    } else if !should_run && running {
        tracing::info!("stopping sync daemon");
        daemon.kill("")?;
    }
    Ok(())
}

/// Shell body of the daemon: sleep, then flush the whole fleet, forever.
/// Item failures inside the flush never abort the loop.
fn sync_loop_script() -> String {
    let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("mcsm"));
    format!(
        "while true; do\n    sleep {}\n    {} worlds todisk --all 2>/dev/null || true\ndone\n",
        SYNC_INTERVAL_SECS,
        shell_quote(&exe.to_string_lossy())
    )
}

/// Flush one server's RAM worlds to disk, quiescing it if running.
pub fn sync_server_to_disk(name: &str, cfg: &Config) -> Result<()> {
    let srv = server::get(name, cfg)?;
    srv.flush_ram_worlds(cfg)
}

/// Flush every running server's RAM worlds to disk.
///
/// Per-server failures are logged and skipped; one failing flush never
/// prevents the rest of the fleet from being attempted.
pub fn sync_all_servers(cfg: &Config) -> Result<()> {
    for srv in server::discover_all(cfg)? {
        if !srv.is_running() {
            continue;
        }
        if let Err(e) = srv.flush_ram_worlds(cfg) {
            tracing::warn!(server = %srv.name, error = %e, "failed to sync server");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
