// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server lifecycle: start, stop, restart, console access.
//!
//! There are exactly two states, stopped and running; "starting" and
//! "stopping" are transient phases inside a single call. `start` on a
//! running server is a hard failure, `stop`/`restart` on a stopped server
//! are lenient no-ops.
//!
//! Within one `stop` call the ordering is fixed: RAM flush, then the stop
//! command, then the bounded liveness poll with forceful escalation. No
//! ordering is guaranteed across invocations; the flush primitive is
//! idempotent, so a manual stop racing the sync daemon costs at worst a
//! redundant copy.

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::server::{sync, Server};
use crate::world::ramdisk;

/// Bounded window of the graceful-stop liveness poll.
pub const STOP_POLL_ITERATIONS: u32 = 30;
/// Interval between liveness polls.
pub const STOP_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Pause between a stop and the follow-up start during restart.
const RESTART_SETTLE: Duration = Duration::from_secs(2);
/// Pause after `save-all` before reading the RAM copy for flushing.
const FLUSH_SETTLE: Duration = Duration::from_secs(1);

const RAM_PLACEHOLDER: &str = "{RAM}";
const JAR_PLACEHOLDER: &str = "{JAR}";
const DELAY_PLACEHOLDER: &str = "{DELAY}";

/// Substitute RAM size and jar path into the launch template.
pub(crate) fn render_invocation(template: &str, ram_mb: u32, jar: &str) -> String {
    template
        .replace(RAM_PLACEHOLDER, &ram_mb.to_string())
        .replace(JAR_PLACEHOLDER, jar)
}

impl Server {
    /// Start the server.
    ///
    /// Every precondition is checked before any external process is
    /// spawned: permission, not-already-running, a launchable jar, and the
    /// world symlink reconciliation the game process depends on at its own
    /// startup. After a successful spawn the sync-daemon predicate is
    /// re-evaluated; a failure there is logged, never fatal.
    pub fn start(&self, cfg: &Config) -> Result<()> {
        self.check_permission()?;

        if self.is_running() {
            return Err(Error::AlreadyRunning(self.name.clone()));
        }

        self.resolve_jar()?;
        self.setup_world_symlinks()?;
        self.setup_ram_worlds(cfg)?;

        let invocation =
            render_invocation(&self.config.invocation, self.config.ram_mb, &self.config.jar_path);

        tracing::info!(server = %self.name, "starting server");
        self.session
            .start(&self.path, &invocation, &self.config.username)?;

        reconcile_logged(cfg);
        Ok(())
    }

    /// Stop the server; a stopped server is a successful no-op.
    ///
    /// Unless `immediate`, broadcasts the configured warning and waits out
    /// the stop delay first. RAM worlds are flushed to disk while the
    /// server is still running, then the stop command is sent and liveness
    /// is polled for a bounded window before escalating to a forced kill.
    pub fn stop(&self, cfg: &Config, immediate: bool) -> Result<()> {
        self.stop_with_poll(cfg, immediate, STOP_POLL_ITERATIONS, STOP_POLL_INTERVAL)
    }

    pub(crate) fn stop_with_poll(
        &self,
        cfg: &Config,
        immediate: bool,
        iterations: u32,
        interval: Duration,
    ) -> Result<()> {
        self.check_permission()?;

        if !self.is_running() {
            return Ok(());
        }

        if let Err(e) = self.flush_ram_worlds(cfg) {
            tracing::warn!(server = %self.name, error = %e, "RAM flush before stop failed");
        }

        if !immediate {
            let delay = self.config.stop_delay_secs;
            let msg = self
                .config
                .message_stop
                .replace(DELAY_PLACEHOLDER, &delay.to_string());
            if let Err(e) = self.say(&msg) {
                tracing::warn!(server = %self.name, error = %e, "stop warning not delivered");
            }
            thread::sleep(Duration::from_secs(delay));
        }

        self.send_command("stop")?;

        for _ in 0..iterations {
            if !self.is_running() {
                reconcile_logged(cfg);
                return Ok(());
            }
            thread::sleep(interval);
        }

        // Escalation: the poll window elapsed without a voluntary exit.
        // The flush was already attempted above and is not repeated after
        // a forced kill.
        tracing::warn!(server = %self.name, "graceful stop timed out, killing session");
        self.session.kill(&self.config.username)?;

        reconcile_logged(cfg);
        Ok(())
    }

    /// Restart the server; behaves as `start` when it is not running.
    pub fn restart(&self, cfg: &Config, immediate: bool) -> Result<()> {
        self.check_permission()?;

        if self.is_running() {
            if !immediate {
                let delay = self.config.restart_delay_secs;
                let msg = self
                    .config
                    .message_restart
                    .replace(DELAY_PLACEHOLDER, &delay.to_string());
                if let Err(e) = self.say(&msg) {
                    tracing::warn!(server = %self.name, error = %e, "restart warning not delivered");
                }
                thread::sleep(Duration::from_secs(delay));
            }

            // One warning is enough; the inner stop is immediate.
            self.stop(cfg, true)?;
            thread::sleep(RESTART_SETTLE);
        }

        self.start(cfg)
    }

    /// Attach the operator's terminal to the server console.
    pub fn console(&self) -> Result<()> {
        self.check_permission()?;
        if !self.is_running() {
            return Err(Error::NotRunning(self.name.clone()));
        }
        Ok(self.session.attach(&self.config.username)?)
    }

    /// Inject a console command into the server process.
    pub fn send_command(&self, command: &str) -> Result<()> {
        self.check_permission()?;
        Ok(self.session.send_line(command, &self.config.username)?)
    }

    /// Broadcast a chat message to all players.
    pub fn say(&self, message: &str) -> Result<()> {
        self.send_command(&format!("say {}", message))
    }

    pub fn save_all(&self) -> Result<()> {
        self.send_command("save-all")
    }

    pub fn save_off(&self) -> Result<()> {
        self.send_command("save-off")
    }

    pub fn save_on(&self) -> Result<()> {
        self.send_command("save-on")
    }

    /// Resolve the launchable jar.
    ///
    /// Jar acquisition (downloads, mod loaders) is delegated to external
    /// tooling; by the time `start` runs the configured path must exist.
    fn resolve_jar(&self) -> Result<PathBuf> {
        let jar = self.jar_path();
        if !jar.is_file() {
            return Err(Error::JarNotFound(jar));
        }
        Ok(jar)
    }

    /// Level name from the properties file, defaulting to `world`.
    pub(crate) fn level_name(&self) -> String {
        let Ok(contents) = fs::read_to_string(self.properties_path()) else {
            return "world".to_string();
        };
        for line in contents.lines() {
            if let Some(name) = line.trim().strip_prefix("level-name=") {
                return name.to_string();
            }
        }
        "world".to_string()
    }

    /// Ensure the live world slot points into world storage.
    ///
    /// Idempotent: a correct link is left alone, a stale link or an empty
    /// leftover directory is replaced, and a slot holding real data is left
    /// untouched with a warning. RAM-resident worlds repoint this same slot
    /// in [`Server::setup_ram_worlds`] afterwards.
    pub(crate) fn setup_world_symlinks(&self) -> Result<()> {
        let level = self.level_name();
        let target = self.world_storage_path().join(&level);
        if !target.is_dir() {
            return Ok(());
        }

        let slot = self.path.join(&level);
        match fs::symlink_metadata(&slot) {
            Ok(meta) if meta.file_type().is_symlink() => {
                if fs::read_link(&slot).is_ok_and(|t| t == target) {
                    return Ok(());
                }
                fs::remove_file(&slot)?;
            }
            Ok(meta) if meta.is_dir() => {
                if fs::read_dir(&slot)?.next().is_none() {
                    fs::remove_dir(&slot)?;
                } else {
                    tracing::warn!(
                        slot = %slot.display(),
                        "world directory with data in server root, not creating symlink"
                    );
                    return Ok(());
                }
            }
            Ok(_) => {
                tracing::warn!(slot = %slot.display(), "unexpected file in world slot");
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(slot = %slot.display(), target = %target.display(), "creating world symlink");
        ramdisk::symlink_dir(&target, &slot)?;
        Ok(())
    }

    /// Repoint the live slot of every active RAM-resident world at its
    /// mirror. Runs at every start; each step is idempotent.
    pub(crate) fn setup_ram_worlds(&self, cfg: &Config) -> Result<()> {
        if !cfg.ramdisk_enabled {
            return Ok(());
        }

        for world in self.worlds(cfg)? {
            if world.active && world.in_ram_now() {
                tracing::debug!(world = %world.name, server = %self.name, "setting up RAM symlink");
                world.setup_ram_symlink(cfg)?;
            }
        }
        Ok(())
    }

    /// Flush every active RAM-resident world back to disk.
    ///
    /// When the server is running the copy happens inside a quiesce
    /// bracket (save-off, save-all, settle, copy, save-on) so a
    /// self-consistent snapshot is read. Per-world copy failures are
    /// logged and skipped.
    pub(crate) fn flush_ram_worlds(&self, cfg: &Config) -> Result<()> {
        if !cfg.ramdisk_enabled {
            return Ok(());
        }

        let worlds = self.worlds(cfg)?;
        let resident: Vec<_> = worlds
            .iter()
            .filter(|w| w.active && w.in_ram_now())
            .collect();
        if resident.is_empty() {
            return Ok(());
        }

        tracing::info!(server = %self.name, "syncing RAM worlds to disk");

        let running = self.is_running();
        if running {
            if let Err(e) = self.save_off().and_then(|()| self.save_all()) {
                tracing::warn!(server = %self.name, error = %e, "quiesce commands not delivered");
            }
            thread::sleep(FLUSH_SETTLE);
        }

        for world in &resident {
            if let Err(e) = world.to_disk(&self.config.username) {
                tracing::warn!(world = %world.name, error = %e, "failed to sync world to disk");
            }
        }

        if running {
            if let Err(e) = self.save_on() {
                tracing::warn!(server = %self.name, error = %e, "could not re-enable autosave");
            }
        }
        Ok(())
    }
}

/// Re-evaluate the sync-daemon predicate after a state change; failures
/// are logged, never surfaced to the lifecycle caller.
fn reconcile_logged(cfg: &Config) {
    if let Err(e) = sync::reconcile_sync_daemon(cfg) {
        tracing::warn!(error = %e, "sync daemon reconcile failed");
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
