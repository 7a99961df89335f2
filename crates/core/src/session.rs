// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Detached console sessions backed by GNU `screen`.
//!
//! A [`ScreenSession`] is an identity-by-name handle: it holds no process
//! handle and re-resolves the session on every call via `screen -ls`. This
//! lets short-lived CLI invocations observe and control sessions started by
//! earlier, unrelated invocations, including the fleet sync daemon.
//!
//! All cross-identity operations transparently switch user through `su`.

use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};
use crate::identity;

/// Contract for a named, detached console session.
///
/// Implementations must be safe to call from any invocation at any time:
/// liveness is always re-queried, never cached.
pub trait Session {
    /// Stable name the session is resolved by.
    fn name(&self) -> &str;

    /// Liveness query by name, evaluated against `user`'s session table.
    /// No side effects.
    fn is_running(&self, user: &str) -> bool;

    /// Spawn the session detached, running `command` in `workdir` as `user`.
    ///
    /// Fails with [`Error::SessionAlreadyRunning`] if a session with this
    /// name already exists.
    fn start(&self, workdir: &Path, command: &str, user: &str) -> Result<()>;

    /// Inject `line`, newline-terminated, into the session's input stream.
    ///
    /// Fails with [`Error::SessionNotRunning`] if the session is absent.
    fn send_line(&self, line: &str, user: &str) -> Result<()>;

    /// Reattach the session to the foreground, blocking until detach.
    fn attach(&self, user: &str) -> Result<()>;

    /// Forceful termination. No-op if the session is not running.
    fn kill(&self, user: &str) -> Result<()>;
}

/// A `screen(1)` session resolved by name on every operation.
#[derive(Debug, Clone)]
pub struct ScreenSession {
    name: String,
}

impl ScreenSession {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Session for ScreenSession {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_running(&self, user: &str) -> bool {
        // screen sockets are per-user; the owner's table must be queried,
        // not the invoker's
        let output = if identity::needs_switch(user) {
            let inner = format!("screen -ls {}", shell_quote(&self.name));
            Command::new("su")
                .args(["-", user, "-s", "/bin/bash", "-c", &inner])
                .output()
        } else {
            Command::new("screen").arg("-ls").arg(&self.name).output()
        };
        match output {
            Ok(out) => lists_session(&String::from_utf8_lossy(&out.stdout), &self.name),
            // screen or su missing: no session can be running
            Err(_) => false,
        }
    }

    fn start(&self, workdir: &Path, command: &str, user: &str) -> Result<()> {
        if self.is_running(user) {
            return Err(Error::SessionAlreadyRunning(self.name.clone()));
        }

        if identity::needs_switch(user) {
            let inner = format!(
                "cd {} && screen -dmS {} bash -c {}",
                shell_quote(&workdir.to_string_lossy()),
                shell_quote(&self.name),
                shell_quote(command)
            );
            return run_as_user(user, &inner);
        }

        tracing::debug!(session = %self.name, %command, "spawning screen session");
        let output = Command::new("screen")
            .args(["-dmS", &self.name, "bash", "-c", command])
            .current_dir(workdir)
            .output()?;
        check_output(format!("screen -dmS {}", self.name), output)
    }

    fn send_line(&self, line: &str, user: &str) -> Result<()> {
        if !self.is_running(user) {
            return Err(Error::SessionNotRunning(self.name.clone()));
        }

        let stuffed = format!("{}\n", line);
        if identity::needs_switch(user) {
            let inner = format!(
                "screen -S {} -p 0 -X stuff {}",
                shell_quote(&self.name),
                shell_quote(&stuffed)
            );
            return run_as_user(user, &inner);
        }

        let output = Command::new("screen")
            .args(["-S", &self.name, "-p", "0", "-X", "stuff", &stuffed])
            .output()?;
        check_output(format!("screen -S {} -X stuff", self.name), output)
    }

    fn attach(&self, user: &str) -> Result<()> {
        if !self.is_running(user) {
            return Err(Error::SessionNotRunning(self.name.clone()));
        }

        let status = if identity::needs_switch(user) {
            let inner = format!("screen -r {}", shell_quote(&self.name));
            Command::new("su")
                .args(["-", user, "-s", "/bin/bash", "-c", &inner])
                .status()?
        } else {
            Command::new("screen").args(["-r", &self.name]).status()?
        };

        if status.success() {
            Ok(())
        } else {
            Err(Error::ExternalTool {
                command: format!("screen -r {}", self.name),
                status: status.to_string(),
                stderr: String::new(),
            })
        }
    }

    fn kill(&self, user: &str) -> Result<()> {
        if !self.is_running(user) {
            return Ok(());
        }

        tracing::debug!(session = %self.name, "killing screen session");
        if identity::needs_switch(user) {
            let inner = format!("screen -S {} -X quit", shell_quote(&self.name));
            return run_as_user(user, &inner);
        }

        let output = Command::new("screen")
            .args(["-S", &self.name, "-X", "quit"])
            .output()?;
        check_output(format!("screen -S {} -X quit", self.name), output)
    }
}

/// Run a shell command as `user`, switching identity through `su` if needed.
pub fn run_as_user(user: &str, command: &str) -> Result<()> {
    let output = spawn_as_user(user, command)?;
    check_output(command.to_string(), output)
}

/// Like [`run_as_user`] but returns captured stdout on success.
pub fn run_as_user_output(user: &str, command: &str) -> Result<String> {
    let output = spawn_as_user(user, command)?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    check_output(command.to_string(), output)?;
    Ok(stdout)
}

fn spawn_as_user(user: &str, command: &str) -> Result<Output> {
    let output = if identity::needs_switch(user) {
        Command::new("su")
            .args(["-", user, "-s", "/bin/bash", "-c", command])
            .output()?
    } else {
        Command::new("bash").args(["-c", command]).output()?
    };
    Ok(output)
}

fn check_output(command: String, output: Output) -> Result<()> {
    if output.status.success() {
        Ok(())
    } else {
        Err(Error::ExternalTool {
            command,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Whether `screen -ls` output lists a session named exactly `name`.
///
/// Session entries look like `\t12345.<name>\t(Detached)`; the name is
/// everything after the first dot of the first field.
fn lists_session(output: &str, name: &str) -> bool {
    output.lines().any(|line| {
        let trimmed = line.trim_start();
        let Some(field) = trimmed.split_whitespace().next() else {
            return false;
        };
        match field.split_once('.') {
            Some((pid, rest)) => !pid.is_empty() && pid.bytes().all(|b| b.is_ascii_digit()) && rest == name,
            None => false,
        }
    })
}

/// Quote `s` for safe interpolation into a `bash -c` string.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
