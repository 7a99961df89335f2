// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for mcsm-core operations.

use thiserror::Error;

/// All possible errors that can occur in mcsm-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("session '{0}' is not running")]
    SessionNotRunning(String),

    #[error("session '{0}' is already running")]
    SessionAlreadyRunning(String),

    #[error("external command failed: {command} ({status}){}", fmt_stderr(.stderr))]
    ExternalTool {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn fmt_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n  {}", trimmed)
    }
}

/// A specialized Result type for mcsm-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
