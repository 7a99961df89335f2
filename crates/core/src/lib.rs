// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! mcsm-core - process-control primitives for the mcsm server supervisor.
//!
//! This crate provides the pieces shared by every mcsm invocation:
//!
//! - [`session`] - lookup-by-name handles to detached `screen` sessions
//! - [`identity`] - OS-identity queries and permission checks
//! - [`Error`] - error types for all core operations
//!
//! Sessions are deliberately ownerless: two independent invocations of the
//! CLI resolve the same session by its stable name, so no process handle is
//! ever carried across calls.

pub mod error;
pub mod identity;
pub mod session;

pub use error::{Error, Result};
pub use session::{ScreenSession, Session};
