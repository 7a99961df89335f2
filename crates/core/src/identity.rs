// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! OS-identity queries used for permission checks and privilege switching.
//!
//! Servers are owned by an OS user; an invocation may manage a server only
//! when it is root or already running as that user. Every cross-identity
//! operation goes through `su`, so these helpers only ever need to answer
//! "who am I" and "am I allowed".

/// Whether the current process runs with root privileges.
#[cfg(unix)]
pub fn is_root() -> bool {
    nix::unistd::Uid::effective().is_root()
}

#[cfg(not(unix))]
pub fn is_root() -> bool {
    false
}

/// Name of the user this process runs as.
///
/// Prefers `$USER`, falling back to a passwd lookup of the effective uid.
/// Returns an empty string when neither source is available.
pub fn current_user() -> String {
    if let Ok(user) = std::env::var("USER") {
        if !user.is_empty() {
            return user;
        }
    }
    lookup_effective_user().unwrap_or_default()
}

#[cfg(unix)]
fn lookup_effective_user() -> Option<String> {
    nix::unistd::User::from_uid(nix::unistd::Uid::effective())
        .ok()
        .flatten()
        .map(|u| u.name)
}

#[cfg(not(unix))]
fn lookup_effective_user() -> Option<String> {
    None
}

/// Whether the current process may act on behalf of `target` user.
///
/// Root can manage anyone; an empty target means "no owner configured" and
/// is always manageable; otherwise the identities must match.
pub fn can_manage(target: &str) -> bool {
    if is_root() {
        return true;
    }
    if target.is_empty() {
        return true;
    }
    current_user() == target
}

/// Whether acting as `target` requires a privilege switch through `su`.
pub fn needs_switch(target: &str) -> bool {
    !target.is_empty() && current_user() != target
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
