// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Anchor crate for the CLI specs under `cli/`.
//!
//! The files under `cli/` are compiled as integration tests of the `mcsm` package
//! (see its `[[test]]` entries); this crate only holds their shared layout
//! inside the workspace.
