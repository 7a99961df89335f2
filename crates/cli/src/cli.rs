// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "mcsm")]
#[command(about = "Supervise game servers on one host: lifecycle, worlds, RAM-disk caching")]
#[command(
    long_about = "Supervise multiple game servers on one host.\n\n\
    Servers run in detached screen sessions; worlds can be cached on a\n\
    RAM-backed filesystem and are kept coherent with their on-disk copies\n\
    by a fleet-wide sync daemon."
)]
pub struct Cli {
    /// Path to the global config file (default: $MCSM_CONF or /etc/mcsm.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Server administration
    Server {
        #[command(subcommand)]
        command: ServerCommand,
    },

    /// Start a server
    Start { server: String },

    /// Stop a server (no-op if already stopped)
    Stop {
        server: String,

        /// Skip the warning broadcast and stop delay
        #[arg(long)]
        now: bool,
    },

    /// Restart a server, or start it if stopped
    Restart {
        server: String,

        /// Skip the warning broadcast and restart delay
        #[arg(long)]
        now: bool,
    },

    /// Show whether a server is running
    Status { server: String },

    /// Attach to a server console (detach with C-a d)
    Console { server: String },

    /// Send a command to a server console
    Cmd {
        server: String,

        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },

    /// Broadcast a chat message to all players on a server
    Say {
        server: String,

        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },

    /// World management
    Worlds {
        #[command(subcommand)]
        command: WorldsCommand,
    },

    /// Generate shell completions
    Completion { shell: Shell },
}

#[derive(Subcommand)]
pub enum ServerCommand {
    /// List all servers
    List,

    /// Create a new server
    Create { name: String },

    /// Delete a stopped server and all its data
    Delete { name: String },

    /// Rename a stopped server
    Rename { old_name: String, new_name: String },
}

/// Desired RAM residency for `worlds ram`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RamState {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum WorldsCommand {
    /// List all worlds of a server
    List { server: String },

    /// Activate a world (move it into active storage)
    On { server: String, world: String },

    /// Deactivate a world (move it into the inactive archive)
    Off { server: String, world: String },

    /// Show or change a world's RAM residency
    Ram {
        server: String,
        world: String,

        /// New residency; omit to show the current state
        state: Option<RamState>,
    },

    /// Sync RAM worlds back to disk
    Todisk {
        server: Option<String>,

        /// Sync every running server in the fleet
        #[arg(long)]
        all: bool,
    },
}
