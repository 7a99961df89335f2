// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! mcsmrs - library behind the `mcsm` CLI, a supervisor for multiple game
//! servers on one host.
//!
//! # Main Components
//!
//! - [`server`] - server discovery, administration, and the lifecycle state
//!   machine (start / stop with graceful-to-forceful escalation / restart)
//! - [`world`] - world discovery, active/inactive lifecycle, and the
//!   RAM-disk cache (residency markers, mirrors, symlink indirection)
//! - [`server::sync`] - the fleet-wide sync daemon, derived from aggregate
//!   cluster state rather than stored anywhere
//! - [`config`] - global and per-server TOML configuration
//! - [`Error`] - error types for all operations
//!
//! All control of the managed processes happens through named `screen`
//! sessions (see [`mcsm_core::session`]); no process handles are held
//! across invocations.

mod cli;
mod commands;

pub mod config;
pub mod error;
pub mod server;
pub mod world;

pub use cli::{Cli, Command, RamState, ServerCommand, WorldsCommand};
pub use config::Config;
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

/// Execute a parsed CLI invocation.
pub fn run(cli: Cli) -> Result<()> {
    let cfg = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Server { command } => match command {
            ServerCommand::List => commands::server::list(&cfg),
            ServerCommand::Create { name } => commands::server::create(&name, &cfg),
            ServerCommand::Delete { name } => commands::server::delete(&name, &cfg),
            ServerCommand::Rename { old_name, new_name } => {
                commands::server::rename(&old_name, &new_name, &cfg)
            }
        },
        Command::Start { server } => commands::server::start(&server, &cfg),
        Command::Stop { server, now } => commands::server::stop(&server, now, &cfg),
        Command::Restart { server, now } => commands::server::restart(&server, now, &cfg),
        Command::Status { server } => commands::server::status(&server, &cfg),
        Command::Console { server } => commands::server::console(&server, &cfg),
        Command::Cmd { server, command } => commands::server::cmd(&server, &command, &cfg),
        Command::Say { server, message } => commands::server::say(&server, &message, &cfg),
        Command::Worlds { command } => match command {
            WorldsCommand::List { server } => commands::worlds::list(&server, &cfg),
            WorldsCommand::On { server, world } => commands::worlds::activate(&server, &world, &cfg),
            WorldsCommand::Off { server, world } => {
                commands::worlds::deactivate(&server, &world, &cfg)
            }
            WorldsCommand::Ram {
                server,
                world,
                state,
            } => commands::worlds::ram(&server, &world, state, &cfg),
            WorldsCommand::Todisk { server, all } => {
                commands::worlds::todisk(server.as_deref(), all, &cfg)
            }
        },
        Command::Completion { shell } => {
            generate(shell, &mut Cli::command(), "mcsm", &mut std::io::stdout());
            Ok(())
        }
    }
}
