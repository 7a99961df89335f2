// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::RamState;
use crate::config::Config;
use crate::error::Result;
use crate::server::{self, sync};

pub fn list(server_name: &str, cfg: &Config) -> Result<()> {
    let srv = server::get(server_name, cfg)?;
    let worlds = srv.worlds(cfg)?;

    if worlds.is_empty() {
        println!("No worlds found for server '{}'.", server_name);
        return Ok(());
    }

    println!("{:<24} {:<10} {}", "NAME", "STATUS", "LOCATION");
    for world in worlds {
        let status = if world.active { "active" } else { "inactive" };
        let location = if world.in_ram { "RAM" } else { "disk" };
        println!("{:<24} {:<10} {}", world.name, status, location);
    }
    Ok(())
}

pub fn activate(server_name: &str, world_name: &str, cfg: &Config) -> Result<()> {
    let srv = server::get(server_name, cfg)?;
    let mut world = srv.world(world_name, cfg)?;
    world.activate(&srv.config.world_storage)?;
    println!("Activated world '{}' for server '{}'", world_name, server_name);
    Ok(())
}

pub fn deactivate(server_name: &str, world_name: &str, cfg: &Config) -> Result<()> {
    let srv = server::get(server_name, cfg)?;
    let mut world = srv.world(world_name, cfg)?;
    world.deactivate(&srv.config.world_storage_inactive)?;
    println!("Deactivated world '{}' for server '{}'", world_name, server_name);
    Ok(())
}

pub fn ram(
    server_name: &str,
    world_name: &str,
    state: Option<RamState>,
    cfg: &Config,
) -> Result<()> {
    let srv = server::get(server_name, cfg)?;
    let mut world = srv.world(world_name, cfg)?;

    match state {
        None => {
            if world.in_ram {
                println!("World '{}' is in RAM", world.name);
                println!("  mirror: {}", world.ram_path.display());
            } else {
                println!("World '{}' is not in RAM", world.name);
            }
        }
        Some(RamState::On) => {
            world.enable_ram(cfg, &srv.config.username)?;
            println!("Enabled RAM residency for world '{}'", world.name);
            println!("Changes take effect after the server is restarted.");
        }
        Some(RamState::Off) => {
            world.disable_ram(cfg, &srv.config.username)?;
            println!("Disabled RAM residency for world '{}'", world.name);
            println!("Changes take effect after the server is restarted.");
        }
    }
    Ok(())
}

pub fn todisk(server_name: Option<&str>, all: bool, cfg: &Config) -> Result<()> {
    match server_name {
        Some(name) if !all => {
            sync::sync_server_to_disk(name, cfg)?;
            println!("Synced RAM worlds of server '{}' to disk", name);
            Ok(())
        }
        // fleet-wide: per-item outcomes are logged, the batch never fails
        _ => {
            sync::sync_all_servers(cfg)?;
            println!("Synced RAM worlds of all running servers to disk");
            Ok(())
        }
    }
}
