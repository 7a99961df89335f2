// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::config::Config;
use crate::error::Result;
use crate::server;

pub fn list(cfg: &Config) -> Result<()> {
    let servers = server::discover_all(cfg)?;
    if servers.is_empty() {
        println!("No servers found.");
        return Ok(());
    }

    println!("{:<24} {:<10} {}", "NAME", "STATUS", "OWNER");
    for srv in servers {
        println!("{:<24} {:<10} {}", srv.name, srv.status(), srv.config.username);
    }
    Ok(())
}

pub fn create(name: &str, cfg: &Config) -> Result<()> {
    let srv = server::create(name, cfg)?;
    println!("Created server '{}' at {}", name, srv.path.display());
    Ok(())
}

pub fn delete(name: &str, cfg: &Config) -> Result<()> {
    server::delete(name, cfg)?;
    println!("Deleted server '{}'", name);
    Ok(())
}

pub fn rename(old: &str, new: &str, cfg: &Config) -> Result<()> {
    server::rename(old, new, cfg)?;
    println!("Renamed server '{}' to '{}'", old, new);
    Ok(())
}

pub fn start(name: &str, cfg: &Config) -> Result<()> {
    let srv = server::get(name, cfg)?;
    srv.start(cfg)?;
    println!("Started server '{}'", name);
    Ok(())
}

pub fn stop(name: &str, now: bool, cfg: &Config) -> Result<()> {
    let srv = server::get(name, cfg)?;
    srv.stop(cfg, now)?;
    println!("Stopped server '{}'", name);
    Ok(())
}

pub fn restart(name: &str, now: bool, cfg: &Config) -> Result<()> {
    let srv = server::get(name, cfg)?;
    srv.restart(cfg, now)?;
    println!("Restarted server '{}'", name);
    Ok(())
}

pub fn status(name: &str, cfg: &Config) -> Result<()> {
    let srv = server::get(name, cfg)?;
    println!("{}", srv.status());
    Ok(())
}

pub fn console(name: &str, cfg: &Config) -> Result<()> {
    let srv = server::get(name, cfg)?;
    srv.console()
}

pub fn cmd(name: &str, parts: &[String], cfg: &Config) -> Result<()> {
    let srv = server::get(name, cfg)?;
    srv.send_command(&parts.join(" "))
}

pub fn say(name: &str, parts: &[String], cfg: &Config) -> Result<()> {
    let srv = server::get(name, cfg)?;
    srv.say(&parts.join(" "))
}
