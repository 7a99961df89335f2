// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `mcsm worlds` commands: activation, RAM residency,
//! and the disk sync entry points.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn init_temp() -> (TempDir, PathBuf) {
    init_temp_with_ramdisk(true)
}

fn init_temp_with_ramdisk(enabled: bool) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let storage = temp.path().join("servers");
    let ramdisk = temp.path().join("ramdisk");
    fs::create_dir_all(&storage).unwrap();

    let conf = temp.path().join("mcsm.toml");
    fs::write(
        &conf,
        format!(
            "server_storage = \"{}\"\n\
             ramdisk_enabled = {}\n\
             ramdisk_storage = \"{}\"\n\n\
             [defaults]\n\
             username = \"\"\n\
             stop_delay_secs = 0\n\
             restart_delay_secs = 0\n",
            storage.display(),
            enabled,
            ramdisk.display()
        ),
    )
    .unwrap();
    (temp, conf)
}

fn mcsm(conf: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("mcsm");
    cmd.env("MCSM_CONF", conf);
    cmd
}

fn create_server(conf: &Path, name: &str) {
    mcsm(conf).args(["server", "create", name]).assert().success();
}

fn create_world(temp: &TempDir, server: &str, world: &str) -> PathBuf {
    let path = temp
        .path()
        .join("servers")
        .join(server)
        .join("worldstorage")
        .join(world);
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("level.dat"), b"level data").unwrap();
    path
}

#[test]
fn list_with_no_worlds() {
    let (_temp, conf) = init_temp();
    create_server(&conf, "alpha");

    mcsm(&conf)
        .args(["worlds", "list", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No worlds found for server 'alpha'."));
}

#[test]
fn list_for_unknown_server_fails() {
    let (_temp, conf) = init_temp();
    mcsm(&conf)
        .args(["worlds", "list", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn list_shows_disk_worlds_as_active() {
    let (temp, conf) = init_temp();
    create_server(&conf, "alpha");
    create_world(&temp, "alpha", "overworld");

    mcsm(&conf)
        .args(["worlds", "list", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("overworld"))
        .stdout(predicate::str::contains("active"))
        .stdout(predicate::str::contains("disk"));
}

#[test]
fn off_archives_and_on_restores_a_world() {
    let (temp, conf) = init_temp();
    create_server(&conf, "alpha");
    create_world(&temp, "alpha", "overworld");
    let server = temp.path().join("servers").join("alpha");

    mcsm(&conf)
        .args(["worlds", "off", "alpha", "overworld"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deactivated world 'overworld'"));
    assert!(server.join("worldstorage_inactive").join("overworld").is_dir());
    assert!(!server.join("worldstorage").join("overworld").exists());

    mcsm(&conf)
        .args(["worlds", "on", "alpha", "overworld"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Activated world 'overworld'"));
    assert!(server.join("worldstorage").join("overworld").is_dir());
}

#[test]
fn off_twice_fails() {
    let (temp, conf) = init_temp();
    create_server(&conf, "alpha");
    create_world(&temp, "alpha", "overworld");

    mcsm(&conf).args(["worlds", "off", "alpha", "overworld"]).assert().success();
    mcsm(&conf)
        .args(["worlds", "off", "alpha", "overworld"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already inactive"));
}

#[test]
fn ram_on_creates_marker_mirror_and_allowlist() {
    let (temp, conf) = init_temp();
    create_server(&conf, "alpha");
    let world = create_world(&temp, "alpha", "overworld");

    mcsm(&conf)
        .args(["worlds", "ram", "alpha", "overworld", "on"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Enabled RAM residency"))
        .stdout(predicate::str::contains("restarted"));

    assert!(world.join("in_ram").is_file());

    let mirror = temp.path().join("ramdisk").join("alpha").join("overworld");
    assert_eq!(fs::read(mirror.join("level.dat")).unwrap(), b"level data");
    assert!(!mirror.join("in_ram").exists());

    let allowlist = temp
        .path()
        .join("servers")
        .join("alpha")
        .join("allowed_symlinks.txt");
    let contents = fs::read_to_string(allowlist).unwrap();
    assert!(contents.contains(&format!("prefix{}", temp.path().join("ramdisk").display())));
}

#[test]
fn ram_without_state_reports_residency() {
    let (temp, conf) = init_temp();
    create_server(&conf, "alpha");
    create_world(&temp, "alpha", "overworld");

    mcsm(&conf)
        .args(["worlds", "ram", "alpha", "overworld"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is not in RAM"));

    mcsm(&conf).args(["worlds", "ram", "alpha", "overworld", "on"]).assert().success();

    mcsm(&conf)
        .args(["worlds", "ram", "alpha", "overworld"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is in RAM"));
}

#[test]
fn list_shows_resident_worlds_in_ram() {
    let (temp, conf) = init_temp();
    create_server(&conf, "alpha");
    create_world(&temp, "alpha", "overworld");
    mcsm(&conf).args(["worlds", "ram", "alpha", "overworld", "on"]).assert().success();

    mcsm(&conf)
        .args(["worlds", "list", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RAM"));
}

#[test]
fn ram_off_removes_marker_mirror_and_allowlist() {
    let (temp, conf) = init_temp();
    create_server(&conf, "alpha");
    let world = create_world(&temp, "alpha", "overworld");
    mcsm(&conf).args(["worlds", "ram", "alpha", "overworld", "on"]).assert().success();

    mcsm(&conf)
        .args(["worlds", "ram", "alpha", "overworld", "off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Disabled RAM residency"));

    assert!(!world.join("in_ram").exists());
    assert!(!temp.path().join("ramdisk").join("alpha").join("overworld").exists());
    assert!(!temp
        .path()
        .join("servers")
        .join("alpha")
        .join("allowed_symlinks.txt")
        .exists());
}

#[test]
fn ram_off_flushes_the_mirror_first() {
    let (temp, conf) = init_temp();
    create_server(&conf, "alpha");
    let world = create_world(&temp, "alpha", "overworld");
    mcsm(&conf).args(["worlds", "ram", "alpha", "overworld", "on"]).assert().success();

    let mirror = temp.path().join("ramdisk").join("alpha").join("overworld");
    fs::write(mirror.join("region.mca"), b"ram state").unwrap();

    mcsm(&conf).args(["worlds", "ram", "alpha", "overworld", "off"]).assert().success();
    assert_eq!(fs::read(world.join("region.mca")).unwrap(), b"ram state");
}

#[test]
fn ram_on_fails_when_ramdisk_is_disabled() {
    let (temp, conf) = init_temp_with_ramdisk(false);
    create_server(&conf, "alpha");
    create_world(&temp, "alpha", "overworld");

    mcsm(&conf)
        .args(["worlds", "ram", "alpha", "overworld", "on"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ramdisk storage is not enabled"));
}

#[test]
fn ram_on_an_unknown_world_fails() {
    let (_temp, conf) = init_temp();
    create_server(&conf, "alpha");

    mcsm(&conf)
        .args(["worlds", "ram", "alpha", "ghost", "on"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("world 'ghost' not found"));
}

#[test]
fn todisk_flushes_one_server() {
    let (temp, conf) = init_temp();
    create_server(&conf, "alpha");
    let world = create_world(&temp, "alpha", "overworld");
    mcsm(&conf).args(["worlds", "ram", "alpha", "overworld", "on"]).assert().success();

    let mirror = temp.path().join("ramdisk").join("alpha").join("overworld");
    fs::write(mirror.join("region.mca"), b"ram state").unwrap();

    mcsm(&conf)
        .args(["worlds", "todisk", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced RAM worlds of server 'alpha'"));
    assert_eq!(fs::read(world.join("region.mca")).unwrap(), b"ram state");
}

#[test]
fn todisk_all_succeeds_on_an_idle_fleet() {
    let (temp, conf) = init_temp();
    create_server(&conf, "alpha");
    create_world(&temp, "alpha", "overworld");

    mcsm(&conf)
        .args(["worlds", "todisk", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced RAM worlds of all running servers"));
}

#[test]
fn todisk_unknown_server_fails() {
    let (_temp, conf) = init_temp();
    mcsm(&conf)
        .args(["worlds", "todisk", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
