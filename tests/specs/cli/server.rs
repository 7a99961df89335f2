// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `mcsm server` administration commands.

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
    let temp = TempDir::new().unwrap();
    let storage = temp.path().join("servers");
    let ramdisk = temp.path().join("ramdisk");
    fs::create_dir_all(&storage).unwrap();

    let conf = temp.path().join("mcsm.toml");
    fs::write(
        &conf,
        format!(
            "server_storage = \"{}\"\n\
             ramdisk_enabled = true\n\
             ramdisk_storage = \"{}\"\n\n\
             [defaults]\n\
             username = \"\"\n\
             stop_delay_secs = 0\n\
             restart_delay_secs = 0\n",
            storage.display(),
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

fn servers_dir(temp: &TempDir) -> PathBuf {
    temp.path().join("servers")
}

#[test]
fn list_with_empty_fleet() {
    let (_temp, conf) = init_temp();
    mcsm(&conf)
        .args(["server", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No servers found."));
}

#[test]
fn create_lays_out_the_server_directory() {
    let (temp, conf) = init_temp();
    mcsm(&conf)
        .args(["server", "create", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created server 'alpha'"));

    let path = servers_dir(&temp).join("alpha");
    assert!(path.is_dir());
    assert!(path.join("worldstorage").is_dir());
    assert!(path.join("worldstorage_inactive").is_dir());
    assert!(path.join("server.toml").is_file());
}

#[test]
fn create_twice_fails() {
    let (_temp, conf) = init_temp();
    mcsm(&conf).args(["server", "create", "alpha"]).assert().success();
    mcsm(&conf)
        .args(["server", "create", "alpha"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn list_shows_created_servers_as_stopped() {
    let (_temp, conf) = init_temp();
    mcsm(&conf).args(["server", "create", "alpha"]).assert().success();
    mcsm(&conf).args(["server", "create", "bravo"]).assert().success();

    mcsm(&conf)
        .args(["server", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"))
        .stdout(predicate::str::contains("bravo"))
        .stdout(predicate::str::contains("stopped"));
}

#[test]
fn status_of_a_stopped_server() {
    let (_temp, conf) = init_temp();
    mcsm(&conf).args(["server", "create", "alpha"]).assert().success();

    mcsm(&conf)
        .args(["status", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stopped"));
}

#[test]
fn status_of_an_unknown_server_fails() {
    let (_temp, conf) = init_temp();
    mcsm(&conf)
        .args(["status", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("server 'ghost' not found"));
}

#[test]
fn delete_removes_the_directory() {
    let (temp, conf) = init_temp();
    mcsm(&conf).args(["server", "create", "alpha"]).assert().success();

    mcsm(&conf)
        .args(["server", "delete", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted server 'alpha'"));
    assert!(!servers_dir(&temp).join("alpha").exists());
}

#[test]
fn delete_unknown_server_fails() {
    let (_temp, conf) = init_temp();
    mcsm(&conf)
        .args(["server", "delete", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn rename_moves_the_directory() {
    let (temp, conf) = init_temp();
    mcsm(&conf).args(["server", "create", "alpha"]).assert().success();

    mcsm(&conf)
        .args(["server", "rename", "alpha", "bravo"])
        .assert()
        .success();

    assert!(!servers_dir(&temp).join("alpha").exists());
    assert!(servers_dir(&temp).join("bravo").is_dir());
}

#[test]
fn rename_onto_an_existing_server_fails() {
    let (_temp, conf) = init_temp();
    mcsm(&conf).args(["server", "create", "alpha"]).assert().success();
    mcsm(&conf).args(["server", "create", "bravo"]).assert().success();

    mcsm(&conf)
        .args(["server", "rename", "alpha", "bravo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_flag_overrides_the_environment() {
    let (temp, conf) = init_temp();
    mcsm(&conf).args(["server", "create", "alpha"]).assert().success();

    // same config via --config, bogus env value must lose
    let mut cmd = cargo_bin_cmd!("mcsm");
    cmd.env("MCSM_CONF", temp.path().join("does-not-exist.toml"));
    cmd.arg("--config")
        .arg(&conf)
        .args(["server", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"));
}

#[test]
fn errors_are_prefixed_on_stderr() {
    let (_temp, conf) = init_temp();
    mcsm(&conf)
        .args(["server", "delete", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: "));
}
