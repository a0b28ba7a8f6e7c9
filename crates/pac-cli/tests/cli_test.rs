#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Integration tests for the pac CLI

use assert_cmd::Command;
use pac_formats::{PacArchive, PacBuilder, PacEntry};
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn write_sample(path: &Path) {
    let mut builder = PacBuilder::new();
    builder
        .add_file("a.txt", b"abc".to_vec())
        .add_entry(PacEntry::new("b.bin", vec![9; 10]).with_unknown(0x55));
    fs::write(path, builder.build().unwrap()).unwrap();
}

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("pac").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("dump"))
        .stdout(predicate::str::contains("repack"));
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("pac").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pac"));
}

#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("pac").unwrap();
    cmd.arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_show_text() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("sample.pac");
    write_sample(&archive);

    let mut cmd = Command::cargo_bin("pac").unwrap();
    cmd.arg("show")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("magic:        add"))
        .stdout(predicate::str::contains("000 a.txt"))
        .stdout(predicate::str::contains("001 b.bin"));
}

#[test]
fn test_show_json() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("sample.pac");
    write_sample(&archive);

    let mut cmd = Command::cargo_bin("pac").unwrap();
    let output = cmd
        .args(["--format", "json", "show"])
        .arg(&archive)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["header"]["count"], 2);
    assert_eq!(value["entries"][1]["unknown"], 0x55);
}

#[test]
fn test_show_rejects_non_pac() {
    let tmp = tempfile::tempdir().unwrap();
    let bogus = tmp.path().join("bogus.pac");
    fs::write(&bogus, b"PK\x03\x04 definitely not a pac file").unwrap();

    let mut cmd = Command::cargo_bin("pac").unwrap();
    cmd.arg("show")
        .arg(&bogus)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid PAC magic"));
}

#[test]
fn test_dump_and_repack() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("sample.pac");
    let dump = tmp.path().join("sample");
    let rebuilt = tmp.path().join("rebuilt.pac");
    write_sample(&archive);

    Command::cargo_bin("pac")
        .unwrap()
        .arg("dump")
        .arg(&archive)
        .arg("-o")
        .arg(&dump)
        .assert()
        .success()
        .stdout(predicate::str::contains("000_a.txt"));

    assert_eq!(fs::read(dump.join("000_a.txt")).unwrap(), b"abc");
    assert!(dump.join("001_b.bin.json").exists());
    assert!(dump.join("_metadata.json").exists());

    Command::cargo_bin("pac")
        .unwrap()
        .arg("repack")
        .arg(&dump)
        .arg("--out")
        .arg(&rebuilt)
        .assert()
        .success();

    let original = PacArchive::from_bytes(&fs::read(&archive).unwrap()).unwrap();
    let repacked = PacArchive::from_bytes(&fs::read(&rebuilt).unwrap()).unwrap();
    assert_eq!(original, repacked);
}

#[test]
fn test_dump_default_directory() {
    let tmp = tempfile::tempdir().unwrap();
    write_sample(&tmp.path().join("global.pac"));

    Command::cargo_bin("pac")
        .unwrap()
        .current_dir(tmp.path())
        .args(["dump", "global.pac"])
        .assert()
        .success();

    assert!(tmp.path().join("global").join("000_a.txt").exists());
}
