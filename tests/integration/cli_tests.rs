use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

// Isolated from any config file or DUPEMGR_* variable on the host
fn dupemgr(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("dupemgr").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("DUPEMGR_EXTENSIONS")
        .env_remove("DUPEMGR_INCLUDE_OTHERS")
        .env_remove("RUST_LOG")
        .arg("--no-color")
        .arg("--config")
        .arg(home.path().join("dupemgr.toml"));
    cmd
}

fn fixture() -> TempDir {
    let dir = tempdir().unwrap();
    write(dir.path(), "data/a/x.txt", b"hello");
    write(dir.path(), "data/b/x.txt", b"hello");
    write(dir.path(), "data/c/x.txt", b"world");
    dir
}

#[test]
fn test_help() {
    let home = tempdir().unwrap();
    dupemgr(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn test_scan_text_output() {
    let dir = fixture();
    dupemgr(&dir)
        .args(["scan", "--no-progress"])
        .arg(dir.path().join("data"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Group 1: x.txt"))
        .stdout(predicate::str::contains("2 files"));
}

#[test]
fn test_scan_json_output() {
    let dir = fixture();
    let output = dupemgr(&dir)
        .args(["scan", "--no-progress", "--output", "json", "--ext", ".txt"])
        .arg(dir.path().join("data"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let groups = json["duplicates"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["name"], "x.txt");
    assert_eq!(groups[0]["size"], 5);
    assert_eq!(groups[0]["files"].as_array().unwrap().len(), 2);
    assert_eq!(json["summary"]["exit_code"], 0);
}

#[test]
fn test_scan_csv_output() {
    let dir = fixture();
    dupemgr(&dir)
        .args(["scan", "--no-progress", "-o", "csv"])
        .arg(dir.path().join("data"))
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("group_id,hash,name,size,path"));
}

#[test]
fn test_scan_no_duplicates_exit_code() {
    let dir = tempdir().unwrap();
    write(dir.path(), "data/one.txt", b"1");
    write(dir.path(), "data/two.txt", b"2");

    dupemgr(&dir)
        .args(["scan", "-q"])
        .arg(dir.path().join("data"))
        .assert()
        .code(2);
}

#[test]
fn test_scan_missing_path_fails() {
    let dir = tempdir().unwrap();
    dupemgr(&dir)
        .args(["scan", "-q"])
        .arg(dir.path().join("nope"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[DM001]"))
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn test_json_errors() {
    let dir = tempdir().unwrap();
    let output = dupemgr(&dir)
        .args(["--json-errors", "scan", "-q"])
        .arg(dir.path().join("nope"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(json["code"], "DM001");
    assert_eq!(json["interrupted"], false);
}

#[test]
fn test_scan_action_delete_keeps_one_copy() {
    let dir = fixture();
    dupemgr(&dir)
        .args(["scan", "-q", "--action", "delete"])
        .arg(dir.path().join("data"))
        .assert()
        .code(0);

    let left = ["a", "b"]
        .iter()
        .filter(|d| dir.path().join("data").join(d).join("x.txt").exists())
        .count();
    assert_eq!(left, 1);
    assert!(dir.path().join("data/c/x.txt").exists());
}

#[test]
fn test_scan_action_move_requires_dest() {
    let dir = fixture();
    dupemgr(&dir)
        .args(["scan", "--action", "move"])
        .arg(dir.path().join("data"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dest"));
}

#[test]
fn test_delete_subcommand_reports_missing() {
    let dir = tempdir().unwrap();
    write(dir.path(), "f.txt", b"x");

    dupemgr(&dir)
        .arg("delete")
        .arg(dir.path().join("f.txt"))
        .arg(dir.path().join("gone.txt"))
        .assert()
        .code(0)
        .stderr(predicate::str::contains("Deleted 1 file(s), 1 already gone"));

    assert!(!dir.path().join("f.txt").exists());
}

#[test]
fn test_move_subcommand() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/f.txt", b"x");

    dupemgr(&dir)
        .args(["move", "--dest"])
        .arg(dir.path().join("out"))
        .arg(dir.path().join("src/f.txt"))
        .arg(dir.path().join("src/missing.txt"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Moved 1 file(s), 1 failed"));

    assert!(dir.path().join("out/f.txt").exists());
}

#[test]
fn test_config_subcommand_prints_toml() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("dupemgr.toml"), "include_others = false\n").unwrap();

    dupemgr(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("include_others = false"))
        .stdout(predicate::str::contains("cancel_checkpoints = \"traversal\""));
}
