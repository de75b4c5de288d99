//! End-to-end tests of the `drawbot` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `drawbot` isolated from the user's config and store
fn drawbot(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("drawbot").unwrap();
    cmd.arg("--config")
        .arg(dir.join("config.toml"))
        .arg("--store")
        .arg(dir.join("drawings.json"))
        .arg("--no-preview");
    cmd
}

fn saved_id(stdout: &[u8]) -> u64 {
    String::from_utf8_lossy(stdout)
        .lines()
        .find_map(|l| l.strip_prefix("Saved drawing "))
        .and_then(|id| id.trim().parse().ok())
        .expect("no saved id in output")
}

#[test]
fn test_draw_writes_png() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("house.png");

    drawbot(dir.path())
        .args(["draw", "a", "house"])
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Drew 15 command(s), skipped 0"));

    let png = fs::read(&out).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_draw_animated_with_zero_delay() {
    let dir = TempDir::new().unwrap();
    drawbot(dir.path())
        .args(["draw", "star", "--animate", "--delay", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Drew 10 command(s)"));
}

#[test]
fn test_save_list_show_delete() {
    let dir = TempDir::new().unwrap();

    let output = drawbot(dir.path())
        .args(["draw", "sun", "--save", "Morning"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = saved_id(&output.stdout);

    drawbot(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{id}\tMorning\t1 command(s)\tuser 2")));

    drawbot(dir.path())
        .args(["list", "--user", "99"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved drawings"));

    drawbot(dir.path())
        .args(["show", &id.to_string(), "--json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"type\": \"circle\"")
                .and(predicate::str::contains("#FFD700")),
        );

    drawbot(dir.path())
        .args(["show", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Morning\n"));

    drawbot(dir.path())
        .args(["delete", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Deleted drawing {id}")));

    drawbot(dir.path())
        .args(["delete", &id.to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Drawing not found"));
}

#[test]
fn test_replay_commands_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("commands.json");
    fs::write(
        &file,
        r#"[
            {"type": "rect", "x": 10, "y": 10, "width": 40, "height": 20, "color": "navy"},
            {"type": "spiral", "turns": 3},
            {"type": "circle", "x": 5},
            {"type": "text", "x": 10, "y": 60, "text": "hello"}
        ]"#,
    )
    .unwrap();

    drawbot(dir.path())
        .arg("replay")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Drew 2 command(s), skipped 0"));
}

#[test]
fn test_replay_legacy_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("legacy.json");
    fs::write(
        &file,
        r#"[
            {"commandType": "CIRCLE", "parameters": "{\"x\":20,\"y\":20,\"radius\":5,\"fillColor\":\"red\",\"strokeColor\":null}", "order": 1},
            {"commandType": "RECTANGLE", "parameters": "{\"x\":0,\"y\":0}", "order": 0},
            {"commandType": "POLYGON", "parameters": "{}", "order": 2}
        ]"#,
    )
    .unwrap();

    drawbot(dir.path())
        .args(["replay", "--legacy"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Drew 1 command(s), skipped 1, ignored 1"));
}

#[test]
fn test_replay_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    drawbot(dir.path())
        .args(["replay", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_config_prints_effective_settings() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "canvas_width = 320\n").unwrap();

    drawbot(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("canvas_width = 320")
                .and(predicate::str::contains("[remote]"))
                .and(predicate::str::contains("drawings.json")),
        );
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "canvas_width = 0\n").unwrap();

    drawbot(dir.path())
        .args(["draw", "sun"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
