//! Tests for the pagectl binary against a temporary store directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pagectl(store: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pagectl").unwrap();
    cmd.env_remove("PAGESTORE_PATH")
        .env_remove("PAGESTORE_ATOMIC_WRITES")
        .arg("--base-path")
        .arg(store.path());
    cmd
}

#[test]
fn key_prints_sha1_of_locator_and_namespace() {
    Command::cargo_bin("pagectl")
        .unwrap()
        .args(["key", "bob", "http://x"])
        .assert()
        .success()
        .stdout("982df09f0bd983b395d5d3cfc0995c66e31a088a\n");
}

#[test]
fn save_then_exists_then_pick() {
    let store = TempDir::new().unwrap();

    pagectl(&store)
        .args(["save", "bob", "http://x"])
        .assert()
        .success()
        .stdout("982df09f0bd983b395d5d3cfc0995c66e31a088a\n");

    assert!(store
        .path()
        .join("bob/982df09f0bd983b395d5d3cfc0995c66e31a088a")
        .is_file());

    pagectl(&store)
        .args(["exists", "bob", "http://x"])
        .assert()
        .success()
        .stdout("true\n");

    pagectl(&store)
        .args(["pick", "bob"])
        .assert()
        .success()
        .stdout("http://x\n");
}

#[test]
fn exists_on_unsaved_page_prints_false() {
    let store = TempDir::new().unwrap();

    pagectl(&store)
        .args(["exists", "bob", "http://never"])
        .assert()
        .success()
        .stdout("false\n");
}

#[test]
fn pick_on_empty_namespace_exits_with_two() {
    let store = TempDir::new().unwrap();
    std::fs::create_dir(store.path().join("bob")).unwrap();

    pagectl(&store)
        .args(["pick", "bob"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no saved pages"));
}

#[test]
fn pick_on_missing_namespace_fails() {
    let store = TempDir::new().unwrap();

    pagectl(&store)
        .args(["pick", "nobody"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot pick random page"));
}

#[test]
fn remove_twice_fails_unless_ignore_missing() {
    let store = TempDir::new().unwrap();

    pagectl(&store).args(["save", "bob", "http://x"]).assert().success();
    pagectl(&store).args(["remove", "bob", "http://x"]).assert().success();

    pagectl(&store)
        .args(["remove", "bob", "http://x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot remove page"));

    pagectl(&store)
        .args(["remove", "--ignore-missing", "bob", "http://x"])
        .assert()
        .success();
}

#[test]
fn list_prints_sorted_keys() {
    let store = TempDir::new().unwrap();

    pagectl(&store).args(["save", "bob", "http://x"]).assert().success();
    pagectl(&store).args(["save", "bob", "a"]).assert().success();

    pagectl(&store)
        .args(["list", "bob"])
        .assert()
        .success()
        .stdout(
            "205635594f903dabb5794d252b849f12cebd879b\n\
             982df09f0bd983b395d5d3cfc0995c66e31a088a\n",
        );
}

#[test]
fn config_file_supplies_base_path() {
    let store = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("pagestore.toml");
    std::fs::write(
        &config_path,
        format!("[store]\nbase_path = {:?}\n", store.path().display().to_string()),
    )
    .unwrap();

    Command::cargo_bin("pagectl")
        .unwrap()
        .env_remove("PAGESTORE_PATH")
        .arg("--config")
        .arg(&config_path)
        .args(["save", "alice", "https://example.com"])
        .assert()
        .success();

    assert!(store.path().join("alice").is_dir());
}

#[test]
fn config_file_wins_over_environment() {
    let env_store = TempDir::new().unwrap();
    let cfg_store = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("pagestore.toml");
    std::fs::write(
        &config_path,
        format!("[store]\nbase_path = {:?}\n", cfg_store.path().display().to_string()),
    )
    .unwrap();

    Command::cargo_bin("pagectl")
        .unwrap()
        .env("PAGESTORE_PATH", env_store.path())
        .arg("--config")
        .arg(&config_path)
        .args(["save", "bob", "http://x"])
        .assert()
        .success();

    assert!(cfg_store.path().join("bob").is_dir());
    assert!(!env_store.path().join("bob").exists());
}

#[test]
fn environment_used_without_flag_or_config() {
    let env_store = TempDir::new().unwrap();

    Command::cargo_bin("pagectl")
        .unwrap()
        .env("PAGESTORE_PATH", env_store.path())
        .args(["save", "bob", "http://x"])
        .assert()
        .success();

    assert!(env_store.path().join("bob").is_dir());
}

#[test]
fn base_path_flag_wins_over_config_and_environment() {
    let env_store = TempDir::new().unwrap();
    let cfg_store = TempDir::new().unwrap();
    let flag_store = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("pagestore.toml");
    std::fs::write(
        &config_path,
        format!("[store]\nbase_path = {:?}\n", cfg_store.path().display().to_string()),
    )
    .unwrap();

    Command::cargo_bin("pagectl")
        .unwrap()
        .env("PAGESTORE_PATH", env_store.path())
        .arg("--config")
        .arg(&config_path)
        .arg("--base-path")
        .arg(flag_store.path())
        .args(["save", "bob", "http://x"])
        .assert()
        .success();

    assert!(flag_store.path().join("bob").is_dir());
    assert!(!cfg_store.path().join("bob").exists());
    assert!(!env_store.path().join("bob").exists());
}
