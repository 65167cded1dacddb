//! Error handling integration tests for tcp CLI.
//!
//! Session errors (bad locator, unreadable container, missing source) exit
//! with status 2 and copy nothing. Per-entry errors are reported on stderr,
//! the rest of the tree is still copied, and the exit status is 1.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, write_zip};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_missing_arguments() {
    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg("only-source").assert().failure();
}

#[test]
fn test_unknown_output_mode() {
    let fx = TestFixture::new();
    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg("--output")
        .arg("yaml")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_nonexistent_source() {
    let fx = TestFixture::new();
    let target = fx.dst.path().join("out");

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(fx.src.path().join("nonexistent"))
        .arg(&target)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[source_not_found]"));

    assert!(!target.exists());
}

#[test]
fn test_locator_with_two_separators() {
    let fx = TestFixture::new();
    let target = fx.dst.path().join("out");

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg("outer.zip!inner.zip!/data")
        .arg(&target)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[invalid_locator]"))
        .stdout(predicate::str::is_empty());

    assert!(!target.exists());
}

#[test]
fn test_locator_escaping_archive_root() {
    let fx = TestFixture::new();
    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg("pkg.zip!/../etc")
        .arg(fx.dst.path().join("out"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[invalid_locator]"));
}

#[test]
fn test_missing_container() {
    let fx = TestFixture::new();
    let target = fx.dst.path().join("out");

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(format!("{}!/data", fx.src.path().join("absent.zip").display()))
        .arg(&target)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[container_open]"))
        .stderr(predicate::str::contains("absent.zip"));

    assert!(!target.exists());
}

#[test]
fn test_corrupt_container() {
    let fx = TestFixture::new();
    let zip = fx.src.path().join("broken.zip");
    fs::write(&zip, "this is not a zip archive").unwrap();

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(format!("{}!/data", zip.display()))
        .arg(fx.dst.path().join("out"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[container_open]").count(1));
}

#[test]
fn test_archive_path_pointing_at_file() {
    let fx = TestFixture::new();
    let zip = fx.src.path().join("pkg.zip");
    write_zip(&zip, &[("data/", ""), ("data/x.txt", "x marks")]);
    let target = fx.dst.path().join("x.txt");

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(format!("{}!/data/x.txt", zip.display()))
        .arg(&target)
        .assert()
        .success();

    fx.assert_file_content(&target, "x marks");
}

#[cfg(unix)]
#[test]
fn test_symlink_cycle_reported_once() {
    let fx = TestFixture::new();
    let a = fx.create_sample_tree();
    std::os::unix::fs::symlink(&a, a.join("b/loop")).unwrap();
    let target = fx.dst.path().join("x");

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(&a)
        .arg(&target)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cycle detected").count(1))
        .stdout(predicate::str::contains("with 1 errors"));

    fx.assert_file_content(&target.join("f1.txt"), "first");
    fx.assert_file_content(&target.join("b/f2.txt"), "second");
}

#[test]
fn test_file_in_place_of_directory() {
    let fx = TestFixture::new();
    let a = fx.create_sample_tree();
    let target = fx.dst.path().join("x");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("b"), "blocker").unwrap();

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(&a)
        .arg(&target)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[directory_create]"));

    // the sibling file is still copied, the blocked subtree is skipped
    fx.assert_file_content(&target.join("f1.txt"), "first");
    fx.assert_file_content(&target.join("b"), "blocker");
}

#[test]
fn test_directory_in_place_of_file() {
    let fx = TestFixture::new();
    let a = fx.create_sample_tree();
    let target = fx.dst.path().join("x");
    fs::create_dir_all(target.join("f1.txt")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(&a)
        .arg(&target)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[file_copy]"))
        .stderr(predicate::str::contains("f1.txt"));

    assert!(target.join("f1.txt").is_dir());
    fx.assert_file_content(&target.join("b/f2.txt"), "second");
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    // root ignores permission bits
    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    let fx = TestFixture::new();
    let a = fx.create_sample_tree();
    let locked = a.join("b");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    let _guard = scopeguard::guard(locked, |path| {
        let _ = fs::set_permissions(&path, fs::Permissions::from_mode(0o755));
    });

    let target = fx.dst.path().join("x");
    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(&a)
        .arg(&target)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[unreadable]"));

    fx.assert_file_content(&target.join("f1.txt"), "first");
    assert!(!target.join("b/f2.txt").exists());
}
