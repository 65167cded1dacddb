//! Integration tests for copying out of zip containers.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{ENTRY_UNIX_TIME, TestFixture, count_files_recursive, mtime_secs, write_zip};
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};

fn package_zip(dir: &Path) -> PathBuf {
    let zip = dir.join("pkg.zip");
    write_zip(
        &zip,
        &[
            ("data/", ""),
            ("data/x.txt", "x marks"),
            ("data/nested/", ""),
            ("data/nested/y.txt", "why"),
            ("other.txt", "not copied"),
        ],
    );
    zip
}

#[rstest]
#[case::plain("{}!/data")]
#[case::no_leading_slash("{}!data")]
#[case::jar_uri("jar:file://{}!/data")]
#[case::zip_uri("zip:file://{}!/data/")]
fn test_copy_directory_from_archive(#[case] template: &str) {
    let fx = TestFixture::new();
    let zip = package_zip(fx.src.path());
    let locator = template.replace("{}", &zip.display().to_string());
    let target = fx.dst.path().join("out");

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(&locator).arg(&target).assert().success();

    fx.assert_file_content(&target.join("x.txt"), "x marks");
    fx.assert_file_content(&target.join("nested/y.txt"), "why");
    assert!(!target.join("other.txt").exists());
    assert_eq!(count_files_recursive(&target), 2);
}

#[test]
fn test_archive_entry_times_are_preserved() {
    let fx = TestFixture::new();
    let zip = package_zip(fx.src.path());
    let target = fx.dst.path().join("out");

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(format!("{}!/data", zip.display()))
        .arg(&target)
        .assert()
        .success();

    assert_eq!(mtime_secs(&target.join("x.txt")), ENTRY_UNIX_TIME);
    assert_eq!(mtime_secs(&target.join("nested/y.txt")), ENTRY_UNIX_TIME);
    assert_eq!(mtime_secs(&target.join("nested")), ENTRY_UNIX_TIME);
    assert_eq!(mtime_secs(&target), ENTRY_UNIX_TIME);
}

#[test]
fn test_whole_archive_with_empty_inner_path() {
    let fx = TestFixture::new();
    let zip = package_zip(fx.src.path());
    let target = fx.dst.path().join("out");

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(format!("{}!", zip.display()))
        .arg(&target)
        .assert()
        .success();

    fx.assert_file_content(&target.join("data/x.txt"), "x marks");
    fx.assert_file_content(&target.join("other.txt"), "not copied");
    assert_eq!(count_files_recursive(&target), 3);
}

#[test]
fn test_archive_without_directory_entries() {
    let fx = TestFixture::new();
    let zip = fx.src.path().join("flat.zip");
    write_zip(&zip, &[("docs/a/readme.md", "# hi"), ("docs/b.md", "b")]);
    let target = fx.dst.path().join("out");

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(format!("{}!/docs", zip.display()))
        .arg(&target)
        .assert()
        .success();

    fx.assert_file_content(&target.join("a/readme.md"), "# hi");
    fx.assert_file_content(&target.join("b.md"), "b");
}

#[test]
fn test_container_released_after_copy() {
    let fx = TestFixture::new();
    let zip = package_zip(fx.src.path());

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(format!("{}!/data", zip.display()))
        .arg(fx.dst.path().join("out"))
        .assert()
        .success();

    fs::remove_file(&zip).unwrap();
}

#[test]
fn test_missing_inner_path() {
    let fx = TestFixture::new();
    let zip = package_zip(fx.src.path());
    let target = fx.dst.path().join("out");

    let mut cmd = cargo_bin_cmd!("tcp");
    cmd.arg(format!("{}!/nope", zip.display()))
        .arg(&target)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[source_not_found]"));

    assert!(!target.exists());
}
