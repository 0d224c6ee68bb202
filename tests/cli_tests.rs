//! CLI surface smoke tests (no network)

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("sectorfinder")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("classify"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("corrections"))
        .stdout(predicate::str::contains("sectors"));
}

#[test]
fn sectors_prints_builtin_vocabulary() {
    let tmp = tempfile::TempDir::new().unwrap();

    Command::cargo_bin("sectorfinder")
        .unwrap()
        .current_dir(tmp.path())
        .arg("sectors")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tech / Software"))
        .stdout(predicate::str::contains("Luxury"))
        .stdout(predicate::str::contains("Banking"));
}

#[test]
fn corrections_add_then_list() {
    let tmp = tempfile::TempDir::new().unwrap();

    Command::cargo_bin("sectorfinder")
        .unwrap()
        .current_dir(tmp.path())
        .args(["corrections", "add", "FOO", "Custom Widgets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved correction"));

    Command::cargo_bin("sectorfinder")
        .unwrap()
        .current_dir(tmp.path())
        .args(["corrections", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FOO -> Custom Widgets"));

    // The corrected sector now belongs to the vocabulary
    Command::cargo_bin("sectorfinder")
        .unwrap()
        .current_dir(tmp.path())
        .arg("sectors")
        .assert()
        .success()
        .stdout(predicate::str::contains("Custom Widgets"));
}

#[test]
fn no_arguments_is_an_error() {
    Command::cargo_bin("sectorfinder")
        .unwrap()
        .assert()
        .failure()
        .code(2);
}
