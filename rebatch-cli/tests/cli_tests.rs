use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn rebatch() -> Command {
    Command::cargo_bin("rebatch").unwrap()
}

#[test]
fn help_describes_the_tool() {
    rebatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stage batch rename operations"));
}

#[test]
fn at_least_one_file_is_required() {
    rebatch().assert().failure();
}

#[test]
fn replace_and_write_renames_on_disk() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("file.txt");
    file.touch().unwrap();

    rebatch()
        .arg(file.path())
        .write_stdin("re file bar\nw -c\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Files renamed."))
        .stdout(predicate::str::contains("Thanks for using!"));

    temp.child("bar.txt").assert(predicate::path::is_file());
    file.assert(predicate::path::missing());
}

#[test]
fn quit_discards_staged_changes() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("file.txt");
    file.touch().unwrap();

    rebatch()
        .arg(file.path())
        .write_stdin("re file bar\nq -c\n")
        .assert()
        .success();

    file.assert(predicate::path::is_file());
    temp.child("bar.txt").assert(predicate::path::missing());
}

#[test]
fn list_echoes_the_loaded_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("file.txt");
    file.touch().unwrap();

    rebatch()
        .arg(file.path())
        .write_stdin("list\nq -c\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("file.txt"));
}

#[test]
fn auto_scripts_run_before_the_prompt() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("file.txt");
    file.touch().unwrap();
    let script = temp.child("auto.txt");
    script.write_str("re file bar\nw -c\n").unwrap();

    rebatch()
        .arg(file.path())
        .arg("-a")
        .arg(script.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files renamed."));

    temp.child("bar.txt").assert(predicate::path::is_file());
}

#[test]
fn end_of_input_exits_cleanly_without_saving() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("file.txt");
    file.touch().unwrap();

    rebatch()
        .arg(file.path())
        .write_stdin("re file bar\n")
        .assert()
        .success();

    file.assert(predicate::path::is_file());
    temp.child("bar.txt").assert(predicate::path::missing());
}

#[test]
fn unknown_commands_report_and_keep_the_session_alive() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("file.txt");
    file.touch().unwrap();

    rebatch()
        .arg(file.path())
        .write_stdin("frobnicate\nq -c\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown command 'frobnicate'"))
        .stdout(predicate::str::contains("Thanks for using!"));
}
