use std::io::Write;

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

const COURSE_TABLE: &str = "\
Course Name,Course Code,Lecture Time,Tutorial Time,Lab Time,Credit,Lecture Location,Tutorial Location,Lab Location
Intro to Computer Science,CS101,\"T1,T2\",,,3,Room 101,,
Calculus II,MA201,T1,,,4,Room 202,,
Audit Seminar,AU100,T2,,,nan,,,
";

const SLOT_GRID: &str = "\
Time Slot,Monday
08:00-09:00,T1
09:00-10:00,T2
";

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

fn cli() -> Command {
    Command::cargo_bin("cli").expect("cli binary")
}

#[test]
fn cli_lists_selectable_courses() {
    let table = write_temp(COURSE_TABLE);
    cli()
        .arg("courses")
        .arg(table.path())
        .assert()
        .success()
        .stdout(str_contains("CS101"))
        .stdout(str_contains("2 selectable courses."));
}

#[test]
fn cli_build_prints_table_and_clashes() {
    let table = write_temp(COURSE_TABLE);
    let grid = write_temp(SLOT_GRID);
    cli()
        .args(["build"])
        .arg(table.path())
        .arg(grid.path())
        .args(["CS101", "MA201"])
        .assert()
        .success()
        .stdout(str_contains("CS101 / MA201 (Clash)"))
        .stdout(str_contains("Clashes found:"))
        .stdout(str_contains("Monday 08:00-09:00: CS101 / MA201"));
}

#[test]
fn cli_build_without_overlap_reports_none() {
    let table = write_temp(COURSE_TABLE);
    let grid = write_temp(SLOT_GRID);
    cli()
        .args(["build"])
        .arg(table.path())
        .arg(grid.path())
        .arg("CS101")
        .assert()
        .success()
        .stdout(str_contains("No clashes."));
}

#[test]
fn cli_build_rejects_empty_selection() {
    let table = write_temp(COURSE_TABLE);
    let grid = write_temp(SLOT_GRID);
    cli()
        .args(["build"])
        .arg(table.path())
        .arg(grid.path())
        .assert()
        .failure()
        .stderr(str_contains("no courses selected"));
}

#[test]
fn cli_build_exports_csv() {
    let table = write_temp(COURSE_TABLE);
    let grid = write_temp(SLOT_GRID);
    let out = NamedTempFile::new().expect("create temp file");
    cli()
        .args(["build"])
        .arg(table.path())
        .arg(grid.path())
        .arg("CS101")
        .arg("--csv")
        .arg(out.path())
        .assert()
        .success()
        .stdout(str_contains("Timetable saved to"));

    let rendered = std::fs::read_to_string(out.path()).expect("read exported csv");
    assert!(rendered.starts_with("Time Slot,Monday"));
    assert!(rendered.contains("CS101"));
}

#[test]
fn cli_prepare_writes_the_processed_table() {
    let raw = write_temp(
        "\
Course Name,Course Code,Lecture,Tutorial,Lab,C
Intro to Computer Science,CS101,T1 (Room 101),,,3
",
    );
    let out = NamedTempFile::new().expect("create temp file");
    cli()
        .args(["prepare"])
        .arg(raw.path())
        .arg(out.path())
        .assert()
        .success()
        .stdout(str_contains("Processed table saved to"));

    let processed = std::fs::read_to_string(out.path()).expect("read processed csv");
    assert!(processed.contains("Lecture Time"));
    assert!(processed.contains("Room 101"));
}

#[test]
fn cli_unknown_command_fails() {
    cli()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(str_contains("unknown command"));
}
