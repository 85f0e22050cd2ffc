use std::fs;
use std::io::Write;

use tempfile::NamedTempFile;
use timetable_tool::{
    assemble_timetable, load_catalog_from_csv, load_slot_grid_from_csv, prepare_course_table,
    save_timetable_to_csv, save_timetable_to_json,
};

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

const COURSE_TABLE: &str = "\
Course Name,Course Code,Lecture Time,Tutorial Time,Lab Time,Credit,Lecture Location,Tutorial Location,Lab Location
Intro to Computer Science,CS101,\"T1,T2\",T5,,3,Room 101,Room 104,
Calculus II,MA201,T1,nan,T7,4,Room 202,nan,Lab 201
Audit Seminar,AU100,T3,,,nan,,,
";

const SLOT_GRID: &str = "\
Time Slot,Monday,Tuesday
08:00-09:00,T1,T4
09:00-10:00,T2,nan
10:00-11:00,T5,
";

#[test]
fn loads_catalog_with_normalized_fields() {
    let table = write_temp(COURSE_TABLE);
    let catalog = load_catalog_from_csv(table.path()).unwrap();
    assert_eq!(catalog.len(), 3);

    let cs101 = catalog.find("CS101").unwrap().unwrap();
    assert_eq!(cs101.name, "Intro to Computer Science");
    assert_eq!(cs101.credit, Some(3.0));
    let lecture = cs101.lecture.as_ref().unwrap();
    assert_eq!(lecture.slots, vec!["T1", "T2"]);
    assert_eq!(lecture.location.as_deref(), Some("Room 101"));
    assert!(cs101.lab.is_none());

    let ma201 = catalog.find("MA201").unwrap().unwrap();
    assert!(ma201.tutorial.is_none(), "nan time field means no meeting");
    let lab = ma201.lab.as_ref().unwrap();
    assert_eq!(lab.location.as_deref(), Some("Lab 201"));

    // Credit "nan" keeps the course in the catalog but out of the listing.
    let listing = catalog.selectable_courses().unwrap();
    assert_eq!(listing.len(), 2);
    assert!(catalog.find("AU100").unwrap().is_some());
}

#[test]
fn loads_slot_grid_with_blank_and_nan_cells() {
    let grid_file = write_temp(SLOT_GRID);
    let grid = load_slot_grid_from_csv(grid_file.path()).unwrap();

    assert_eq!(grid.days(), ["Monday", "Tuesday"]);
    assert_eq!(
        grid.time_labels(),
        ["08:00-09:00", "09:00-10:00", "10:00-11:00"]
    );
    assert_eq!(grid.slot_at(0, 0), Some("T1"));
    assert_eq!(grid.slot_at(0, 1), Some("T4"));
    assert_eq!(grid.slot_at(1, 1), None, "nan cell carries no slot");
    assert_eq!(grid.slot_at(2, 1), None, "blank cell carries no slot");
}

#[test]
fn missing_file_is_an_error() {
    assert!(load_catalog_from_csv("/nonexistent/courses.csv").is_err());
    assert!(load_slot_grid_from_csv("/nonexistent/slots.csv").is_err());
}

#[test]
fn csv_export_renders_cells_and_clash_labels() {
    let table = write_temp(COURSE_TABLE);
    let grid_file = write_temp(SLOT_GRID);
    let catalog = load_catalog_from_csv(table.path()).unwrap();
    let grid = load_slot_grid_from_csv(grid_file.path()).unwrap();

    let selection = vec!["CS101".to_string(), "MA201".to_string()];
    let timetable = assemble_timetable(&catalog, &grid, &selection).unwrap();

    let out = NamedTempFile::new().unwrap();
    save_timetable_to_csv(&timetable, out.path()).unwrap();
    let rendered = fs::read_to_string(out.path()).unwrap();

    assert!(rendered.starts_with("Time Slot,Monday,Tuesday"));
    assert!(rendered.contains("CS101 / MA201\n(Clash)"));
    assert!(rendered.contains("Room 101"));
}

#[test]
fn json_export_matches_the_day_map() {
    let table = write_temp(COURSE_TABLE);
    let grid_file = write_temp(SLOT_GRID);
    let catalog = load_catalog_from_csv(table.path()).unwrap();
    let grid = load_slot_grid_from_csv(grid_file.path()).unwrap();

    let selection = vec!["CS101".to_string()];
    let timetable = assemble_timetable(&catalog, &grid, &selection).unwrap();

    let out = NamedTempFile::new().unwrap();
    save_timetable_to_json(&timetable, out.path()).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path()).unwrap()).unwrap();

    assert_eq!(parsed, timetable.to_day_map());
    let monday = parsed["monday"].as_array().unwrap();
    assert_eq!(monday.len(), 3);
    assert_eq!(monday[0]["time"], "08:00-09:00");
}

#[test]
fn prepare_normalizes_a_raw_registrar_export() {
    let raw = write_temp(
        "\
Sr,Course Name,Course Code,Lecture,Tutorial,Lab,C
1,Intro to Computer Science,CS101,\"T1,T2 (Room 101)\",T5 (Room 104),,3
2,Half-semester offerings listed below the main table,HEADER-ROW-NOT-A-COURSE,,,,
3,Calculus II,MA201,T1 (Room 202),,T7 (Lab 201),4
",
    );
    let out = NamedTempFile::new().unwrap();
    prepare_course_table(raw.path(), out.path()).unwrap();

    let processed = fs::read_to_string(out.path()).unwrap();
    let mut lines = processed.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Course Name,Course Code,Lecture Time,Tutorial Time,Lab Time,Credit,Lecture Location,Tutorial Location,Lab Location"
    );
    // The over-long pseudo-code row is dropped; two course rows remain.
    assert_eq!(lines.clone().count(), 2);

    let catalog = load_catalog_from_csv(out.path()).unwrap();
    let cs101 = catalog.find("CS101").unwrap().unwrap();
    let lecture = cs101.lecture.as_ref().unwrap();
    assert_eq!(lecture.slots, vec!["T1", "T2"]);
    assert_eq!(lecture.location.as_deref(), Some("Room 101"));
    let tutorial = cs101.tutorial.as_ref().unwrap();
    assert_eq!(tutorial.slots, vec!["T5"]);
    assert_eq!(tutorial.location.as_deref(), Some("Room 104"));
}
