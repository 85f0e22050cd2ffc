use crate::persistence::{PersistenceError, PersistenceResult};
use regex::Regex;
use std::fs::File;
use std::path::Path;

const SOURCE_COLUMNS: [&str; 6] = ["Course Name", "Course Code", "Lecture", "Tutorial", "Lab", "C"];

const OUTPUT_HEADER: [&str; 9] = [
    "Course Name",
    "Course Code",
    "Lecture Time",
    "Tutorial Time",
    "Lab Time",
    "Credit",
    "Lecture Location",
    "Tutorial Location",
    "Lab Location",
];

/// Registrar exports longer than this in the code column are section headers
/// or notes, not courses.
const MAX_CODE_LEN: usize = 15;

/// Room names longer than this inside parentheses are almost always remarks,
/// not locations.
const MAX_LOCATION_LEN: usize = 30;

/// Pull parenthesized location fragments out of a raw time field, returning
/// the cleaned slot text and the joined locations.
fn extract_location(text: &str, paren: &Regex) -> (String, String) {
    let locations: Vec<&str> = paren
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|loc| !loc.is_empty() && loc.len() < MAX_LOCATION_LEN)
        .collect();
    let cleaned = paren.replace_all(text, "").trim().to_string();
    (cleaned, locations.join(", "))
}

/// Normalize a raw registrar export into the processed course table the
/// catalog loader expects: keep real course rows, rename the columns, and
/// split each session time field into slot tokens plus a location column.
pub fn prepare_course_table<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> PersistenceResult<()> {
    let paren = Regex::new(r"\(([^)]*)\)").expect("valid location pattern");

    let in_file = File::open(input)?;
    let mut reader = csv::Reader::from_reader(in_file);
    let headers = reader.headers()?.clone();

    let mut indices = Vec::with_capacity(SOURCE_COLUMNS.len());
    for column in SOURCE_COLUMNS {
        let idx = headers
            .iter()
            .position(|header| header.trim() == column)
            .ok_or_else(|| {
                PersistenceError::InvalidData(format!("raw table is missing column '{column}'"))
            })?;
        indices.push(idx);
    }
    let [name_idx, code_idx, lecture_idx, tutorial_idx, lab_idx, credit_idx] =
        [indices[0], indices[1], indices[2], indices[3], indices[4], indices[5]];

    let out_file = File::create(output)?;
    let mut writer = csv::Writer::from_writer(out_file);
    writer.write_record(OUTPUT_HEADER)?;

    for record in reader.records() {
        let record = record?;
        let code = record.get(code_idx).unwrap_or("").trim();
        if code.is_empty() || code.len() > MAX_CODE_LEN {
            continue;
        }

        let (lecture_time, lecture_location) =
            extract_location(record.get(lecture_idx).unwrap_or(""), &paren);
        let (tutorial_time, tutorial_location) =
            extract_location(record.get(tutorial_idx).unwrap_or(""), &paren);
        let (lab_time, lab_location) =
            extract_location(record.get(lab_idx).unwrap_or(""), &paren);

        writer.write_record([
            record.get(name_idx).unwrap_or("").trim(),
            code,
            lecture_time.as_str(),
            tutorial_time.as_str(),
            lab_time.as_str(),
            record.get(credit_idx).unwrap_or("").trim(),
            lecture_location.as_str(),
            tutorial_location.as_str(),
            lab_location.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
