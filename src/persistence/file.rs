use super::{PersistenceError, PersistenceResult};
use crate::catalog::Catalog;
use crate::course::{Course, CourseMeeting, SessionType, normalize_text};
use crate::slot_grid::SlotGrid;
use crate::timetable::PersonalizedTimetable;
use serde::Deserialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One row of the processed course table. Every field comes in as raw text;
/// normalization ("nan"/blank to absent, comma-splitting of slot lists)
/// happens in `into_course`, once, so nothing downstream re-parses.
#[derive(Debug, Default, Deserialize)]
struct CourseCsvRecord {
    #[serde(rename = "Course Code", default)]
    code: String,
    #[serde(rename = "Course Name", default)]
    name: String,
    #[serde(rename = "Credit", default)]
    credit: String,
    #[serde(rename = "Lecture Time", default)]
    lecture_time: String,
    #[serde(rename = "Tutorial Time", default)]
    tutorial_time: String,
    #[serde(rename = "Lab Time", default)]
    lab_time: String,
    #[serde(rename = "Lecture Location", default)]
    lecture_location: String,
    #[serde(rename = "Tutorial Location", default)]
    tutorial_location: String,
    #[serde(rename = "Lab Location", default)]
    lab_location: String,
}

impl CourseCsvRecord {
    fn time_field(&self, session_type: SessionType) -> &str {
        match session_type {
            SessionType::Lecture => &self.lecture_time,
            SessionType::Tutorial => &self.tutorial_time,
            SessionType::Lab => &self.lab_time,
        }
    }

    fn location_field(&self, session_type: SessionType) -> &str {
        match session_type {
            SessionType::Lecture => &self.lecture_location,
            SessionType::Tutorial => &self.tutorial_location,
            SessionType::Lab => &self.lab_location,
        }
    }

    fn into_course(self) -> Course {
        // "nan" parses as a float NaN, which must still count as no credit.
        let credit = normalize_text(&self.credit)
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|credit| credit.is_finite());
        let mut course = Course::new(self.code.trim(), self.name.trim(), credit);
        for session_type in SessionType::ALL {
            if let Some(meeting) = CourseMeeting::from_fields(
                session_type,
                self.time_field(session_type),
                self.location_field(session_type),
            ) {
                course.set_meeting(meeting);
            }
        }
        course
    }
}

/// Load the processed course table. Rows without a course code are skipped;
/// rows without a parseable credit are kept (they resolve during assembly but
/// are excluded from the selectable listing).
pub fn load_catalog_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Catalog> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut catalog = Catalog::new();
    for record in reader.deserialize::<CourseCsvRecord>() {
        let record = record?;
        if record.code.trim().is_empty() {
            continue;
        }
        catalog.upsert_course(record.into_course())?;
    }
    Ok(catalog)
}

/// Load the slot grid. The first column holds the human-readable time labels;
/// the remaining headers are the day names. Blank or "nan" cells carry no
/// slot token.
pub fn load_slot_grid_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<SlotGrid> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(PersistenceError::InvalidData(
            "slot grid file has no header row".into(),
        ));
    }
    let days: Vec<String> = headers
        .iter()
        .skip(1)
        .map(|day| day.trim().to_string())
        .collect();

    let mut time_labels = Vec::new();
    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record?;
        let label = record.get(0).unwrap_or("").trim().to_string();
        let mut row = Vec::with_capacity(days.len());
        for day_idx in 0..days.len() {
            row.push(record.get(day_idx + 1).and_then(normalize_text));
        }
        time_labels.push(label);
        cells.push(row);
    }

    SlotGrid::new(days, time_labels, cells)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

/// Render the timetable as CSV: label column plus one column per day, each
/// occupied cell holding its full multi-line display label.
pub fn timetable_to_csv_string(timetable: &PersonalizedTimetable) -> PersistenceResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Time Slot".to_string()];
    header.extend(timetable.days().iter().cloned());
    writer.write_record(&header)?;

    for (row, label) in timetable.time_labels().iter().enumerate() {
        let mut record = vec![label.clone()];
        for day_idx in 0..timetable.days().len() {
            let text = timetable
                .cell(row, day_idx)
                .and_then(|cell| cell.display_label())
                .unwrap_or_default();
            record.push(text);
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub fn save_timetable_to_csv<P: AsRef<Path>>(
    timetable: &PersonalizedTimetable,
    path: P,
) -> PersistenceResult<()> {
    let rendered = timetable_to_csv_string(timetable)?;
    let mut file = File::create(path)?;
    file.write_all(rendered.as_bytes())?;
    Ok(())
}

/// Persist the per-day JSON rendering (the same shape the web API serves).
pub fn save_timetable_to_json<P: AsRef<Path>>(
    timetable: &PersonalizedTimetable,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &timetable.to_day_map())?;
    Ok(())
}
