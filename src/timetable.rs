use crate::catalog::Catalog;
use crate::course::SessionType;
use crate::slot_grid::SlotGrid;
use polars::prelude::PolarsError;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug)]
pub enum TimetableError {
    /// The selection was empty; callers are expected to reject this before
    /// invoking assembly, and assembly rejects it again.
    EmptySelection,
    Catalog(PolarsError),
}

impl fmt::Display for TimetableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimetableError::EmptySelection => write!(f, "no courses selected"),
            TimetableError::Catalog(err) => write!(f, "catalog error: {err}"),
        }
    }
}

impl std::error::Error for TimetableError {}

impl From<PolarsError> for TimetableError {
    fn from(value: PolarsError) -> Self {
        TimetableError::Catalog(value)
    }
}

/// One course meeting occupying a grid cell. Each occupant keeps its own
/// location; locations are never merged across the occupants of a clash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occupant {
    pub code: String,
    pub name: String,
    pub session_type: SessionType,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellContent {
    Empty,
    Single(Occupant),
    Clash { occupants: Vec<Occupant> },
}

impl CellContent {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    pub fn is_clash(&self) -> bool {
        matches!(self, CellContent::Clash { .. })
    }

    pub fn occupants(&self) -> &[Occupant] {
        match self {
            CellContent::Empty => &[],
            CellContent::Single(occupant) => std::slice::from_ref(occupant),
            CellContent::Clash { occupants } => occupants,
        }
    }

    /// Full cell text as exported to CSV: the complete occupant record for a
    /// single booking, or the merged clash label for multi-occupant cells.
    pub fn display_label(&self) -> Option<String> {
        match self {
            CellContent::Empty => None,
            CellContent::Single(occupant) => {
                let mut lines = vec![
                    occupant.code.clone(),
                    occupant.name.clone(),
                    occupant.session_type.to_string(),
                ];
                if let Some(location) = &occupant.location {
                    lines.push(location.clone());
                }
                Some(lines.join("\n"))
            }
            CellContent::Clash { occupants } => {
                Some(format!("{}\n(Clash)", join_codes(occupants)))
            }
        }
    }

    /// Single-line cell text for terminal tables.
    pub fn compact_label(&self) -> Option<String> {
        match self {
            CellContent::Empty => None,
            CellContent::Single(occupant) => {
                Some(format!("{} {}", occupant.code, occupant.session_type))
            }
            CellContent::Clash { occupants } => {
                Some(format!("{} (Clash)", join_codes(occupants)))
            }
        }
    }

    /// Reader-friendly text used in the per-day JSON rendering.
    pub fn summary_text(&self) -> Option<String> {
        match self {
            CellContent::Empty => None,
            CellContent::Single(occupant) => {
                let mut parts = vec![occupant.name.clone(), occupant.session_type.to_string()];
                if let Some(location) = &occupant.location {
                    parts.push(location.clone());
                }
                Some(parts.join(", "))
            }
            CellContent::Clash { occupants } => {
                Some(format!("{} (Clash)", join_codes(occupants)))
            }
        }
    }
}

fn join_codes(occupants: &[Occupant]) -> String {
    occupants
        .iter()
        .map(|occupant| occupant.code.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// A clash cell flattened for reporting: which day and time slot, and the
/// occupant codes in the order they were discovered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClashReport {
    pub day: String,
    pub time_label: String,
    pub codes: Vec<String>,
}

/// A user's weekly timetable: the same shape as the slot grid, with each cell
/// resolved to its occupants. Derived fresh per request and discarded with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalizedTimetable {
    days: Vec<String>,
    time_labels: Vec<String>,
    cells: Vec<Vec<CellContent>>,
}

impl PersonalizedTimetable {
    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn time_labels(&self) -> &[String] {
        &self.time_labels
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, row: usize, day_idx: usize) -> Option<&CellContent> {
        self.cells.get(row).and_then(|cells| cells.get(day_idx))
    }

    /// Walk one day column top to bottom, pairing each cell with its time label.
    pub fn day_entries(&self, day_idx: usize) -> impl Iterator<Item = (&str, &CellContent)> {
        self.time_labels
            .iter()
            .zip(self.cells.iter())
            .filter_map(move |(label, row)| {
                row.get(day_idx).map(|cell| (label.as_str(), cell))
            })
    }

    pub fn clashes(&self) -> Vec<ClashReport> {
        let mut reports = Vec::new();
        for (row, cells) in self.cells.iter().enumerate() {
            for (day_idx, cell) in cells.iter().enumerate() {
                if let CellContent::Clash { occupants } = cell {
                    reports.push(ClashReport {
                        day: self.days[day_idx].clone(),
                        time_label: self.time_labels[row].clone(),
                        codes: occupants
                            .iter()
                            .map(|occupant| occupant.code.clone())
                            .collect(),
                    });
                }
            }
        }
        reports
    }

    /// The cleaned per-day JSON shape served by the web API: lowercase day
    /// keys, days with no classes omitted, one `{time, class}` entry per
    /// occupied slot.
    pub fn to_day_map(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (day_idx, day) in self.days.iter().enumerate() {
            let mut entries = Vec::new();
            for (label, cell) in self.day_entries(day_idx) {
                if let Some(text) = cell.summary_text() {
                    entries.push(json!({ "time": label, "class": text }));
                }
            }
            if !entries.is_empty() {
                map.insert(day.to_lowercase(), Value::Array(entries));
            }
        }
        Value::Object(map)
    }
}

/// Build a personalized timetable for the selected course codes.
///
/// Selection is a set: duplicates never double-count and the order of the
/// request does not matter. Unknown or credit-less codes contribute nothing.
/// Occupants inside a cell follow catalog order crossed with the fixed
/// [Lecture, Tutorial, Lab] session order, so identical requests always
/// produce identical clash labels. A course whose own sessions coincide in one
/// slot is flagged as a clash like any other multi-occupant cell.
pub fn assemble_timetable(
    catalog: &Catalog,
    slot_grid: &SlotGrid,
    selected_codes: &[String],
) -> Result<PersonalizedTimetable, TimetableError> {
    if selected_codes.is_empty() {
        return Err(TimetableError::EmptySelection);
    }

    let wanted: HashSet<&str> = selected_codes.iter().map(|code| code.trim()).collect();
    let courses: Vec<_> = catalog
        .courses()?
        .into_iter()
        .filter(|course| wanted.contains(course.code.as_str()))
        .collect();

    let days = slot_grid.days().to_vec();
    let time_labels = slot_grid.time_labels().to_vec();
    let mut cells = Vec::with_capacity(slot_grid.height());

    for row in 0..slot_grid.height() {
        let mut row_cells = Vec::with_capacity(days.len());
        for day_idx in 0..days.len() {
            let Some(slot_id) = slot_grid.slot_at(row, day_idx) else {
                row_cells.push(CellContent::Empty);
                continue;
            };

            let mut occupants = Vec::new();
            for course in &courses {
                for session_type in SessionType::ALL {
                    let Some(meeting) = course.meeting(session_type) else {
                        continue;
                    };
                    if meeting.occupies(slot_id) {
                        occupants.push(Occupant {
                            code: course.code.clone(),
                            name: course.name.clone(),
                            session_type,
                            location: meeting.location.clone(),
                        });
                    }
                }
            }

            row_cells.push(match occupants.len() {
                0 => CellContent::Empty,
                1 => CellContent::Single(occupants.remove(0)),
                _ => CellContent::Clash { occupants },
            });
        }
        cells.push(row_cells);
    }

    Ok(PersonalizedTimetable {
        days,
        time_labels,
        cells,
    })
}
