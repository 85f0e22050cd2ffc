use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SlotGridError {
    LabelCountMismatch { labels: usize, rows: usize },
    RowWidthMismatch { row: usize, width: usize, days: usize },
}

impl fmt::Display for SlotGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotGridError::LabelCountMismatch { labels, rows } => write!(
                f,
                "slot grid has {labels} time labels but {rows} rows"
            ),
            SlotGridError::RowWidthMismatch { row, width, days } => write!(
                f,
                "slot grid row {row} has {width} cells but there are {days} days"
            ),
        }
    }
}

impl std::error::Error for SlotGridError {}

/// The fixed day x time-slot template grid, independent of any user
/// selection. Each cell holds an opaque slot token (e.g. "T1") or nothing.
/// Built once from the external source and never mutated; rebuild a fresh
/// grid and swap it if the source changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotGrid {
    days: Vec<String>,
    time_labels: Vec<String>,
    cells: Vec<Vec<Option<String>>>,
}

impl SlotGrid {
    pub fn new(
        days: Vec<String>,
        time_labels: Vec<String>,
        cells: Vec<Vec<Option<String>>>,
    ) -> Result<Self, SlotGridError> {
        if time_labels.len() != cells.len() {
            return Err(SlotGridError::LabelCountMismatch {
                labels: time_labels.len(),
                rows: cells.len(),
            });
        }
        for (row, row_cells) in cells.iter().enumerate() {
            if row_cells.len() != days.len() {
                return Err(SlotGridError::RowWidthMismatch {
                    row,
                    width: row_cells.len(),
                    days: days.len(),
                });
            }
        }
        Ok(Self {
            days,
            time_labels,
            cells,
        })
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn time_labels(&self) -> &[String] {
        &self.time_labels
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn slot_at(&self, row: usize, day_idx: usize) -> Option<&str> {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(day_idx))
            .and_then(|cell| cell.as_deref())
    }
}
