pub mod catalog;
pub mod course;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod persistence;
pub mod prepare;
pub mod slot_grid;
pub mod timetable;

pub use catalog::{Catalog, CourseSummary};
pub use course::{Course, CourseMeeting, SessionType};
pub use persistence::{
    PersistenceError, load_catalog_from_csv, load_slot_grid_from_csv, save_timetable_to_csv,
    save_timetable_to_json, timetable_to_csv_string,
};
pub use prepare::prepare_course_table;
pub use slot_grid::{SlotGrid, SlotGridError};
pub use timetable::{
    CellContent, ClashReport, Occupant, PersonalizedTimetable, TimetableError, assemble_timetable,
};
