use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    Lecture,
    Tutorial,
    Lab,
}

impl SessionType {
    /// Fixed traversal order used everywhere a course's meetings are walked.
    pub const ALL: [SessionType; 3] = [SessionType::Lecture, SessionType::Tutorial, SessionType::Lab];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Lecture => "Lecture",
            SessionType::Tutorial => "Tutorial",
            SessionType::Lab => "Lab",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Lecture" => Some(SessionType::Lecture),
            "Tutorial" => Some(SessionType::Tutorial),
            "Lab" => Some(SessionType::Lab),
            _ => None,
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recurring weekly meeting of a course. A meeting exists only when at
/// least one slot token is present; a blank or "nan" time field means the
/// course has no meetings of that session type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseMeeting {
    pub session_type: SessionType,
    pub slots: Vec<String>,
    pub location: Option<String>,
}

impl CourseMeeting {
    pub fn new<I, S>(session_type: SessionType, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            session_type,
            slots: slots.into_iter().map(Into::into).collect(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Build a meeting from the raw time/location text fields of the source
    /// table. Returns `None` when the time field carries no slot tokens.
    pub fn from_fields(
        session_type: SessionType,
        time_field: &str,
        location_field: &str,
    ) -> Option<Self> {
        let slots = parse_slot_list(time_field);
        if slots.is_empty() {
            return None;
        }
        Some(Self {
            session_type,
            slots,
            location: normalize_text(location_field),
        })
    }

    pub fn occupies(&self, slot_id: &str) -> bool {
        self.slots.iter().any(|slot| slot == slot_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub credit: Option<f64>,
    pub lecture: Option<CourseMeeting>,
    pub tutorial: Option<CourseMeeting>,
    pub lab: Option<CourseMeeting>,
}

impl Course {
    pub fn new(code: impl Into<String>, name: impl Into<String>, credit: Option<f64>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            credit,
            lecture: None,
            tutorial: None,
            lab: None,
        }
    }

    pub fn with_meeting(mut self, meeting: CourseMeeting) -> Self {
        self.set_meeting(meeting);
        self
    }

    pub fn set_meeting(&mut self, meeting: CourseMeeting) {
        match meeting.session_type {
            SessionType::Lecture => self.lecture = Some(meeting),
            SessionType::Tutorial => self.tutorial = Some(meeting),
            SessionType::Lab => self.lab = Some(meeting),
        }
    }

    pub fn meeting(&self, session_type: SessionType) -> Option<&CourseMeeting> {
        match session_type {
            SessionType::Lecture => self.lecture.as_ref(),
            SessionType::Tutorial => self.tutorial.as_ref(),
            SessionType::Lab => self.lab.as_ref(),
        }
    }

    /// Meetings in the fixed [Lecture, Tutorial, Lab] order.
    pub fn meetings(&self) -> impl Iterator<Item = &CourseMeeting> {
        SessionType::ALL
            .iter()
            .filter_map(|session_type| self.meeting(*session_type))
    }

    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(9);

        let code_data: [&str; 1] = [self.code.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("code"), code_data).into_column());

        let name_data: [&str; 1] = [self.name.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("name"), name_data).into_column());

        let credit_data: [Option<f64>; 1] = [self.credit];
        columns.push(Series::new(PlSmallStr::from_static("credit"), credit_data).into_column());

        for session_type in SessionType::ALL {
            let meeting = self.meeting(session_type);
            let slots: Vec<&str> = meeting
                .map(|m| m.slots.iter().map(String::as_str).collect())
                .unwrap_or_default();
            columns.push(
                Self::series_from_str_list(slot_column_name(session_type), &slots).into_column(),
            );

            let location: [Option<&str>; 1] =
                [meeting.and_then(|m| m.location.as_deref())];
            columns.push(
                Series::new(location_column_name(session_type).into(), location).into_column(),
            );
        }

        DataFrame::new(columns)
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let code = df
            .column("code")?
            .str()?
            .get(row_idx)
            .ok_or_else(|| PolarsError::ComputeError("course row missing code".into()))?
            .to_string();

        let name = df
            .column("name")?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        let credit = df.column("credit")?.f64()?.get(row_idx);

        let mut course = Course::new(code, name, credit);
        for session_type in SessionType::ALL {
            let slots = Self::vec_from_string_list(
                df.column(slot_column_name(session_type))?.list()?,
                row_idx,
            )?;
            if slots.is_empty() {
                continue;
            }
            let location = df
                .column(location_column_name(session_type))?
                .str()?
                .get(row_idx)
                .map(ToOwned::to_owned);
            course.set_meeting(CourseMeeting {
                session_type,
                slots,
                location,
            });
        }
        Ok(course)
    }

    fn series_from_str_list(name: &str, values: &[&str]) -> Series {
        let inner = Series::new(PlSmallStr::from_static(""), values.to_vec());
        Series::new(name.into(), &[inner])
    }

    fn vec_from_string_list(list: &ListChunked, row_idx: usize) -> PolarsResult<Vec<String>> {
        if let Some(series) = list.get_as_series(row_idx) {
            Ok(series
                .str()?
                .into_iter()
                .flatten()
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>())
        } else {
            Ok(Vec::new())
        }
    }
}

pub(crate) fn slot_column_name(session_type: SessionType) -> &'static str {
    match session_type {
        SessionType::Lecture => "lecture_slots",
        SessionType::Tutorial => "tutorial_slots",
        SessionType::Lab => "lab_slots",
    }
}

pub(crate) fn location_column_name(session_type: SessionType) -> &'static str {
    match session_type {
        SessionType::Lecture => "lecture_location",
        SessionType::Tutorial => "tutorial_location",
        SessionType::Lab => "lab_location",
    }
}

/// Normalize a free-text field: blank or the "nan" sentinel the source table
/// uses for missing values collapses to `None`.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split a comma-separated slot field into tokens, trimming whitespace and
/// dropping empties. A missing/"nan" field yields no tokens.
pub fn parse_slot_list(raw: &str) -> Vec<String> {
    match normalize_text(raw) {
        Some(value) => value
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        None => Vec::new(),
    }
}
