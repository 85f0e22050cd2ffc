use crate::course::{Course, SessionType, location_column_name, slot_column_name};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Listing entry surfaced to the user when picking courses. Only courses with
/// a credit value are selectable; credit-less rows stay in the catalog so they
/// still resolve during grid assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub code: String,
    pub name: String,
    pub credit: f64,
}

/// The full set of known courses keyed by course code, backed by a DataFrame
/// with one row per course. Row order is the catalog order used for
/// deterministic clash ordering. Read-only once built; rebuild and swap a new
/// catalog if the source table changes.
pub struct Catalog {
    df: DataFrame,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        let schema = Self::default_schema();
        Self {
            df: DataFrame::empty_with_schema(&schema),
        }
    }

    pub fn from_courses<I>(courses: I) -> PolarsResult<Self>
    where
        I: IntoIterator<Item = Course>,
    {
        let mut catalog = Self::new();
        for course in courses {
            catalog.upsert_course(course)?;
        }
        Ok(catalog)
    }

    fn default_schema() -> Schema {
        let mut fields = vec![
            Field::new("code".into(), DataType::String),
            Field::new("name".into(), DataType::String),
            Field::new("credit".into(), DataType::Float64),
        ];
        for session_type in SessionType::ALL {
            fields.push(Field::new(
                slot_column_name(session_type).into(),
                DataType::List(Box::new(DataType::String)),
            ));
            fields.push(Field::new(
                location_column_name(session_type).into(),
                DataType::String,
            ));
        }
        Schema::from_iter(fields)
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Insert or replace a course. A duplicate code keeps its original
    /// position in catalog order but takes the last-seen definition.
    pub fn upsert_course(&mut self, course: Course) -> PolarsResult<()> {
        if self.df.height() > 0 {
            let exists = self
                .df
                .column("code")?
                .str()?
                .into_iter()
                .any(|existing| existing == Some(course.code.as_str()));
            if exists {
                let mut courses = self.courses()?;
                for existing in courses.iter_mut() {
                    if existing.code == course.code {
                        *existing = course.clone();
                    }
                }
                self.df = DataFrame::empty_with_schema(&Self::default_schema());
                for replacement in courses {
                    self.df = self.df.vstack(&replacement.to_dataframe_row()?)?;
                }
                return Ok(());
            }
        }
        let new_row = course.to_dataframe_row()?;
        self.df = self.df.vstack(&new_row)?;
        Ok(())
    }

    /// All courses in catalog order.
    pub fn courses(&self) -> PolarsResult<Vec<Course>> {
        let df = self.dataframe();
        let mut courses = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            courses.push(Course::from_dataframe_row(df, idx)?);
        }
        Ok(courses)
    }

    /// Pure lookup; an unknown code is not an error.
    pub fn find(&self, code: &str) -> PolarsResult<Option<Course>> {
        if self.df.height() == 0 {
            return Ok(None);
        }
        let codes = self.df.column("code")?.str()?;
        for (idx, code_opt) in codes.into_iter().enumerate() {
            if code_opt == Some(code) {
                let course = Course::from_dataframe_row(self.dataframe(), idx)?;
                return Ok(Some(course));
            }
        }
        Ok(None)
    }

    /// The user-facing listing, filtered to courses that carry a credit value.
    pub fn selectable_courses(&self) -> PolarsResult<Vec<CourseSummary>> {
        let df = self.dataframe();
        let mut summaries = Vec::new();
        if df.height() == 0 {
            return Ok(summaries);
        }
        let codes = df.column("code")?.str()?;
        let names = df.column("name")?.str()?;
        let credits = df.column("credit")?.f64()?;
        for idx in 0..df.height() {
            let Some(credit) = credits.get(idx) else {
                continue;
            };
            summaries.push(CourseSummary {
                code: codes.get(idx).unwrap_or("").to_string(),
                name: names.get(idx).unwrap_or("").to_string(),
                credit,
            });
        }
        Ok(summaries)
    }
}
