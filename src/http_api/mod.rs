use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    Catalog, CourseSummary, SlotGrid, TimetableError, assemble_timetable, load_catalog_from_csv,
    load_slot_grid_from_csv, timetable_to_csv_string,
};

/// The immutable data a request computes against. Handlers clone the `Arc`
/// snapshot and work outside the lock; a reload builds a fresh value and
/// swaps it in, so in-flight requests keep the tables they started with.
pub struct TimetableData {
    pub catalog: Catalog,
    pub slot_grid: SlotGrid,
}

#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub course_table: PathBuf,
    pub slot_grid: PathBuf,
}

#[derive(Clone)]
pub struct AppState {
    data: Arc<RwLock<Arc<TimetableData>>>,
    sources: Option<Arc<SourcePaths>>,
}

impl AppState {
    pub fn new(catalog: Catalog, slot_grid: SlotGrid) -> Self {
        Self {
            data: Arc::new(RwLock::new(Arc::new(TimetableData { catalog, slot_grid }))),
            sources: None,
        }
    }

    pub fn with_sources(catalog: Catalog, slot_grid: SlotGrid, sources: SourcePaths) -> Self {
        Self {
            data: Arc::new(RwLock::new(Arc::new(TimetableData { catalog, slot_grid }))),
            sources: Some(Arc::new(sources)),
        }
    }

    fn snapshot(&self) -> Arc<TimetableData> {
        self.data.read().clone()
    }

    fn swap(&self, data: TimetableData) {
        *self.data.write() = Arc::new(data);
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<polars::prelude::PolarsError> for ApiError {
    fn from(value: polars::prelude::PolarsError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl From<TimetableError> for ApiError {
    fn from(value: TimetableError) -> Self {
        match value {
            TimetableError::EmptySelection => ApiError::invalid(value.to_string()),
            TimetableError::Catalog(err) => ApiError::internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Conflict(message) => {
                let body = Json(ErrorBody {
                    error: "conflict",
                    message,
                });
                (StatusCode::CONFLICT, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal(message) => {
                let body = Json(ErrorBody {
                    error: "internal_error",
                    message,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimetablePayload {
    #[serde(default)]
    courses: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CoursesResponse {
    courses: Vec<CourseSummary>,
    days: Vec<String>,
    time_labels: Vec<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses))
        .route("/timetable", post(build_timetable))
        .route("/timetable/csv", post(build_timetable_csv))
        .route("/reload", post(reload_data))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<CoursesResponse>, ApiError> {
    let data = state.snapshot();
    let courses = data.catalog.selectable_courses()?;
    Ok(Json(CoursesResponse {
        courses,
        days: data.slot_grid.days().to_vec(),
        time_labels: data.slot_grid.time_labels().to_vec(),
    }))
}

async fn build_timetable(
    State(state): State<AppState>,
    Json(payload): Json<TimetablePayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if payload.courses.is_empty() {
        return Err(ApiError::invalid("no courses selected"));
    }
    let data = state.snapshot();
    let timetable = assemble_timetable(&data.catalog, &data.slot_grid, &payload.courses)?;
    Ok(Json(timetable.to_day_map()))
}

async fn build_timetable_csv(
    State(state): State<AppState>,
    Json(payload): Json<TimetablePayload>,
) -> Result<Response, ApiError> {
    if payload.courses.is_empty() {
        return Err(ApiError::invalid("no courses selected"));
    }
    let data = state.snapshot();
    let timetable = assemble_timetable(&data.catalog, &data.slot_grid, &payload.courses)?;
    let rendered =
        timetable_to_csv_string(&timetable).map_err(|err| ApiError::internal(err.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], rendered).into_response())
}

async fn reload_data(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(sources) = state.sources.clone() else {
        return Err(ApiError::Conflict(
            "no source files configured for reload".into(),
        ));
    };
    let catalog = load_catalog_from_csv(&sources.course_table)
        .map_err(|err| ApiError::internal(err.to_string()))?;
    let slot_grid = load_slot_grid_from_csv(&sources.slot_grid)
        .map_err(|err| ApiError::internal(err.to_string()))?;
    let course_count = catalog.len();
    state.swap(TimetableData { catalog, slot_grid });
    Ok(Json(json!({
        "status": "reloaded",
        "courses": course_count,
    })))
}
