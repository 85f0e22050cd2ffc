#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use timetable_tool::http_api::{self, AppState, SourcePaths};
    use timetable_tool::{load_catalog_from_csv, load_slot_grid_from_csv};

    let addr: SocketAddr = std::env::var("TIMETABLE_TOOL_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
        .parse()?;
    let course_table: PathBuf = std::env::var("TIMETABLE_TOOL_COURSE_TABLE")
        .map_err(|_| "TIMETABLE_TOOL_COURSE_TABLE must point at the course table CSV")?
        .into();
    let slot_grid_path: PathBuf = std::env::var("TIMETABLE_TOOL_SLOT_GRID")
        .map_err(|_| "TIMETABLE_TOOL_SLOT_GRID must point at the slot grid CSV")?
        .into();

    let catalog = load_catalog_from_csv(&course_table)?;
    let slot_grid = load_slot_grid_from_csv(&slot_grid_path)?;
    println!(
        "timetable-tool HTTP API listening on http://{addr} ({} courses)",
        catalog.len()
    );

    let state = AppState::with_sources(
        catalog,
        slot_grid,
        SourcePaths {
            course_table,
            slot_grid: slot_grid_path,
        },
    );
    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
