//! Result sinks: CSV tables and the JSON run summary.
//!
//! Writers take `&` slices, so a failed write leaves the in-memory results
//! untouched and the caller can retry or pick another sink.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{FailedStop, ResolvedStop};
use crate::report::RunSummary;

/// Column order of the resolved-stops table.
pub const RESOLVED_COLUMNS: [&str; 11] = [
    "route_name",
    "route_index",
    "stop_id",
    "stop_name",
    "original_latitude",
    "original_longitude",
    "snapped_latitude",
    "snapped_longitude",
    "formatted_address",
    "place_id",
    "search_query",
];

/// Column order of the failed-stops table.
pub const FAILED_COLUMNS: [&str; 3] = ["route_name", "stop_id", "stop_name"];

/// Errors from writing results.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct ResolvedRow<'a> {
    route_name: &'a str,
    route_index: usize,
    stop_id: &'a str,
    stop_name: &'a str,
    original_latitude: f64,
    original_longitude: f64,
    snapped_latitude: f64,
    snapped_longitude: f64,
    formatted_address: &'a str,
    place_id: &'a str,
    search_query: &'a str,
}

impl<'a> From<&'a ResolvedStop> for ResolvedRow<'a> {
    fn from(stop: &'a ResolvedStop) -> Self {
        Self {
            route_name: &stop.route_name,
            route_index: stop.route_index,
            stop_id: stop.stop_id.as_str(),
            stop_name: &stop.stop_name,
            original_latitude: stop.original.lat,
            original_longitude: stop.original.lng,
            snapped_latitude: stop.snapped.lat,
            snapped_longitude: stop.snapped.lng,
            formatted_address: &stop.formatted_address,
            place_id: &stop.place_id,
            search_query: &stop.matched_query,
        }
    }
}

#[derive(Serialize)]
struct FailedRow<'a> {
    route_name: &'a str,
    stop_id: &'a str,
    stop_name: &'a str,
}

/// Write the resolved-stops table. The header is written even when
/// `stops` is empty. Returns the number of data rows.
pub fn write_resolved<W: Write>(writer: W, stops: &[ResolvedStop]) -> Result<usize, OutputError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(RESOLVED_COLUMNS)?;
    for stop in stops {
        csv.serialize(ResolvedRow::from(stop))?;
    }
    csv.flush()?;
    Ok(stops.len())
}

/// Write the failed-stops table. Returns the number of data rows.
pub fn write_failed<W: Write>(writer: W, stops: &[FailedStop]) -> Result<usize, OutputError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(FAILED_COLUMNS)?;
    for stop in stops {
        csv.serialize(FailedRow {
            route_name: &stop.route_name,
            stop_id: stop.stop_id.as_str(),
            stop_name: &stop.stop_name,
        })?;
    }
    csv.flush()?;
    Ok(stops.len())
}

/// JSON document written for a run summary.
#[derive(Debug, Serialize)]
pub struct SummaryDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub region: &'a str,
    pub success_rate: f64,
    pub geocode_requests: usize,
    pub cancelled: bool,
    #[serde(flatten)]
    pub summary: &'a RunSummary,
}

/// Write a run summary as pretty-printed JSON.
pub fn write_summary<W: Write>(writer: W, document: &SummaryDocument<'_>) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(writer, document)?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, OutputError> {
    // Create parent directories if needed
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|source| OutputError::Create {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| OutputError::Create {
            path: path.to_path_buf(),
            source,
        })
}

/// Write the resolved-stops table to `path`.
pub fn write_resolved_csv(path: impl AsRef<Path>, stops: &[ResolvedStop]) -> Result<usize, OutputError> {
    write_resolved(create(path.as_ref())?, stops)
}

/// Write the failed-stops table to `path`.
pub fn write_failed_csv(path: impl AsRef<Path>, stops: &[FailedStop]) -> Result<usize, OutputError> {
    write_failed(create(path.as_ref())?, stops)
}

/// Write a run summary to `path`.
pub fn write_summary_json(
    path: impl AsRef<Path>,
    document: &SummaryDocument<'_>,
) -> Result<(), OutputError> {
    let mut writer = create(path.as_ref())?;
    write_summary(&mut writer, document)?;
    writer.flush()?;
    Ok(())
}
