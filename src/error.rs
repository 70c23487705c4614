use thiserror::Error;

/// Errors at the I/O boundary (loading CSVs, exporting tables).
///
/// The KPI/trend/aggregate computations themselves are infallible: bad
/// input degrades to sentinel values ("0", "No data for previous week")
/// instead of surfacing as errors.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
