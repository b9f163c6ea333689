//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! The core result and run types already derive Serialize/Deserialize and
//! are re-exported here.

use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    CanonicalResult, ImportRun, ParseOutcome, RowError, SourceFormat, StoredResult,
};

/// Maximum number of result rows and row errors returned by the preview
/// endpoint. Full files can reach tens of thousands of rows; the preview is
/// a sanity check, not a data dump.
pub const PREVIEW_LIMIT: usize = 10;

/// Request body for previewing a result file before committing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    /// Name of the uploaded file (used for format detection)
    pub file_name: String,
    /// Raw file content
    pub content: String,
}

/// Response for the preview endpoint: detected format plus the head of the
/// parse outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    /// Detected source format
    pub format: SourceFormat,
    /// First rows of the parsed outcome, at most [`PREVIEW_LIMIT`]
    pub results: Vec<CanonicalResult>,
    /// First row errors, at most [`PREVIEW_LIMIT`]
    pub errors: Vec<RowError>,
    /// Total parsed result rows (before truncation)
    pub total_results: usize,
    /// Total row errors (before truncation)
    pub total_errors: usize,
}

/// Request body for committing an import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Name of the uploaded file (used for format detection)
    pub file_name: String,
    /// Raw file content
    pub content: String,
    /// Identity of the importing organizer
    pub imported_by: String,
}

/// Response for import creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    /// Job ID for tracking the async processing
    pub job_id: String,
    /// Message about the operation
    pub message: String,
}

/// Job status response for async processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    /// Job ID
    pub job_id: String,
    /// Job status
    pub status: String,
    /// Log entries
    pub logs: Vec<crate::services::job_tracker::LogEntry>,
    /// Result if completed
    pub result: Option<serde_json::Value>,
}

/// Import run list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRunListResponse {
    /// Import runs, most recent first
    pub runs: Vec<ImportRun>,
    /// Total count
    pub total: usize,
}

/// Race results response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceResultsResponse {
    /// Stored results ordered by bib number
    pub results: Vec<StoredResult>,
    /// Total count
    pub total: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Results store connection status
    pub database: String,
}
