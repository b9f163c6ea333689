//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! existing service layer for business logic.

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;

use super::dto::{
    HealthResponse, ImportRequest, ImportResponse, ImportRunListResponse, JobStatusResponse,
    PreviewRequest, PreviewResponse, RaceResultsResponse, PREVIEW_LIMIT,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::RaceId;
use crate::parser::{detect_format, parse_any};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Preview
// =============================================================================

/// POST /v1/results/preview
///
/// Parse an uploaded file without writing anything, returning the detected
/// format and the first rows so the organizer can eyeball the mapping.
pub async fn preview_results(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> HandlerResult<PreviewResponse> {
    let lexicon = state.lexicon.clone();

    // Parsing large files is CPU-bound, keep it off the async runtime.
    let response = tokio::task::spawn_blocking(move || {
        let format = detect_format(&request.file_name, &request.content);
        let mut outcome = parse_any(&request.file_name, &request.content, &lexicon);
        let total_results = outcome.results.len();
        let total_errors = outcome.errors.len();
        outcome.results.truncate(PREVIEW_LIMIT);
        outcome.errors.truncate(PREVIEW_LIMIT);
        PreviewResponse {
            format,
            results: outcome.results,
            errors: outcome.errors,
            total_results,
            total_errors,
        }
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    Ok(Json(response))
}

// =============================================================================
// Imports
// =============================================================================

/// POST /v1/races/{race_id}/imports
///
/// Commit an import asynchronously. Returns a job ID for tracking progress.
pub async fn create_import(
    State(state): State<AppState>,
    Path(race_id): Path<i64>,
    Json(request): Json<ImportRequest>,
) -> Result<(axum::http::StatusCode, Json<ImportResponse>), AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    let job_id = state.job_tracker.create_job();
    let response_job_id = job_id.clone();

    let tracker = state.job_tracker.clone();
    let repo = state.repository.clone();
    let ranking = state.ranking.clone();
    let lexicon = (*state.lexicon).clone();
    let config = state.importer_config;

    tokio::spawn(async move {
        crate::services::run_import_job(
            tracker,
            job_id,
            repo,
            ranking,
            lexicon,
            config,
            RaceId::new(race_id),
            request.file_name,
            request.content,
            request.imported_by,
        )
        .await;
    });

    Ok((
        axum::http::StatusCode::ACCEPTED,
        Json(ImportResponse {
            job_id: response_job_id.clone(),
            message: format!(
                "Import started. Track progress at /v1/jobs/{}/logs",
                response_job_id
            ),
        }),
    ))
}

/// GET /v1/races/{race_id}/imports
///
/// List import runs for a race, most recent first.
pub async fn list_import_runs(
    State(state): State<AppState>,
    Path(race_id): Path<i64>,
) -> HandlerResult<ImportRunListResponse> {
    let runs = state
        .repository
        .list_import_runs(RaceId::new(race_id))
        .await?;
    let total = runs.len();

    Ok(Json(ImportRunListResponse { runs, total }))
}

// =============================================================================
// Results
// =============================================================================

/// GET /v1/races/{race_id}/results
///
/// Get stored results for a race, ordered by bib number.
pub async fn get_race_results(
    State(state): State<AppState>,
    Path(race_id): Path<i64>,
) -> HandlerResult<RaceResultsResponse> {
    let results = state.repository.fetch_results(RaceId::new(race_id)).await?;
    let total = results.len();

    Ok(Json(RaceResultsResponse { results, total }))
}

// =============================================================================
// Async Job Management
// =============================================================================

/// GET /v1/jobs/{job_id}
///
/// Get the current status and logs of a background job.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<JobStatusResponse> {
    let job = state
        .job_tracker
        .get_job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    Ok(Json(JobStatusResponse {
        job_id: job.job_id,
        status: format!("{:?}", job.status).to_lowercase(),
        logs: job.logs,
        result: job.result,
    }))
}

/// GET /v1/jobs/{job_id}/logs
///
/// Stream job logs via Server-Sent Events (SSE).
pub async fn stream_job_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Verify job exists
    if state.job_tracker.get_job(&job_id).is_none() {
        return Err(AppError::NotFound(format!("Job {} not found", job_id)));
    }

    let tracker = state.job_tracker.clone();
    let stream = async_stream::stream! {
        let mut last_log_count = 0;
        loop {
            // Send new logs since last check
            let logs = tracker.get_logs(&job_id);
            for log in logs.iter().skip(last_log_count) {
                let event_data = serde_json::to_string(log).unwrap_or_default();
                yield Ok(Event::default().data(event_data));
            }
            last_log_count = logs.len();

            // Check if job is complete
            if let Some(job) = tracker.get_job(&job_id) {
                if job.status != crate::services::job_tracker::JobStatus::Running {
                    let final_event = serde_json::json!({
                        "status": job.status,
                        "result": job.result,
                    });
                    yield Ok(Event::default()
                        .event("complete")
                        .data(serde_json::to_string(&final_event).unwrap_or_default()));
                    break;
                }
            } else {
                break;
            }

            // Wait before checking again
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}
