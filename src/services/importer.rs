//! Import orchestrator.
//!
//! Drives one upload end to end: detect the format, parse, record an import
//! run, write results to the store in chunks, finalize the run and trigger a
//! ranking recomputation. Chunk write failures are counted but never abort
//! the run; a later chunk still gets its chance.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::api::{
    ImportRunUpdate, ImportStatus, ImportSummary, NewImportRun, RaceId,
};
use crate::db::{calculate_checksum, RepositoryConfig, RepositoryError, ResultsRepository, DEFAULT_CHUNK_SIZE};
use crate::parser::{detect_format, parse_any, StatusLexicon};
use crate::services::job_tracker::{JobTracker, LogLevel};
use crate::services::ranking::RankingEngine;

/// Importer tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct ImporterConfig {
    /// Number of result records per store write.
    pub chunk_size: usize,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ImporterConfig {
    /// Resolve the chunk size from `repository.toml` if present, then the
    /// `IMPORT_CHUNK_SIZE` environment variable, then the default.
    pub fn from_env() -> Self {
        let mut chunk_size = RepositoryConfig::from_default_location()
            .map(|config| config.importer.chunk_size)
            .unwrap_or(DEFAULT_CHUNK_SIZE);
        if let Ok(raw) = std::env::var("IMPORT_CHUNK_SIZE") {
            if let Ok(parsed) = raw.parse::<usize>() {
                if parsed > 0 {
                    chunk_size = parsed;
                }
            }
        }
        Self { chunk_size }
    }
}

/// Errors that abort an import before any results reach the store.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The file parsed to zero result records. Nothing is written and no
    /// import run is recorded.
    #[error("no valid results found in '{file_name}'")]
    NoResults { file_name: String },

    #[error("import store failure: {0}")]
    Repository(#[from] RepositoryError),
}

/// Run one import end to end and return its summary.
///
/// Row-level parse errors and chunk write failures do not abort the run;
/// they are counted on the finalized import run record. The ranking
/// recomputation afterwards is best effort: its failure is logged but does
/// not fail an import whose data is already committed.
#[allow(clippy::too_many_arguments)]
pub async fn run_import(
    repository: &Arc<dyn ResultsRepository>,
    ranking: &Arc<dyn RankingEngine>,
    lexicon: &StatusLexicon,
    config: ImporterConfig,
    race_id: RaceId,
    file_name: &str,
    content: &str,
    imported_by: &str,
) -> Result<ImportSummary, ImportError> {
    let format = detect_format(file_name, content);
    let checksum = calculate_checksum(content);
    info!(
        race_id = race_id.value(),
        file_name,
        format = %format,
        "starting import"
    );

    let outcome = parse_any(file_name, content, lexicon);
    if outcome.results.is_empty() {
        return Err(ImportError::NoResults {
            file_name: file_name.to_string(),
        });
    }
    info!(
        results = outcome.results.len(),
        parse_errors = outcome.errors.len(),
        "file parsed"
    );

    let run_id = repository
        .create_import_run(NewImportRun {
            race_id,
            file_name: file_name.to_string(),
            source_format: format,
            checksum,
            imported_by: imported_by.to_string(),
            total_rows: outcome.results.len(),
        })
        .await?;

    let mut success_count = 0usize;
    let mut failed_count = 0usize;
    for chunk in outcome.results.chunks(config.chunk_size.max(1)) {
        match repository.upsert_results(race_id, format, chunk).await {
            Ok(written) => success_count += written,
            Err(err) => {
                warn!(
                    run_id = run_id.value(),
                    chunk_len = chunk.len(),
                    error = %err,
                    "chunk write failed"
                );
                failed_count += chunk.len();
            }
        }
    }

    repository
        .update_import_run(
            run_id,
            ImportRunUpdate {
                successful_rows: success_count,
                failed_rows: failed_count,
                errors: outcome.errors,
                status: ImportStatus::Completed,
                completed_at: Utc::now(),
            },
        )
        .await?;
    info!(
        run_id = run_id.value(),
        success_count, failed_count, "import run finalized"
    );

    if let Err(err) = ranking.recompute_rankings(race_id).await {
        warn!(
            race_id = race_id.value(),
            error = %err,
            "ranking recomputation failed after import"
        );
    }

    Ok(ImportSummary {
        run_id,
        success_count,
        failed_count,
    })
}

/// Background wrapper around [`run_import`] that reports progress through a
/// [`JobTracker`] so clients can stream logs while the import runs.
#[allow(clippy::too_many_arguments)]
pub async fn run_import_job(
    job_tracker: JobTracker,
    job_id: String,
    repository: Arc<dyn ResultsRepository>,
    ranking: Arc<dyn RankingEngine>,
    lexicon: StatusLexicon,
    config: ImporterConfig,
    race_id: RaceId,
    file_name: String,
    content: String,
    imported_by: String,
) {
    job_tracker.log(
        &job_id,
        LogLevel::Info,
        format!("importing '{}' for race {}", file_name, race_id),
    );

    match run_import(
        &repository,
        &ranking,
        &lexicon,
        config,
        race_id,
        &file_name,
        &content,
        &imported_by,
    )
    .await
    {
        Ok(summary) => {
            job_tracker.log(
                &job_id,
                LogLevel::Success,
                format!(
                    "import complete: {} written, {} failed",
                    summary.success_count, summary.failed_count
                ),
            );
            job_tracker.complete_job(
                &job_id,
                Some(serde_json::json!({
                    "run_id": summary.run_id.value(),
                    "success_count": summary.success_count,
                    "failed_count": summary.failed_count,
                })),
            );
        }
        Err(err) => {
            job_tracker.fail_job(&job_id, err.to_string());
        }
    }
}
