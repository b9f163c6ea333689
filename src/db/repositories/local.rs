//! In-memory repository implementation.
//!
//! Backs the results store with hash maps behind `parking_lot` locks. Used
//! for unit testing and local development; behavior matches the contract a
//! SQL backend would provide (atomic overwrite-upsert on the
//! `(race_id, bib_number)` key, immutable terminal import runs).

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::super::error::{ErrorContext, RepositoryError, RepositoryResult};
use super::super::repository::ResultsRepository;
use crate::api::{
    CanonicalResult, ImportRun, ImportRunId, ImportRunUpdate, ImportStatus, NewImportRun, RaceId,
    RankAssignment, SourceFormat, StoredResult,
};

/// In-memory results store.
pub struct LocalRepository {
    results: RwLock<HashMap<(i64, u32), StoredResult>>,
    import_runs: RwLock<HashMap<i64, ImportRun>>,
    next_run_id: AtomicI64,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            results: RwLock::new(HashMap::new()),
            import_runs: RwLock::new(HashMap::new()),
            next_run_id: AtomicI64::new(1),
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultsRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn upsert_results(
        &self,
        race_id: RaceId,
        source: SourceFormat,
        records: &[CanonicalResult],
    ) -> RepositoryResult<usize> {
        let now = chrono::Utc::now();
        let mut results = self.results.write();
        for record in records {
            // Overwrite, not merge: ranks from earlier passes are cleared.
            results.insert(
                (race_id.value(), record.bib_number),
                StoredResult {
                    race_id,
                    result: record.clone(),
                    import_source: source,
                    overall_rank: None,
                    gender_rank: None,
                    category_rank: None,
                    imported_at: now,
                },
            );
        }
        Ok(records.len())
    }

    async fn fetch_results(&self, race_id: RaceId) -> RepositoryResult<Vec<StoredResult>> {
        let results = self.results.read();
        let mut rows: Vec<StoredResult> = results
            .values()
            .filter(|row| row.race_id == race_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.result.bib_number);
        Ok(rows)
    }

    async fn count_results(&self, race_id: RaceId) -> RepositoryResult<usize> {
        let results = self.results.read();
        Ok(results.values().filter(|row| row.race_id == race_id).count())
    }

    async fn apply_rankings(
        &self,
        race_id: RaceId,
        assignments: &[RankAssignment],
    ) -> RepositoryResult<usize> {
        let mut results = self.results.write();
        let mut updated = 0;
        for assignment in assignments {
            if let Some(row) = results.get_mut(&(race_id.value(), assignment.bib_number)) {
                row.overall_rank = assignment.overall_rank;
                row.gender_rank = assignment.gender_rank;
                row.category_rank = assignment.category_rank;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn create_import_run(&self, run: NewImportRun) -> RepositoryResult<ImportRunId> {
        let id = ImportRunId::new(self.next_run_id.fetch_add(1, Ordering::SeqCst));
        let record = ImportRun {
            id,
            race_id: run.race_id,
            file_name: run.file_name,
            source_format: run.source_format,
            checksum: run.checksum,
            imported_by: run.imported_by,
            total_rows: run.total_rows,
            successful_rows: 0,
            failed_rows: 0,
            errors: Vec::new(),
            status: ImportStatus::Processing,
            started_at: chrono::Utc::now(),
            completed_at: None,
        };
        self.import_runs.write().insert(id.value(), record);
        Ok(id)
    }

    async fn update_import_run(
        &self,
        run_id: ImportRunId,
        update: ImportRunUpdate,
    ) -> RepositoryResult<()> {
        let mut runs = self.import_runs.write();
        let run = runs.get_mut(&run_id.value()).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Import run {} not found", run_id),
                ErrorContext::new("update_import_run")
                    .with_entity("import_run")
                    .with_entity_id(run_id),
            )
        })?;

        if run.status.is_terminal() {
            return Err(RepositoryError::validation(format!(
                "Import run {} is already {:?} and cannot be updated",
                run_id, run.status
            )));
        }

        run.successful_rows = update.successful_rows;
        run.failed_rows = update.failed_rows;
        run.errors = update.errors;
        run.status = update.status;
        run.completed_at = Some(update.completed_at);
        Ok(())
    }

    async fn get_import_run(&self, run_id: ImportRunId) -> RepositoryResult<ImportRun> {
        self.import_runs
            .read()
            .get(&run_id.value())
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Import run {} not found", run_id)))
    }

    async fn list_import_runs(&self, race_id: RaceId) -> RepositoryResult<Vec<ImportRun>> {
        let runs = self.import_runs.read();
        let mut rows: Vec<ImportRun> = runs
            .values()
            .filter(|run| run.race_id == race_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.started_at.cmp(&a.started_at).then(b.id.value().cmp(&a.id.value())));
        Ok(rows)
    }
}
