//! Results-store repository trait.
//!
//! Abstract interface over persistent keyed storage for race results and
//! import-run records, allowing different storage backends to be swapped
//! easily. The upsert key is `(race_id, bib_number)`; the backend is
//! expected to provide atomic upsert-by-key (a unique constraint with
//! conflict resolution), so the core needs no external locking.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{
    CanonicalResult, ImportRun, ImportRunId, ImportRunUpdate, NewImportRun, RaceId,
    RankAssignment, SourceFormat, StoredResult,
};

/// Repository trait for results and import-run storage.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ResultsRepository: Send + Sync {
    /// Check that the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Results ====================

    /// Upsert a batch of results for a race, keyed on `(race_id, bib_number)`.
    ///
    /// Conflict semantics are overwrite, not merge: a re-import fully
    /// replaces the prior record for a bib, including clearing any rank
    /// fields written by an earlier ranking pass.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows written
    /// * `Err(RepositoryError)` - If the batch write fails as a whole
    async fn upsert_results(
        &self,
        race_id: RaceId,
        source: SourceFormat,
        records: &[CanonicalResult],
    ) -> RepositoryResult<usize>;

    /// Fetch all stored results for a race, ordered by bib number.
    async fn fetch_results(&self, race_id: RaceId) -> RepositoryResult<Vec<StoredResult>>;

    /// Count stored results for a race.
    async fn count_results(&self, race_id: RaceId) -> RepositoryResult<usize>;

    /// Write rank assignments produced by the ranking engine.
    ///
    /// Bibs not present in `assignments` are left untouched.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows updated
    async fn apply_rankings(
        &self,
        race_id: RaceId,
        assignments: &[RankAssignment],
    ) -> RepositoryResult<usize>;

    // ==================== Import runs ====================

    /// Create an import run in `Processing` state.
    async fn create_import_run(&self, run: NewImportRun) -> RepositoryResult<ImportRunId>;

    /// Finalize an import run.
    ///
    /// Implementations must reject updates to a run already in a terminal
    /// state with a validation error; terminal runs are immutable.
    async fn update_import_run(
        &self,
        run_id: ImportRunId,
        update: ImportRunUpdate,
    ) -> RepositoryResult<()>;

    /// Fetch one import run.
    async fn get_import_run(&self, run_id: ImportRunId) -> RepositoryResult<ImportRun>;

    /// List import runs for a race, most recent first.
    async fn list_import_runs(&self, race_id: RaceId) -> RepositoryResult<Vec<ImportRun>>;
}
