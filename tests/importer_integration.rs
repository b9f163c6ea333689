//! Integration tests for the import orchestrator: idempotent re-import,
//! batch-level failure, chunk-failure accounting and ranking-trigger
//! tolerance, driven through the public `run_import` entry point.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use raceday_rust::api::{
    CanonicalResult, ImportRun, ImportRunId, ImportRunUpdate, ImportStatus, NewImportRun, RaceId,
    RankAssignment, SourceFormat, StoredResult,
};
use raceday_rust::db::{LocalRepository, RepositoryError, RepositoryResult, ResultsRepository};
use raceday_rust::parser::StatusLexicon;
use raceday_rust::services::{
    run_import, ImportError, ImporterConfig, NoopRankingEngine, RankingEngine, RankingError,
};

const GENERIC_HEADER: &str = "Dossard,Nom,Prénom,Sexe,Catégorie,Temps,Statut";

fn csv_with_rows(count: usize) -> String {
    let mut content = format!("{}\n", GENERIC_HEADER);
    for bib in 1..=count {
        content.push_str(&format!("{},Nom{},Prenom{},M,SEM,00:45:{:02},\n", bib, bib, bib, bib % 60));
    }
    content
}

fn deps() -> (Arc<dyn ResultsRepository>, Arc<dyn RankingEngine>) {
    (
        Arc::new(LocalRepository::new()),
        Arc::new(NoopRankingEngine),
    )
}

// =========================================================
// Happy path and idempotency
// =========================================================

#[tokio::test]
async fn test_reimport_is_idempotent() {
    let (repo, ranking) = deps();
    let lexicon = StatusLexicon::default();
    let content = csv_with_rows(5);
    let race = RaceId::new(1);

    for _ in 0..2 {
        let summary = run_import(
            &repo,
            &ranking,
            &lexicon,
            ImporterConfig::default(),
            race,
            "results.csv",
            &content,
            "organizer@example.com",
        )
        .await
        .unwrap();
        assert_eq!(summary.success_count, 5);
    }

    // Same stored set as importing once: no duplicates, last write wins.
    assert_eq!(repo.count_results(race).await.unwrap(), 5);
    // Both runs are recorded for audit.
    assert_eq!(repo.list_import_runs(race).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_run_records_parse_errors_and_metadata() {
    let (repo, ranking) = deps();
    let lexicon = StatusLexicon::default();
    let content = format!(
        "{}\n1,Dupont,Jean,M,SEM,00:45:30,\nabc,Martin,Luc,M,SEM,00:46:00,\n",
        GENERIC_HEADER
    );

    let summary = run_import(
        &repo,
        &ranking,
        &lexicon,
        ImporterConfig::default(),
        RaceId::new(1),
        "results.csv",
        &content,
        "organizer@example.com",
    )
    .await
    .unwrap();

    let run = repo.get_import_run(summary.run_id).await.unwrap();
    assert_eq!(run.source_format, SourceFormat::Csv);
    assert_eq!(run.checksum.len(), 64);
    assert_eq!(run.imported_by, "organizer@example.com");
    assert_eq!(run.total_rows, 1);
    assert_eq!(run.errors.len(), 1);
    assert_eq!(run.errors[0].row, 3);
    assert_eq!(run.status, ImportStatus::Completed);
}

// =========================================================
// Batch-level failure
// =========================================================

#[tokio::test]
async fn test_zero_parsed_results_aborts_before_any_write() {
    let (repo, ranking) = deps();
    let lexicon = StatusLexicon::default();

    let err = run_import(
        &repo,
        &ranking,
        &lexicon,
        ImporterConfig::default(),
        RaceId::new(1),
        "results.csv",
        &format!("{}\n", GENERIC_HEADER),
        "organizer@example.com",
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ImportError::NoResults { .. }));
    assert!(err.to_string().contains("results.csv"));
    assert_eq!(repo.count_results(RaceId::new(1)).await.unwrap(), 0);
}

// =========================================================
// Partial chunk failure
// =========================================================

/// Repository double whose upsert fails for every even-numbered call.
struct FlakyRepository {
    inner: LocalRepository,
    upsert_calls: AtomicUsize,
}

impl FlakyRepository {
    fn new() -> Self {
        Self {
            inner: LocalRepository::new(),
            upsert_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ResultsRepository for FlakyRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.inner.health_check().await
    }

    async fn upsert_results(
        &self,
        race_id: RaceId,
        source: SourceFormat,
        records: &[CanonicalResult],
    ) -> RepositoryResult<usize> {
        let call = self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if call % 2 == 1 {
            return Err(RepositoryError::connection("simulated outage"));
        }
        self.inner.upsert_results(race_id, source, records).await
    }

    async fn fetch_results(&self, race_id: RaceId) -> RepositoryResult<Vec<StoredResult>> {
        self.inner.fetch_results(race_id).await
    }

    async fn count_results(&self, race_id: RaceId) -> RepositoryResult<usize> {
        self.inner.count_results(race_id).await
    }

    async fn apply_rankings(
        &self,
        race_id: RaceId,
        assignments: &[RankAssignment],
    ) -> RepositoryResult<usize> {
        self.inner.apply_rankings(race_id, assignments).await
    }

    async fn create_import_run(&self, run: NewImportRun) -> RepositoryResult<ImportRunId> {
        self.inner.create_import_run(run).await
    }

    async fn update_import_run(
        &self,
        run_id: ImportRunId,
        update: ImportRunUpdate,
    ) -> RepositoryResult<()> {
        self.inner.update_import_run(run_id, update).await
    }

    async fn get_import_run(&self, run_id: ImportRunId) -> RepositoryResult<ImportRun> {
        self.inner.get_import_run(run_id).await
    }

    async fn list_import_runs(&self, race_id: RaceId) -> RepositoryResult<Vec<ImportRun>> {
        self.inner.list_import_runs(race_id).await
    }
}

#[tokio::test]
async fn test_chunk_failures_are_counted_not_fatal() {
    let repo: Arc<dyn ResultsRepository> = Arc::new(FlakyRepository::new());
    let ranking: Arc<dyn RankingEngine> = Arc::new(NoopRankingEngine);
    let lexicon = StatusLexicon::default();
    // 10 rows in chunks of 3: 4 chunks, calls 1 and 3 (0-based) fail.
    let content = csv_with_rows(10);
    let race = RaceId::new(1);

    let summary = run_import(
        &repo,
        &ranking,
        &lexicon,
        ImporterConfig { chunk_size: 3 },
        race,
        "results.csv",
        &content,
        "organizer@example.com",
    )
    .await
    .unwrap();

    // Chunks are [3, 3, 3, 1]; the second and fourth writes fail.
    assert_eq!(summary.success_count, 6);
    assert_eq!(summary.failed_count, 4);

    // The run still completes; failed rows are surfaced, not retried.
    let run = repo.get_import_run(summary.run_id).await.unwrap();
    assert_eq!(run.status, ImportStatus::Completed);
    assert_eq!(run.successful_rows, 6);
    assert_eq!(run.failed_rows, 4);

    assert_eq!(repo.count_results(race).await.unwrap(), 6);
}

// =========================================================
// Ranking trigger tolerance
// =========================================================

struct FailingRankingEngine;

#[async_trait]
impl RankingEngine for FailingRankingEngine {
    async fn recompute_rankings(&self, _race_id: RaceId) -> Result<(), RankingError> {
        Err(RankingError::Repository(RepositoryError::connection(
            "ranking store down",
        )))
    }
}

#[tokio::test]
async fn test_ranking_failure_does_not_fail_the_import() {
    let (repo, _) = deps();
    let ranking: Arc<dyn RankingEngine> = Arc::new(FailingRankingEngine);
    let lexicon = StatusLexicon::default();

    let summary = run_import(
        &repo,
        &ranking,
        &lexicon,
        ImporterConfig::default(),
        RaceId::new(1),
        "results.csv",
        &csv_with_rows(3),
        "organizer@example.com",
    )
    .await
    .unwrap();

    assert_eq!(summary.success_count, 3);
    let run = repo.get_import_run(summary.run_id).await.unwrap();
    assert_eq!(run.status, ImportStatus::Completed);
}
