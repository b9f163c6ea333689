//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::ResultsRepository;
use crate::parser::StatusLexicon;
use crate::services::{ImporterConfig, JobTracker, RankingEngine};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for results storage
    pub repository: Arc<dyn ResultsRepository>,
    /// Ranking engine triggered after each import
    pub ranking: Arc<dyn RankingEngine>,
    /// Tracker for background import jobs
    pub job_tracker: JobTracker,
    /// Status word table shared by all parses
    pub lexicon: Arc<StatusLexicon>,
    /// Importer tuning knobs
    pub importer_config: ImporterConfig,
}

impl AppState {
    /// Create a new application state with the given repository and ranking
    /// engine.
    pub fn new(repository: Arc<dyn ResultsRepository>, ranking: Arc<dyn RankingEngine>) -> Self {
        Self {
            repository,
            ranking,
            job_tracker: JobTracker::new(),
            lexicon: Arc::new(StatusLexicon::default()),
            importer_config: ImporterConfig::from_env(),
        }
    }
}
