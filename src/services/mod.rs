//! Service layer: import orchestration, ranking and job tracking.

pub mod importer;
pub mod job_tracker;
pub mod ranking;

pub use importer::{run_import, run_import_job, ImportError, ImporterConfig};
pub use job_tracker::{Job, JobStatus, JobTracker, LogEntry, LogLevel};
pub use ranking::{LocalRankingEngine, NoopRankingEngine, RankingEngine, RankingError};
