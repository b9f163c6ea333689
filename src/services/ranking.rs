//! Ranking engine collaborator.
//!
//! The import orchestrator triggers a ranking recomputation after every run;
//! the computation itself is a collaborator behind [`RankingEngine`].
//! `recompute_rankings` must be idempotent and safe to call repeatedly: it
//! derives overall/gender/category placements from the current full result
//! set for the race, whatever that happens to be.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{RaceId, RankAssignment, ResultStatus, StoredResult};
use crate::db::{RepositoryError, ResultsRepository};
use crate::models::parse_duration;

/// Error type for ranking recomputation.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("ranking store failure: {0}")]
    Repository(#[from] RepositoryError),
}

/// Recomputes placements for a race from its stored results.
#[async_trait]
pub trait RankingEngine: Send + Sync {
    async fn recompute_rankings(&self, race_id: RaceId) -> Result<(), RankingError>;
}

/// Ranking engine that does nothing. Useful when rankings are computed by
/// an external system reacting to store writes.
pub struct NoopRankingEngine;

#[async_trait]
impl RankingEngine for NoopRankingEngine {
    async fn recompute_rankings(&self, _race_id: RaceId) -> Result<(), RankingError> {
        Ok(())
    }
}

/// Ranking engine backed by the results repository.
///
/// Finishers with a parseable finish time are ordered by elapsed seconds
/// (ties broken by bib number) and numbered 1..n overall, per gender and
/// per category. Non-finishers and finishers without a usable time are
/// left unranked.
pub struct LocalRankingEngine {
    repository: Arc<dyn ResultsRepository>,
}

impl LocalRankingEngine {
    pub fn new(repository: Arc<dyn ResultsRepository>) -> Self {
        Self { repository }
    }
}

/// Best available elapsed seconds for ranking: finish time first, then net,
/// then gun.
fn ranking_seconds(row: &StoredResult) -> Option<u32> {
    if row.result.status != ResultStatus::Finished {
        return None;
    }
    [&row.result.finish_time, &row.result.net_time, &row.result.gun_time]
        .into_iter()
        .flatten()
        .find_map(|time| parse_duration(time))
}

#[async_trait]
impl RankingEngine for LocalRankingEngine {
    async fn recompute_rankings(&self, race_id: RaceId) -> Result<(), RankingError> {
        let rows = self.repository.fetch_results(race_id).await?;

        let mut ranked: Vec<(u32, u32, &StoredResult)> = rows
            .iter()
            .filter_map(|row| ranking_seconds(row).map(|secs| (secs, row.result.bib_number, row)))
            .collect();
        ranked.sort_by_key(|(secs, bib, _)| (*secs, *bib));

        let mut assignments: HashMap<u32, RankAssignment> = rows
            .iter()
            .map(|row| {
                (
                    row.result.bib_number,
                    RankAssignment {
                        bib_number: row.result.bib_number,
                        overall_rank: None,
                        gender_rank: None,
                        category_rank: None,
                    },
                )
            })
            .collect();

        let mut gender_counters: HashMap<crate::api::Gender, u32> = HashMap::new();
        let mut category_counters: HashMap<String, u32> = HashMap::new();

        for (position, (_, bib, row)) in ranked.iter().enumerate() {
            let Some(assignment) = assignments.get_mut(bib) else {
                continue;
            };
            assignment.overall_rank = Some(position as u32 + 1);

            if let Some(gender) = row.result.gender {
                let counter = gender_counters.entry(gender).or_insert(0);
                *counter += 1;
                assignment.gender_rank = Some(*counter);
            }
            if let Some(category) = &row.result.category {
                let counter = category_counters.entry(category.clone()).or_insert(0);
                *counter += 1;
                assignment.category_rank = Some(*counter);
            }
        }

        let assignments: Vec<RankAssignment> = assignments.into_values().collect();
        let updated = self.repository.apply_rankings(race_id, &assignments).await?;
        tracing::debug!(race_id = race_id.value(), updated, "rankings recomputed");
        Ok(())
    }
}
