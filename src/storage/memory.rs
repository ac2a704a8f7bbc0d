use ahash::RandomState;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{ResultStore, StorageError};
use crate::model::{CompetitionResultRow, CompetitionSnapshot};

/// In-process store, used by the CLI and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    competitions: RwLock<HashMap<i64, CompetitionSnapshot, RandomState>>,
    results: RwLock<HashMap<i64, Vec<CompetitionResultRow>, RandomState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_competitions(snapshots: impl IntoIterator<Item = CompetitionSnapshot>) -> Self {
        let competitions = snapshots
            .into_iter()
            .map(|s| (s.competition_id, s))
            .collect();
        Self {
            competitions: RwLock::new(competitions),
            results: RwLock::default(),
        }
    }

    /// Add or replace a competition snapshot, e.g. after scores changed.
    pub async fn put_competition(&self, snapshot: CompetitionSnapshot) {
        self.competitions
            .write()
            .await
            .insert(snapshot.competition_id, snapshot);
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn get_competition(
        &self,
        competition_id: i64,
    ) -> Result<CompetitionSnapshot, StorageError> {
        self.competitions
            .read()
            .await
            .get(&competition_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("competition {competition_id}")))
    }

    async fn get_results(
        &self,
        competition_id: i64,
    ) -> Result<Vec<CompetitionResultRow>, StorageError> {
        Ok(self
            .results
            .read()
            .await
            .get(&competition_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_results(
        &self,
        competition_id: i64,
        rows: &[CompetitionResultRow],
    ) -> Result<(), StorageError> {
        if !self.competitions.read().await.contains_key(&competition_id) {
            return Err(StorageError::NotFound(format!("competition {competition_id}")));
        }
        self.results
            .write()
            .await
            .insert(competition_id, rows.to_vec());
        Ok(())
    }

    async fn mark_finalized(
        &self,
        competition_id: i64,
        finalized_at: NaiveDateTime,
    ) -> Result<(), StorageError> {
        let mut competitions = self.competitions.write().await;
        let snapshot = competitions
            .get_mut(&competition_id)
            .ok_or_else(|| StorageError::NotFound(format!("competition {competition_id}")))?;
        snapshot.finalized_at = Some(finalized_at);
        Ok(())
    }
}
