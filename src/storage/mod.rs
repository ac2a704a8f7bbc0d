mod memory;

pub use memory::MemoryStore;

use crate::model::{CompetitionResultRow, CompetitionSnapshot};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Backend(String),
}

/// Source of competition snapshots and home of the persisted result rows.
///
/// `replace_results` must delete and insert as one unit: readers see either
/// the old set or the new one, never a mix.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn get_competition(&self, competition_id: i64)
    -> Result<CompetitionSnapshot, StorageError>;
    async fn get_results(
        &self,
        competition_id: i64,
    ) -> Result<Vec<CompetitionResultRow>, StorageError>;
    async fn replace_results(
        &self,
        competition_id: i64,
        rows: &[CompetitionResultRow],
    ) -> Result<(), StorageError>;
    async fn mark_finalized(
        &self,
        competition_id: i64,
        finalized_at: NaiveDateTime,
    ) -> Result<(), StorageError>;
}
