use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResultsError {
    #[error("invalid stroke index: {0}")]
    InvalidStrokeIndex(String),
    #[error("invalid par: {0}")]
    InvalidPar(String),
    #[error("handicap index {value} for participant {participant_id} is outside [-10, 54]")]
    HandicapOutOfRange { participant_id: i64, value: f64 },
    #[error("invalid points template: {0}")]
    InvalidPointsTemplate(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("net scoring requested but the course has no stroke index")]
    MissingStrokeIndex,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<StorageError> for ResultsError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => Self::NotFound(what),
            StorageError::Backend(msg) => Self::Storage(msg),
        }
    }
}

impl From<serde_json::Error> for ResultsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<std::io::Error> for ResultsError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
