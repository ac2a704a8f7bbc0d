pub mod args;
pub mod error;
pub mod game;
pub mod model;
pub mod score;
pub mod storage;

pub use error::ResultsError;
