use clap::{Parser, ValueEnum};
use serde_json::Value;
use std::{fs, path::PathBuf};

use crate::error::ResultsError;
use crate::model::{CompetitionSnapshot, validate_snapshot};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    /// Finalize and print the result set.
    Results,
    /// Print the leaderboard (projected unless the snapshot is finalized).
    Leaderboard,
    /// Print team standings only.
    Teams,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Competition snapshot to score, as JSON.
    #[arg(
        short = 'i',
        long,
        value_name = "SNAPSHOT_JSON",
        value_parser = check_readable_file_and_json
    )]
    pub input: Value,
    #[arg(long, value_enum, default_value_t = View::Results)]
    pub view: View,
    /// Overrides the snapshot's points multiplier.
    #[arg(short = 'm', long, value_name = "MULTIPLIER")]
    pub multiplier: Option<f64>,
    /// Field size used for points instead of the number of finishers.
    #[arg(short = 'e', long, value_name = "PLAYERS")]
    pub enrollment: Option<usize>,
    /// Treat the competition window as closed.
    #[arg(long)]
    pub window_closed: bool,
    #[arg(long)]
    pub pretty: bool,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Args {
    /// The snapshot from `--input` with command-line overrides applied.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the JSON is not a competition snapshot or the
    /// overridden snapshot fails validation.
    pub fn snapshot(&self) -> Result<CompetitionSnapshot, ResultsError> {
        let mut snapshot: CompetitionSnapshot = serde_json::from_value(self.input.clone())?;
        if let Some(multiplier) = self.multiplier {
            snapshot.settings.points_multiplier = multiplier;
        }
        if let Some(enrollment) = self.enrollment {
            snapshot.settings.enrollment_override = Some(enrollment);
        }
        if self.window_closed {
            snapshot.settings.window_closed = true;
        }
        validate_snapshot(&snapshot)?;
        Ok(snapshot)
    }
}

/// # Errors
///
/// Will return `Err` if the file is not readable or is not a JSON object
pub fn check_readable_file_and_json(file: &str) -> Result<Value, String> {
    let path = PathBuf::from(file);
    if !path.is_file() {
        return Err(format!("The snapshot file '{file}' is not readable."));
    }
    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("The snapshot file '{file}' is not readable: {e}"))?;
    let json: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("The snapshot file '{file}' is not valid json: {e}"))?;
    if !json.is_object() {
        return Err(format!(
            "The snapshot file '{file}' is not in the correct format. Expected a JSON object."
        ));
    }
    Ok(json)
}
