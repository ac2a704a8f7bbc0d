//! Game types a competition can be played under.
//!
//! Each variant supplies the same three operations: its default settings,
//! validation of stored settings, and scoring of a round. Adding a game type
//! means adding a variant here and the compiler points at every match that
//! needs a new arm.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

use crate::error::ResultsError;
use crate::model::{HOLES, RoundScore};

const DEFAULT_STABLEFORD_BASE: i32 = 2;
const MAX_STABLEFORD_BASE: i32 = 10;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    #[default]
    StrokePlay,
    Stableford,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "game_type", rename_all = "snake_case")]
pub enum GameSettings {
    StrokePlay,
    Stableford { base_points: i32 },
}

impl GameType {
    pub const ALL: [GameType; 2] = [GameType::StrokePlay, GameType::Stableford];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            GameType::StrokePlay => "stroke_play",
            GameType::Stableford => "stableford",
        }
    }

    #[must_use]
    pub fn default_settings(self) -> GameSettings {
        match self {
            GameType::StrokePlay => GameSettings::StrokePlay,
            GameType::Stableford => GameSettings::Stableford {
                base_points: DEFAULT_STABLEFORD_BASE,
            },
        }
    }

    /// Validate stored settings for this game type and turn them into typed
    /// settings. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Will return `InvalidSettings` if the value is not an object, carries
    /// keys the game type does not know, or a value is out of range.
    pub fn validate_settings(self, raw: &Value) -> Result<GameSettings, ResultsError> {
        let empty = Map::new();
        let object = match raw {
            Value::Null => &empty,
            Value::Object(object) => object,
            other => {
                return Err(ResultsError::InvalidSettings(format!(
                    "{} settings must be an object, got {other}",
                    self.id()
                )));
            }
        };
        let known: &[&str] = match self {
            GameType::StrokePlay => &[],
            GameType::Stableford => &["base_points"],
        };
        if let Some(key) = object.keys().find(|k| !known.contains(&k.as_str())) {
            return Err(ResultsError::InvalidSettings(format!(
                "unknown {} setting '{key}'",
                self.id()
            )));
        }

        match self {
            GameType::StrokePlay => Ok(GameSettings::StrokePlay),
            GameType::Stableford => {
                let base_points = match object.get("base_points") {
                    None => DEFAULT_STABLEFORD_BASE,
                    Some(v) => v
                        .as_i64()
                        .and_then(|n| i32::try_from(n).ok())
                        .filter(|n| (0..=MAX_STABLEFORD_BASE).contains(n))
                        .ok_or_else(|| {
                            ResultsError::InvalidSettings(format!(
                                "base_points must be an integer in 0..={MAX_STABLEFORD_BASE}, got {v}"
                            ))
                        })?,
                };
                Ok(GameSettings::Stableford { base_points })
            }
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if stored settings are present and invalid.
    pub fn settings(self, raw: Option<&Value>) -> Result<GameSettings, ResultsError> {
        match raw {
            Some(raw) => self.validate_settings(raw),
            None => Ok(self.default_settings()),
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for GameType {
    type Err = ResultsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        GameType::ALL
            .into_iter()
            .find(|g| g.id() == wanted)
            .ok_or_else(|| ResultsError::InvalidSettings(format!("unknown game type '{s}'")))
    }
}

impl GameSettings {
    #[must_use]
    pub fn game_type(&self) -> GameType {
        match self {
            GameSettings::StrokePlay => GameType::StrokePlay,
            GameSettings::Stableford { .. } => GameType::Stableford,
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            GameSettings::StrokePlay => json!({}),
            GameSettings::Stableford { base_points } => json!({ "base_points": base_points }),
        }
    }

    /// Score a card hole by hole. `strokes` are handicap strokes per hole; when
    /// given, each played hole is scored net of them.
    #[must_use]
    pub fn score_round(&self, scores: &[i32], pars: &[i32], strokes: Option<&[i32]>) -> RoundScore {
        let played = scores
            .iter()
            .zip(pars)
            .enumerate()
            .filter(|(_, (s, _))| **s > 0)
            .map(|(hole, (s, p))| {
                let received = strokes.and_then(|st| st.get(hole)).copied().unwrap_or(0);
                (s - received, *p)
            });

        match self {
            GameSettings::StrokePlay => {
                let (total, relative) = played
                    .fold((0, 0), |(total, relative), (strokes, par)| {
                        (total + strokes, relative + strokes - par)
                    });
                RoundScore {
                    score: total,
                    rank_value: relative,
                }
            }
            GameSettings::Stableford { base_points } => {
                let points: i32 = played
                    .map(|(strokes, par)| (base_points + par - strokes).max(0))
                    .sum();
                RoundScore {
                    score: points,
                    rank_value: -points,
                }
            }
        }
    }

    /// Score a round known only by its total, less the course handicap when
    /// one is given.
    #[must_use]
    pub fn score_manual_total(
        &self,
        manual_total: i32,
        total_par: i32,
        course_handicap: Option<i32>,
    ) -> RoundScore {
        let total = manual_total - course_handicap.unwrap_or(0);
        let relative = total - total_par;
        match self {
            GameSettings::StrokePlay => RoundScore {
                score: total,
                rank_value: relative,
            },
            GameSettings::Stableford { base_points } => {
                let holes = i32::try_from(HOLES).unwrap_or(18);
                let points = (base_points * holes - relative).max(0);
                RoundScore {
                    score: points,
                    rank_value: -points,
                }
            }
        }
    }
}
