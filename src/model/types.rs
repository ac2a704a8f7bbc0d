use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ResultsError;
use crate::game::GameType;
use crate::model::stored::{pars_from_stored, score_from_stored, stroke_index_from_stored};

pub const HOLES: usize = 18;
/// Hole not yet played.
pub const UNPLAYED: i32 = 0;
/// Hole attempted but no score reported (player gave up on the hole).
pub const UNREPORTED: i32 = -1;
pub const NEUTRAL_SLOPE: f64 = 113.0;
pub const NEUTRAL_HOLE_PAR: i32 = 4;
pub const MIN_HANDICAP_INDEX: f64 = -10.0;
pub const MAX_HANDICAP_INDEX: f64 = 54.0;

#[must_use]
pub fn neutral_pars() -> Vec<i32> {
    vec![NEUTRAL_HOLE_PAR; HOLES]
}

fn default_multiplier() -> f64 {
    1.0
}

/// One player's card, index-aligned with the course pars and stroke index.
///
/// Stored cards are not always 18 entries long, so deserializing pads with
/// `UNPLAYED`, truncates extra holes and maps anything below `UNREPORTED` to
/// `UNPLAYED`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(from = "Vec<i32>", into = "Vec<i32>")]
pub struct HoleScores(pub [i32; HOLES]);

impl HoleScores {
    #[must_use]
    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }
}

impl From<[i32; HOLES]> for HoleScores {
    fn from(value: [i32; HOLES]) -> Self {
        Self(value)
    }
}

impl From<Vec<i32>> for HoleScores {
    fn from(value: Vec<i32>) -> Self {
        if value.len() != HOLES {
            tracing::warn!(holes = value.len(), "score card is not 18 holes, normalizing");
        }
        let mut holes = [UNPLAYED; HOLES];
        for (slot, strokes) in holes.iter_mut().zip(value) {
            *slot = if strokes < UNREPORTED { UNPLAYED } else { strokes };
        }
        Self(holes)
    }
}

impl From<HoleScores> for Vec<i32> {
    fn from(value: HoleScores) -> Self {
        value.0.to_vec()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    #[default]
    Gross,
    Net,
    Both,
}

impl ScoringMode {
    #[must_use]
    pub fn includes_gross(self) -> bool {
        matches!(self, Self::Gross | Self::Both)
    }

    #[must_use]
    pub fn includes_net(self) -> bool {
        matches!(self, Self::Net | Self::Both)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScoringType {
    Gross,
    Net,
}

impl fmt::Display for ScoringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoringType::Gross => "gross",
            ScoringType::Net => "net",
        };
        write!(f, "{s}")
    }
}

/// Position -> points lookup, stored as `{"1": 25, "2": 18, "default": 1}`.
///
/// An optional `"multiplier"` key scales every looked-up value. The
/// competition multiplier still applies on top.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(
    try_from = "BTreeMap<String, Value>",
    into = "BTreeMap<String, Value>"
)]
pub struct PointsTemplate {
    positions: BTreeMap<usize, f64>,
    default: Option<f64>,
    multiplier: Option<f64>,
}

impl PointsTemplate {
    /// Build a template from a JSON object.
    ///
    /// # Errors
    /// Returns `InvalidPointsTemplate` if the value is not an object, a key is
    /// neither a positive position nor `default`/`multiplier`, or a value is
    /// not a finite non-negative number.
    pub fn from_json(value: &Value) -> Result<Self, ResultsError> {
        let object = value.as_object().ok_or_else(|| {
            ResultsError::InvalidPointsTemplate("template must be a JSON object".into())
        })?;
        let entries: BTreeMap<String, Value> = object
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self::try_from(entries)
    }

    /// Points for a position before any multiplier is applied.
    #[must_use]
    pub fn points_for(&self, position: usize) -> f64 {
        self.positions
            .get(&position)
            .copied()
            .or(self.default)
            .unwrap_or(0.0)
    }

    #[must_use]
    pub fn multiplier(&self) -> Option<f64> {
        self.multiplier
    }

    #[must_use]
    pub fn default_points(&self) -> Option<f64> {
        self.default
    }
}

fn template_number(key: &str, value: &Value) -> Result<f64, ResultsError> {
    match value.as_f64() {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(ResultsError::InvalidPointsTemplate(format!(
            "value for '{key}' must be a non-negative number, got {value}"
        ))),
    }
}

impl TryFrom<BTreeMap<String, Value>> for PointsTemplate {
    type Error = ResultsError;

    fn try_from(entries: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        let mut template = PointsTemplate::default();
        for (key, value) in &entries {
            match key.trim() {
                "default" => template.default = Some(template_number(key, value)?),
                "multiplier" => template.multiplier = Some(template_number(key, value)?),
                other => {
                    let position = other
                        .parse::<usize>()
                        .ok()
                        .filter(|p| *p > 0)
                        .ok_or_else(|| {
                            ResultsError::InvalidPointsTemplate(format!(
                                "'{key}' is not a position"
                            ))
                        })?;
                    template
                        .positions
                        .insert(position, template_number(key, value)?);
                }
            }
        }
        Ok(template)
    }
}

impl From<PointsTemplate> for BTreeMap<String, Value> {
    fn from(template: PointsTemplate) -> Self {
        let mut entries: BTreeMap<String, Value> = template
            .positions
            .into_iter()
            .map(|(position, points)| (position.to_string(), Value::from(points)))
            .collect();
        if let Some(default) = template.default {
            entries.insert("default".to_string(), Value::from(default));
        }
        if let Some(multiplier) = template.multiplier {
            entries.insert("multiplier".to_string(), Value::from(multiplier));
        }
        entries
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Course {
    #[serde(default = "neutral_pars", deserialize_with = "pars_from_stored")]
    pub pars: Vec<i32>,
    #[serde(default, deserialize_with = "stroke_index_from_stored")]
    pub stroke_index: Option<Vec<i32>>,
    #[serde(default)]
    pub course_rating: Option<f64>,
    #[serde(default)]
    pub slope_rating: Option<f64>,
}

impl Default for Course {
    fn default() -> Self {
        Self {
            pars: neutral_pars(),
            stroke_index: None,
            course_rating: None,
            slope_rating: None,
        }
    }
}

impl Course {
    #[must_use]
    pub fn total_par(&self) -> i32 {
        self.pars.iter().sum()
    }

    /// Course rating, defaulting to total par when the tee has no rating.
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.course_rating
            .unwrap_or_else(|| f64::from(self.total_par()))
    }

    #[must_use]
    pub fn slope(&self) -> f64 {
        self.slope_rating.unwrap_or(NEUTRAL_SLOPE)
    }
}

/// A category of players teeing off with different ratings. Stroke index is a
/// property of the course, so it is never overridden here.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TeeOverride {
    pub category_id: i64,
    #[serde(default)]
    pub course_rating: Option<f64>,
    #[serde(default)]
    pub slope_rating: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CompetitionSettings {
    #[serde(default)]
    pub scoring_mode: ScoringMode,
    #[serde(default)]
    pub points_template: Option<PointsTemplate>,
    #[serde(default = "default_multiplier")]
    pub points_multiplier: f64,
    #[serde(default)]
    pub window_closed: bool,
    #[serde(default)]
    pub enrollment_override: Option<usize>,
    #[serde(default)]
    pub game_type: GameType,
    #[serde(default)]
    pub game_settings: Option<Value>,
}

impl Default for CompetitionSettings {
    fn default() -> Self {
        Self {
            scoring_mode: ScoringMode::default(),
            points_template: None,
            points_multiplier: default_multiplier(),
            window_closed: false,
            enrollment_override: None,
            game_type: GameType::default(),
            game_settings: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct ParticipantInput {
    pub participant_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "score_from_stored")]
    pub score: HoleScores,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub disqualified: bool,
    #[serde(default)]
    pub manual_total: Option<i32>,
    #[serde(default)]
    pub handicap_index: Option<f64>,
    #[serde(default)]
    pub start_time: Option<NaiveDateTime>,
}

/// Everything the engine reads for one competition.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct CompetitionSnapshot {
    pub competition_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub course: Option<Course>,
    #[serde(default)]
    pub settings: CompetitionSettings,
    #[serde(default)]
    pub tee_overrides: Vec<TeeOverride>,
    #[serde(default)]
    pub participants: Vec<ParticipantInput>,
    #[serde(default)]
    pub finalized_at: Option<NaiveDateTime>,
}

impl CompetitionSnapshot {
    #[must_use]
    pub fn tee_override(&self, category_id: Option<i64>) -> Option<&TeeOverride> {
        let category_id = category_id?;
        self.tee_overrides
            .iter()
            .find(|tee| tee.category_id == category_id)
    }
}

/// Score of one round under a game type. `rank_value` is always "lower is
/// better"; `score` is what gets displayed and stored.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundScore {
    pub score: i32,
    pub rank_value: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ParticipantResult {
    pub participant_id: i64,
    pub name: String,
    pub team_id: Option<i64>,
    pub gross_total: i32,
    pub relative_to_par: i32,
    pub net_total: Option<i32>,
    pub net_relative_to_par: Option<i32>,
    pub course_handicap: Option<i32>,
    pub holes_played: usize,
    pub has_invalid_hole: bool,
    pub has_manual_total: bool,
    pub is_locked: bool,
    pub is_finished: bool,
    pub is_dq: bool,
    pub is_dnf: bool,
    pub start_time: Option<NaiveDateTime>,
    pub gross_round: RoundScore,
    pub net_round: Option<RoundScore>,
    pub position: Option<usize>,
    pub points: Option<i32>,
}

impl ParticipantResult {
    #[must_use]
    pub fn has_started(&self) -> bool {
        self.holes_played > 0 || self.has_manual_total
    }
}

/// One ranked line of a result set.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RankedEntry {
    pub participant_id: i64,
    pub name: String,
    pub scoring_type: ScoringType,
    pub position: usize,
    pub points: i32,
    pub score: i32,
    pub relative_to_par: i32,
}

/// Persisted result row. The full set for a competition is replaced on every
/// finalize.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CompetitionResultRow {
    pub competition_id: i64,
    pub participant_id: i64,
    pub scoring_type: ScoringType,
    pub position: usize,
    pub points: i32,
    pub score: i32,
    pub relative_to_par: i32,
}

impl CompetitionResultRow {
    #[must_use]
    pub fn from_entry(competition_id: i64, entry: &RankedEntry) -> Self {
        Self {
            competition_id,
            participant_id: entry.participant_id,
            scoring_type: entry.scoring_type,
            position: entry.position,
            points: entry.points,
            score: entry.score,
            relative_to_par: entry.relative_to_par,
        }
    }
}
