//! Decoding of the JSON arrays a competition keeps in storage.
//!
//! Pars and cards fall back to neutral values when the stored text is
//! unusable; the stroke index has no safe default and errors instead.

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use crate::error::ResultsError;
use crate::model::{HoleScores, PointsTemplate, neutral_pars, validate_pars, validate_stroke_index};

/// Decode stored pars, falling back to a neutral par-72 layout.
#[must_use]
pub fn parse_pars_json(raw: Option<&str>) -> Vec<i32> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return neutral_pars();
    };
    match serde_json::from_str::<Vec<i32>>(raw) {
        Ok(pars) if validate_pars(&pars).is_ok() => pars,
        Ok(pars) => {
            tracing::warn!(holes = pars.len(), "stored pars are invalid, using neutral pars");
            neutral_pars()
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored pars are not a JSON array, using neutral pars");
            neutral_pars()
        }
    }
}

/// Decode a stored card. Unreadable cards are treated as not started.
#[must_use]
pub fn parse_score_json(raw: Option<&str>) -> HoleScores {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return HoleScores::default();
    };
    match serde_json::from_str::<Vec<i32>>(raw) {
        Ok(holes) => HoleScores::from(holes),
        Err(e) => {
            tracing::warn!(error = %e, "stored score is not a JSON array, treating as unplayed");
            HoleScores::default()
        }
    }
}

/// Decode a stored stroke index.
///
/// # Errors
///
/// Will return `MissingStrokeIndex` when nothing is stored and
/// `InvalidStrokeIndex` when the stored value is not a permutation of 1..=18.
pub fn parse_stroke_index_json(raw: Option<&str>) -> Result<Vec<i32>, ResultsError> {
    let raw = raw
        .filter(|s| !s.trim().is_empty())
        .ok_or(ResultsError::MissingStrokeIndex)?;
    let stroke_index: Vec<i32> = serde_json::from_str(raw)
        .map_err(|e| ResultsError::InvalidStrokeIndex(e.to_string()))?;
    validate_stroke_index(&stroke_index)?;
    Ok(stroke_index)
}

/// # Errors
///
/// Will return `Err` if the text is not JSON or not a well-formed template.
pub fn parse_points_template_json(raw: &str) -> Result<PointsTemplate, ResultsError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ResultsError::InvalidPointsTemplate(e.to_string()))?;
    PointsTemplate::from_json(&value)
}

/// Pars as a snapshot carries them: an array, the stored JSON text, or
/// nothing. Arrays of integers pass through untouched so validation still
/// sees them; anything else goes through [`parse_pars_json`].
pub(crate) fn pars_from_stored<'de, D>(deserializer: D) -> Result<Vec<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => neutral_pars(),
        Value::String(raw) => parse_pars_json(Some(&raw)),
        other => match serde_json::from_value::<Vec<i32>>(other.clone()) {
            Ok(pars) => pars,
            Err(_) => parse_pars_json(Some(&other.to_string())),
        },
    })
}

/// A card as a snapshot carries it: an array, the stored JSON text, or
/// nothing. Unreadable cards become unplayed.
pub(crate) fn score_from_stored<'de, D>(deserializer: D) -> Result<HoleScores, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => HoleScores::default(),
        Value::String(raw) => parse_score_json(Some(&raw)),
        other => parse_score_json(Some(&other.to_string())),
    })
}

/// Stroke index as a snapshot carries it. Stored text must still decode to a
/// permutation; there is no fallback.
pub(crate) fn stroke_index_from_stored<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(raw) if raw.trim().is_empty() => Ok(None),
        Value::String(raw) => parse_stroke_index_json(Some(&raw))
            .map(Some)
            .map_err(de::Error::custom),
        other => serde_json::from_value(other)
            .map(Some)
            .map_err(de::Error::custom),
    }
}
