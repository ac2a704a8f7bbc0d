use crate::error::ResultsError;
use crate::model::{
    CompetitionSnapshot, HOLES, MAX_HANDICAP_INDEX, MIN_HANDICAP_INDEX,
};

const MIN_HOLE_PAR: i32 = 3;
const MAX_HOLE_PAR: i32 = 6;
const MIN_SLOPE: f64 = 55.0;
const MAX_SLOPE: f64 = 155.0;

/// # Errors
///
/// Will return `Err` unless there are 18 pars, each in [3, 6].
pub fn validate_pars(pars: &[i32]) -> Result<(), ResultsError> {
    if pars.len() != HOLES {
        return Err(ResultsError::InvalidPar(format!(
            "expected {HOLES} pars, got {}",
            pars.len()
        )));
    }
    if let Some((hole, par)) = pars
        .iter()
        .enumerate()
        .find(|(_, par)| !(MIN_HOLE_PAR..=MAX_HOLE_PAR).contains(*par))
    {
        return Err(ResultsError::InvalidPar(format!(
            "hole {} has par {par}, expected {MIN_HOLE_PAR}..={MAX_HOLE_PAR}",
            hole + 1
        )));
    }
    Ok(())
}

/// # Errors
///
/// Will return `Err` unless the stroke index is a permutation of 1..=18.
pub fn validate_stroke_index(stroke_index: &[i32]) -> Result<(), ResultsError> {
    if stroke_index.len() != HOLES {
        return Err(ResultsError::InvalidStrokeIndex(format!(
            "expected {HOLES} entries, got {}",
            stroke_index.len()
        )));
    }
    let mut seen = [false; HOLES];
    for &value in stroke_index {
        let slot = usize::try_from(value)
            .ok()
            .filter(|v| (1..=HOLES).contains(v))
            .ok_or_else(|| {
                ResultsError::InvalidStrokeIndex(format!("{value} is outside 1..={HOLES}"))
            })?;
        if seen[slot - 1] {
            return Err(ResultsError::InvalidStrokeIndex(format!(
                "{value} appears more than once"
            )));
        }
        seen[slot - 1] = true;
    }
    Ok(())
}

/// # Errors
///
/// Will return `Err` if the handicap index is not a number in [-10, 54].
pub fn validate_handicap_index(participant_id: i64, value: f64) -> Result<(), ResultsError> {
    if value.is_finite() && (MIN_HANDICAP_INDEX..=MAX_HANDICAP_INDEX).contains(&value) {
        Ok(())
    } else {
        Err(ResultsError::HandicapOutOfRange {
            participant_id,
            value,
        })
    }
}

fn validate_ratings(
    what: &str,
    course_rating: Option<f64>,
    slope_rating: Option<f64>,
) -> Result<(), ResultsError> {
    if let Some(rating) = course_rating {
        if !rating.is_finite() || rating <= 0.0 {
            return Err(ResultsError::InvalidSettings(format!(
                "{what} course rating {rating} is not a positive number"
            )));
        }
    }
    if let Some(slope) = slope_rating {
        if !(MIN_SLOPE..=MAX_SLOPE).contains(&slope) {
            return Err(ResultsError::InvalidSettings(format!(
                "{what} slope rating {slope} is outside {MIN_SLOPE}..={MAX_SLOPE}"
            )));
        }
    }
    Ok(())
}

/// Validate everything about a snapshot that does not depend on the scoring
/// mode. A missing stroke index is checked by the callers that need one.
///
/// # Errors
///
/// Will return `Err` on the first invalid par, stroke index, rating, handicap
/// index, multiplier or game setting.
pub fn validate_snapshot(snapshot: &CompetitionSnapshot) -> Result<(), ResultsError> {
    if let Some(course) = &snapshot.course {
        validate_pars(&course.pars)?;
        if let Some(stroke_index) = &course.stroke_index {
            validate_stroke_index(stroke_index)?;
        }
        validate_ratings("course", course.course_rating, course.slope_rating)?;
    }
    for tee in &snapshot.tee_overrides {
        validate_ratings(
            &format!("category {}", tee.category_id),
            tee.course_rating,
            tee.slope_rating,
        )?;
    }

    let settings = &snapshot.settings;
    if !settings.points_multiplier.is_finite() || settings.points_multiplier < 0.0 {
        return Err(ResultsError::InvalidSettings(format!(
            "points multiplier {} must be a non-negative number",
            settings.points_multiplier
        )));
    }
    if settings.enrollment_override == Some(0) {
        return Err(ResultsError::InvalidSettings(
            "enrollment override must be at least 1".into(),
        ));
    }
    settings
        .game_type
        .settings(settings.game_settings.as_ref())?;

    for participant in &snapshot.participants {
        if let Some(index) = participant.handicap_index {
            validate_handicap_index(participant.participant_id, index)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Course, ParticipantInput};

    fn permutation() -> Vec<i32> {
        vec![7, 15, 1, 11, 3, 17, 5, 13, 9, 8, 16, 2, 12, 4, 18, 6, 14, 10]
    }

    #[test]
    fn pars_must_be_eighteen_in_range() {
        assert!(validate_pars(&[4; 18]).is_ok());
        assert!(matches!(
            validate_pars(&[4; 9]),
            Err(ResultsError::InvalidPar(_))
        ));
        let mut pars = vec![4; 18];
        pars[3] = 7;
        assert!(matches!(
            validate_pars(&pars),
            Err(ResultsError::InvalidPar(_))
        ));
    }

    #[test]
    fn stroke_index_rejects_duplicates_and_gaps() {
        assert!(validate_stroke_index(&permutation()).is_ok());

        let mut dup = permutation();
        dup[0] = 1;
        assert!(matches!(
            validate_stroke_index(&dup),
            Err(ResultsError::InvalidStrokeIndex(_))
        ));

        let mut gap = permutation();
        gap[0] = 19;
        assert!(validate_stroke_index(&gap).is_err());
        assert!(validate_stroke_index(&[1, 2, 3]).is_err());
    }

    #[test]
    fn handicap_index_bounds() {
        assert!(validate_handicap_index(1, -10.0).is_ok());
        assert!(validate_handicap_index(1, 54.0).is_ok());
        assert_eq!(
            validate_handicap_index(7, 54.1),
            Err(ResultsError::HandicapOutOfRange {
                participant_id: 7,
                value: 54.1
            })
        );
        assert!(validate_handicap_index(1, f64::NAN).is_err());
    }

    #[test]
    fn snapshot_checks_participants_and_ratings() {
        let mut snapshot = CompetitionSnapshot {
            competition_id: 1,
            course: Some(Course::default()),
            participants: vec![ParticipantInput {
                participant_id: 3,
                handicap_index: Some(12.4),
                ..ParticipantInput::default()
            }],
            ..CompetitionSnapshot::default()
        };
        assert!(validate_snapshot(&snapshot).is_ok());

        snapshot.participants[0].handicap_index = Some(-11.0);
        assert!(validate_snapshot(&snapshot).is_err());

        snapshot.participants[0].handicap_index = None;
        if let Some(course) = snapshot.course.as_mut() {
            course.slope_rating = Some(170.0);
        }
        assert!(matches!(
            validate_snapshot(&snapshot),
            Err(ResultsError::InvalidSettings(_))
        ));
    }
}
