use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ResultsError;
use crate::game::GameSettings;
use crate::model::{
    CompetitionResultRow, CompetitionSettings, CompetitionSnapshot, Course, ParticipantInput,
    ParticipantResult, RankedEntry, ScoringType, validate_snapshot,
};
use crate::score::handicap::{course_handicap, net_outcome};
use crate::score::metrics::{gross_score, has_invalid_hole, holes_played, relative_to_par};
use crate::score::points::{PointsSource, allocate_points};
use crate::score::ranking::{CompletionFacts, positions, rank_by};
use crate::storage::ResultStore;

/// Validated, per-competition inputs shared by every participant.
#[derive(Debug, Clone)]
pub struct ScoringContext<'a> {
    pub course: &'a Course,
    pub game: GameSettings,
    pub stroke_index: Option<&'a [i32]>,
}

impl<'a> ScoringContext<'a> {
    /// Validate a snapshot and pull out what scoring needs.
    ///
    /// With `require_stroke_index` set, net scoring without a stroke index is
    /// an error; otherwise strokes fall back to hole order.
    ///
    /// # Errors
    /// Returns `NotFound` when the competition has no course, any validation
    /// error from the snapshot, or `MissingStrokeIndex`.
    pub fn new(
        snapshot: &'a CompetitionSnapshot,
        require_stroke_index: bool,
    ) -> Result<Self, ResultsError> {
        let course = snapshot.course.as_ref().ok_or_else(|| {
            ResultsError::NotFound(format!(
                "course for competition {}",
                snapshot.competition_id
            ))
        })?;
        validate_snapshot(snapshot)?;
        let settings = &snapshot.settings;
        let game = settings
            .game_type
            .settings(settings.game_settings.as_ref())?;
        let stroke_index = course.stroke_index.as_deref();
        if settings.scoring_mode.includes_net() && stroke_index.is_none() {
            if require_stroke_index {
                return Err(ResultsError::MissingStrokeIndex);
            }
            tracing::warn!(
                competition_id = snapshot.competition_id,
                "no stroke index on course, handicap strokes fall back to hole order"
            );
        }
        Ok(Self {
            course,
            game,
            stroke_index,
        })
    }
}

/// Score one participant against the course. Manual totals bypass the
/// hole-by-hole math.
#[must_use]
pub fn build_participant_result(
    snapshot: &CompetitionSnapshot,
    ctx: &ScoringContext<'_>,
    participant: &ParticipantInput,
) -> ParticipantResult {
    let scores = participant.score.as_slice();
    let pars = ctx.course.pars.as_slice();
    let total_par = ctx.course.total_par();
    let played = holes_played(scores);
    let invalid = has_invalid_hole(scores);

    let facts = CompletionFacts {
        disqualified: participant.disqualified,
        manual_total: participant.manual_total.is_some(),
        holes_played: played,
        has_invalid_hole: invalid,
        locked: participant.locked,
        window_closed: snapshot.settings.window_closed,
    };

    let tee = snapshot.tee_override(participant.category_id);
    let slope = tee
        .and_then(|t| t.slope_rating)
        .unwrap_or_else(|| ctx.course.slope());
    let rating = tee
        .and_then(|t| t.course_rating)
        .unwrap_or_else(|| ctx.course.rating());
    let handicap = participant
        .handicap_index
        .map(|index| course_handicap(index, slope, rating, total_par));

    let mut result = ParticipantResult {
        participant_id: participant.participant_id,
        name: participant.name.clone(),
        team_id: participant.team_id,
        gross_total: 0,
        relative_to_par: 0,
        net_total: None,
        net_relative_to_par: None,
        course_handicap: handicap,
        holes_played: played,
        has_invalid_hole: invalid,
        has_manual_total: participant.manual_total.is_some(),
        is_locked: participant.locked,
        is_finished: facts.is_finished(),
        is_dq: participant.disqualified,
        is_dnf: facts.is_dnf(),
        start_time: participant.start_time,
        gross_round: ctx.game.score_round(scores, pars, None),
        net_round: None,
        position: None,
        points: None,
    };

    if let Some(total) = participant.manual_total {
        result.gross_total = total;
        result.relative_to_par = total - total_par;
        result.gross_round = ctx.game.score_manual_total(total, total_par, None);
        if let Some(handicap) = handicap {
            result.net_total = Some(total - handicap);
            result.net_relative_to_par = Some(total - handicap - total_par);
            result.net_round = Some(ctx.game.score_manual_total(total, total_par, Some(handicap)));
        }
        return result;
    }

    result.gross_total = gross_score(scores);
    result.relative_to_par = relative_to_par(scores, pars);
    if let Some(net) = net_outcome(scores, pars, handicap, ctx.stroke_index) {
        result.net_total = net.total;
        result.net_relative_to_par = Some(net.relative_to_par);
        if net.total.is_some() {
            result.net_round = Some(ctx.game.score_round(scores, pars, Some(&net.strokes[..])));
        }
    }
    result
}

#[must_use]
pub fn build_participant_results(
    snapshot: &CompetitionSnapshot,
    ctx: &ScoringContext<'_>,
) -> Vec<ParticipantResult> {
    snapshot
        .participants
        .iter()
        .map(|p| build_participant_result(snapshot, ctx, p))
        .collect()
}

/// Rank and pay the finished participants for one scoring type. Net only
/// considers players with a usable net round.
#[must_use]
pub fn rank_scoring_type(
    results: &[ParticipantResult],
    scoring_type: ScoringType,
    settings: &CompetitionSettings,
) -> Vec<RankedEntry> {
    let mut entries: Vec<(i32, RankedEntry)> = results
        .iter()
        .filter(|r| r.is_finished)
        .filter_map(|r| {
            let (round, relative) = match scoring_type {
                ScoringType::Gross => (r.gross_round, r.relative_to_par),
                ScoringType::Net => (r.net_round?, r.net_relative_to_par?),
            };
            Some((
                round.rank_value,
                RankedEntry {
                    participant_id: r.participant_id,
                    name: r.name.clone(),
                    scoring_type,
                    position: 0,
                    points: 0,
                    score: round.score,
                    relative_to_par: relative,
                },
            ))
        })
        .collect();

    let groups = rank_by(&mut entries, |(rank_value, _)| *rank_value);
    let field_size = settings.enrollment_override.unwrap_or(entries.len());
    let points = allocate_points(
        &groups,
        field_size,
        PointsSource::from_settings(settings),
        settings.points_multiplier,
    );
    tracing::debug!(
        %scoring_type,
        ranked = entries.len(),
        field_size,
        groups = groups.len(),
        "ranked scoring type"
    );

    entries
        .into_iter()
        .zip(positions(&groups))
        .zip(points)
        .map(|(((_, mut entry), position), points)| {
            entry.position = position;
            entry.points = points;
            entry
        })
        .collect()
}

/// Ranked entries for each scoring type a competition produces.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ResultSet {
    pub gross: Option<Vec<RankedEntry>>,
    pub net: Option<Vec<RankedEntry>>,
}

impl ResultSet {
    #[must_use]
    pub fn entries(&self, scoring_type: ScoringType) -> Option<&[RankedEntry]> {
        match scoring_type {
            ScoringType::Gross => self.gross.as_deref(),
            ScoringType::Net => self.net.as_deref(),
        }
    }

    /// Rows to persist, ordered by scoring type, position, then participant.
    #[must_use]
    pub fn rows(&self, competition_id: i64) -> Vec<CompetitionResultRow> {
        let mut rows: Vec<CompetitionResultRow> = [ScoringType::Gross, ScoringType::Net]
            .into_iter()
            .filter_map(|t| self.entries(t))
            .flatten()
            .map(|entry| CompetitionResultRow::from_entry(competition_id, entry))
            .collect();
        rows.sort_by(|a, b| {
            a.scoring_type
                .cmp(&b.scoring_type)
                .then_with(|| a.position.cmp(&b.position))
                .then_with(|| a.participant_id.cmp(&b.participant_id))
        });
        rows
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ComputedResults {
    pub competition_id: i64,
    pub participants: Vec<ParticipantResult>,
    pub results: ResultSet,
}

/// Compute the full result set for a competition without touching storage.
///
/// # Errors
/// Returns an error if the snapshot fails validation, has no course, or asks
/// for net results on a course without a stroke index.
pub fn compute_results(snapshot: &CompetitionSnapshot) -> Result<ComputedResults, ResultsError> {
    let ctx = ScoringContext::new(snapshot, true)?;
    let settings = &snapshot.settings;
    let mut participants = build_participant_results(snapshot, &ctx);

    let gross = settings
        .scoring_mode
        .includes_gross()
        .then(|| rank_scoring_type(&participants, ScoringType::Gross, settings));
    let net = settings
        .scoring_mode
        .includes_net()
        .then(|| rank_scoring_type(&participants, ScoringType::Net, settings));

    let primary = gross.as_deref().or(net.as_deref()).unwrap_or_default();
    for participant in &mut participants {
        if let Some(entry) = primary
            .iter()
            .find(|e| e.participant_id == participant.participant_id)
        {
            participant.position = Some(entry.position);
            participant.points = Some(entry.points);
        }
    }

    Ok(ComputedResults {
        competition_id: snapshot.competition_id,
        participants,
        results: ResultSet { gross, net },
    })
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FinalizeSummary {
    pub competition_id: i64,
    pub finalized_at: NaiveDateTime,
    pub rows_written: usize,
    pub results: ResultSet,
}

/// Finalize (or recalculate) a competition: replace every stored result row
/// and mark it finalized. Nothing is written if loading or scoring fails.
///
/// Callers must not run two finalizes for the same competition at once.
///
/// # Errors
/// Returns `NotFound` for an unknown competition or course, any scoring
/// error from [`compute_results`], or a storage error.
pub async fn finalize_competition(
    store: &dyn ResultStore,
    competition_id: i64,
    finalized_at: NaiveDateTime,
) -> Result<FinalizeSummary, ResultsError> {
    let snapshot = store.get_competition(competition_id).await?;
    let computed = compute_results(&snapshot)?;
    let rows = computed.results.rows(competition_id);

    store.replace_results(competition_id, &rows).await?;
    store.mark_finalized(competition_id, finalized_at).await?;
    tracing::info!(
        competition_id,
        rows = rows.len(),
        recalculated = snapshot.finalized_at.is_some(),
        "competition finalized"
    );

    Ok(FinalizeSummary {
        competition_id,
        finalized_at,
        rows_written: rows.len(),
        results: computed.results,
    })
}
