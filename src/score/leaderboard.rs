use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ResultsError;
use crate::model::{
    CompetitionResultRow, CompetitionSnapshot, ParticipantResult, RankedEntry, ScoringType,
};
use crate::score::finalizer::{ScoringContext, build_participant_results, rank_scoring_type};
use crate::score::ranking::compare_leaderboard_by;
use crate::score::team::{TeamStanding, aggregate_teams};
use crate::storage::ResultStore;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub participant_id: i64,
    pub name: String,
    pub team_id: Option<i64>,
    pub position: Option<usize>,
    pub points: Option<i32>,
    pub score: Option<i32>,
    pub relative_to_par: Option<i32>,
    pub holes_played: usize,
    pub is_finished: bool,
    pub is_dnf: bool,
    pub is_dq: bool,
    pub is_projected: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Leaderboard {
    pub competition_id: i64,
    pub is_projected: bool,
    pub gross: Option<Vec<LeaderboardEntry>>,
    pub net: Option<Vec<LeaderboardEntry>>,
    pub teams: Vec<TeamStanding>,
}

impl Leaderboard {
    #[must_use]
    pub fn entries(&self, scoring_type: ScoringType) -> Option<&[LeaderboardEntry]> {
        match scoring_type {
            ScoringType::Gross => self.gross.as_deref(),
            ScoringType::Net => self.net.as_deref(),
        }
    }
}

fn board_key(scoring_type: ScoringType) -> fn(&ParticipantResult) -> i32 {
    match scoring_type {
        ScoringType::Gross => |r| r.gross_round.rank_value,
        ScoringType::Net => |r| r.net_round.map_or(i32::MAX, |n| n.rank_value),
    }
}

/// Live line for a participant who has no ranked entry.
fn unranked_entry(
    result: &ParticipantResult,
    scoring_type: ScoringType,
    is_projected: bool,
) -> LeaderboardEntry {
    let started = result.has_started();
    let (score, relative) = match scoring_type {
        ScoringType::Gross => (
            started.then_some(result.gross_round.score),
            started.then_some(result.relative_to_par),
        ),
        ScoringType::Net => (
            result.net_round.map(|n| n.score),
            result.net_relative_to_par.filter(|_| started),
        ),
    };
    LeaderboardEntry {
        participant_id: result.participant_id,
        name: result.name.clone(),
        team_id: result.team_id,
        position: None,
        points: None,
        score,
        relative_to_par: relative,
        holes_played: result.holes_played,
        is_finished: result.is_finished,
        is_dnf: result.is_dnf,
        is_dq: result.is_dq,
        is_projected,
    }
}

/// Every participant in leaderboard order, with positions and points taken
/// from `ranked`.
fn projected_board(
    participants: &[ParticipantResult],
    ranked: &[RankedEntry],
    scoring_type: ScoringType,
) -> Vec<LeaderboardEntry> {
    let by_id: HashMap<i64, &RankedEntry, RandomState> =
        ranked.iter().map(|e| (e.participant_id, e)).collect();
    let key = board_key(scoring_type);
    let mut ordered: Vec<&ParticipantResult> = participants.iter().collect();
    ordered.sort_by(|a, b| compare_leaderboard_by(a, b, key));

    ordered
        .into_iter()
        .map(|result| {
            let mut entry = unranked_entry(result, scoring_type, true);
            if let Some(ranked) = by_id.get(&result.participant_id) {
                entry.position = Some(ranked.position);
                entry.points = Some(ranked.points);
                entry.score = Some(ranked.score);
                entry.relative_to_par = Some(ranked.relative_to_par);
            }
            entry
        })
        .collect()
}

/// Stored rows verbatim, then everyone without a row in leaderboard order.
fn stored_board(
    participants: &[ParticipantResult],
    rows: &[CompetitionResultRow],
    scoring_type: ScoringType,
) -> Vec<LeaderboardEntry> {
    let by_id: HashMap<i64, &ParticipantResult, RandomState> =
        participants.iter().map(|p| (p.participant_id, p)).collect();
    let rows: Vec<&CompetitionResultRow> = rows
        .iter()
        .filter(|row| row.scoring_type == scoring_type)
        .collect();

    let mut board: Vec<LeaderboardEntry> = rows
        .iter()
        .map(|row| {
            let result = by_id.get(&row.participant_id);
            LeaderboardEntry {
                participant_id: row.participant_id,
                name: result.map(|r| r.name.clone()).unwrap_or_default(),
                team_id: result.and_then(|r| r.team_id),
                position: Some(row.position),
                points: Some(row.points),
                score: Some(row.score),
                relative_to_par: Some(row.relative_to_par),
                holes_played: result.map_or(0, |r| r.holes_played),
                is_finished: true,
                is_dnf: false,
                is_dq: false,
                is_projected: false,
            }
        })
        .collect();

    let key = board_key(scoring_type);
    let mut rest: Vec<&ParticipantResult> = participants
        .iter()
        .filter(|p| !rows.iter().any(|row| row.participant_id == p.participant_id))
        .collect();
    rest.sort_by(|a, b| compare_leaderboard_by(a, b, key));
    board.extend(
        rest.into_iter()
            .map(|result| unranked_entry(result, scoring_type, false)),
    );
    board
}

/// Live leaderboard for a competition that has not been finalized. Points are
/// what the current finishers would earn if play closed now.
///
/// # Errors
/// Returns an error if the snapshot fails validation or has no course.
pub fn project_leaderboard(snapshot: &CompetitionSnapshot) -> Result<Leaderboard, ResultsError> {
    let ctx = ScoringContext::new(snapshot, false)?;
    let settings = &snapshot.settings;
    let participants = build_participant_results(snapshot, &ctx);

    let board = |scoring_type: ScoringType| {
        let ranked = rank_scoring_type(&participants, scoring_type, settings);
        projected_board(&participants, &ranked, scoring_type)
    };
    let gross = settings
        .scoring_mode
        .includes_gross()
        .then(|| board(ScoringType::Gross));
    let net = settings
        .scoring_mode
        .includes_net()
        .then(|| board(ScoringType::Net));

    Ok(Leaderboard {
        competition_id: snapshot.competition_id,
        is_projected: true,
        gross,
        net,
        teams: aggregate_teams(&participants, settings.points_multiplier),
    })
}

/// Leaderboard of a finalized competition, built from its stored rows.
///
/// # Errors
/// Returns an error if the snapshot fails validation or has no course.
pub fn stored_leaderboard(
    snapshot: &CompetitionSnapshot,
    rows: &[CompetitionResultRow],
) -> Result<Leaderboard, ResultsError> {
    let ctx = ScoringContext::new(snapshot, false)?;
    let settings = &snapshot.settings;
    let participants = build_participant_results(snapshot, &ctx);

    let has_rows = |t: ScoringType| rows.iter().any(|row| row.scoring_type == t);
    let gross = (settings.scoring_mode.includes_gross() || has_rows(ScoringType::Gross))
        .then(|| stored_board(&participants, rows, ScoringType::Gross));
    let net = (settings.scoring_mode.includes_net() || has_rows(ScoringType::Net))
        .then(|| stored_board(&participants, rows, ScoringType::Net));

    Ok(Leaderboard {
        competition_id: snapshot.competition_id,
        is_projected: false,
        gross,
        net,
        teams: aggregate_teams(&participants, settings.points_multiplier),
    })
}

/// Serve the leaderboard for a competition: stored results once it is
/// finalized, a projection before that.
///
/// # Errors
/// Returns `NotFound` for an unknown competition, or any storage or
/// validation error.
pub async fn load_leaderboard(
    store: &dyn ResultStore,
    competition_id: i64,
) -> Result<Leaderboard, ResultsError> {
    let snapshot = store.get_competition(competition_id).await?;
    if snapshot.finalized_at.is_some() {
        let rows = store.get_results(competition_id).await?;
        stored_leaderboard(&snapshot, &rows)
    } else {
        project_leaderboard(&snapshot)
    }
}
