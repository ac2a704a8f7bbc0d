use ahash::RandomState;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::ParticipantResult;
use crate::score::points::{PointsSource, allocate_points};
use crate::score::ranking::{positions, tie_groups};

/// Declared in leaderboard order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamStatus {
    Finished,
    InProgress,
    NotStarted,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TeamStanding {
    pub team_id: i64,
    pub status: TeamStatus,
    pub display_progress: String,
    pub total_relative_score: i32,
    pub total_shots: i32,
    pub max_holes_completed: usize,
    pub earliest_start: Option<NaiveDateTime>,
    pub members: Vec<i64>,
    /// Relative-to-par of started members with clean cards, best first.
    pub countback: Vec<i32>,
    pub position: Option<usize>,
    pub team_points: Option<i32>,
}

/// Compare two teams' sorted member scores hole-for-hole. Running out of
/// players first loses.
#[must_use]
pub fn countback(a: &[i32], b: &[i32]) -> Ordering {
    for idx in 0..a.len().max(b.len()) {
        match (a.get(idx), b.get(idx)) {
            (Some(x), Some(y)) if x != y => return x.cmp(y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

fn compare_teams(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    a.status.cmp(&b.status).then_with(|| match a.status {
        TeamStatus::NotStarted => match (a.earliest_start, b.earliest_start) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        _ => a
            .total_relative_score
            .cmp(&b.total_relative_score)
            .then_with(|| countback(&a.countback, &b.countback)),
    })
}

fn standing(team_id: i64, members: &[&ParticipantResult]) -> TeamStanding {
    let comparable: Vec<&&ParticipantResult> = members
        .iter()
        .filter(|m| m.has_started() && !m.has_invalid_hole)
        .collect();
    let mut scores: Vec<i32> = comparable.iter().map(|m| m.relative_to_par).collect();
    scores.sort_unstable();

    let status = if !members.iter().any(|m| m.has_started()) {
        TeamStatus::NotStarted
    } else if members
        .iter()
        .all(|m| (m.is_locked || m.has_manual_total) && !m.has_invalid_hole)
    {
        TeamStatus::Finished
    } else {
        TeamStatus::InProgress
    };

    let max_holes_completed = members.iter().map(|m| m.holes_played).max().unwrap_or(0);
    let earliest_start = members.iter().filter_map(|m| m.start_time).min();
    let display_progress = match status {
        TeamStatus::Finished => "F".to_string(),
        TeamStatus::InProgress => format!("thru {max_holes_completed}"),
        TeamStatus::NotStarted => earliest_start
            .map_or_else(|| "-".to_string(), |t| t.format("%H:%M").to_string()),
    };

    TeamStanding {
        team_id,
        status,
        display_progress,
        total_relative_score: scores.iter().sum(),
        total_shots: comparable.iter().map(|m| m.gross_total).sum(),
        max_holes_completed,
        earliest_start,
        members: members.iter().map(|m| m.participant_id).collect(),
        countback: scores,
        position: None,
        team_points: None,
    }
}

/// Group individual results into team standings. Disqualified players and
/// players without a team are left out. Teams that have not started get no
/// position or points; the rest are paid with the default formula over the
/// number of started teams.
#[must_use]
pub fn aggregate_teams(results: &[ParticipantResult], points_multiplier: f64) -> Vec<TeamStanding> {
    let mut by_team: HashMap<i64, Vec<&ParticipantResult>, RandomState> = HashMap::default();
    let mut team_order: Vec<i64> = Vec::new();
    for result in results.iter().filter(|r| !r.is_dq) {
        let Some(team_id) = result.team_id else {
            continue;
        };
        if !by_team.contains_key(&team_id) {
            team_order.push(team_id);
        }
        by_team.entry(team_id).or_default().push(result);
    }

    let mut standings: Vec<TeamStanding> = team_order
        .iter()
        .filter_map(|id| by_team.get(id).map(|members| standing(*id, members)))
        .collect();
    standings.sort_by(compare_teams);

    let started = standings
        .iter()
        .take_while(|s| s.status != TeamStatus::NotStarted)
        .count();
    let keys: Vec<(TeamStatus, i32, &[i32])> = standings[..started]
        .iter()
        .map(|s| (s.status, s.total_relative_score, s.countback.as_slice()))
        .collect();
    let groups = tie_groups(&keys);
    let points = allocate_points(&groups, started, PointsSource::Formula, points_multiplier);
    let places = positions(&groups);

    for ((standing, position), points) in standings.iter_mut().zip(places).zip(points) {
        standing.position = Some(position);
        standing.team_points = Some(points);
    }
    tracing::debug!(teams = standings.len(), started, "aggregated teams");
    standings
}
