use std::cmp::Ordering;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::model::{HOLES, ParticipantResult};

/// Facts that decide whether a round counts as complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionFacts {
    pub disqualified: bool,
    pub manual_total: bool,
    pub holes_played: usize,
    pub has_invalid_hole: bool,
    pub locked: bool,
    pub window_closed: bool,
}

impl CompletionFacts {
    /// A round is finished when the player is not disqualified and either a
    /// manual total was entered, or all 18 holes are in with none unreported
    /// and the card is locked. Once the window closes the lock is implied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        if self.disqualified {
            return false;
        }
        self.manual_total
            || (self.holes_played == HOLES
                && !self.has_invalid_hole
                && (self.locked || self.window_closed))
    }

    #[must_use]
    pub fn is_dnf(&self) -> bool {
        self.window_closed
            && !self.disqualified
            && !self.manual_total
            && self.holes_played < HOLES
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RankClass {
    Active,
    DidNotFinish,
    Disqualified,
}

#[must_use]
pub fn rank_class(result: &ParticipantResult) -> RankClass {
    if result.is_dq {
        RankClass::Disqualified
    } else if result.is_dnf {
        RankClass::DidNotFinish
    } else {
        RankClass::Active
    }
}

/// Leaderboard order: active players by score, then DNF by holes played,
/// then DQ by name. Equal active scores compare equal so a stable sort keeps
/// their incoming order.
#[must_use]
pub fn compare_leaderboard(a: &ParticipantResult, b: &ParticipantResult) -> Ordering {
    compare_leaderboard_by(a, b, |r| r.gross_round.rank_value)
}

/// [`compare_leaderboard`] with the active-player score supplied by `key`.
pub fn compare_leaderboard_by<F>(a: &ParticipantResult, b: &ParticipantResult, key: F) -> Ordering
where
    F: Fn(&ParticipantResult) -> i32,
{
    let (class_a, class_b) = (rank_class(a), rank_class(b));
    class_a.cmp(&class_b).then_with(|| match class_a {
        RankClass::Active => key(a).cmp(&key(b)),
        RankClass::DidNotFinish => b.holes_played.cmp(&a.holes_played),
        RankClass::Disqualified => a.name.cmp(&b.name),
    })
}

pub fn sort_leaderboard(results: &mut [ParticipantResult]) {
    results.sort_by(compare_leaderboard);
}

/// A run of tied entries in a sorted list. Every member shares `position`;
/// the group uses up positions `position..position + len`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TieGroup {
    pub position: usize,
    pub start: usize,
    pub len: usize,
}

impl TieGroup {
    #[must_use]
    pub fn positions(&self) -> Range<usize> {
        self.position..self.position + self.len
    }
}

/// Group consecutive equal keys of an already sorted list.
#[must_use]
pub fn tie_groups<K: PartialEq>(keys: &[K]) -> Vec<TieGroup> {
    let mut groups: Vec<TieGroup> = Vec::new();
    for (idx, key) in keys.iter().enumerate() {
        if let Some(group) = groups.last_mut().filter(|g| keys[g.start] == *key) {
            group.len += 1;
            continue;
        }
        groups.push(TieGroup {
            position: idx + 1,
            start: idx,
            len: 1,
        });
    }
    groups
}

/// Stable-sort `items` by `key` (lower is better) and group the ties.
pub fn rank_by<T, K, F>(items: &mut [T], key: F) -> Vec<TieGroup>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    items.sort_by(|a, b| key(a).cmp(&key(b)));
    let keys: Vec<K> = items.iter().map(&key).collect();
    tie_groups(&keys)
}

/// Position of every item, in list order.
#[must_use]
pub fn positions(groups: &[TieGroup]) -> Vec<usize> {
    groups
        .iter()
        .flat_map(|g| std::iter::repeat_n(g.position, g.len))
        .collect()
}
