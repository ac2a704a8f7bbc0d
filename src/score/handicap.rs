//! Course handicap and per-hole stroke allocation.

use serde::{Deserialize, Serialize};

use crate::model::{HOLES, NEUTRAL_SLOPE};
use crate::score::metrics::{has_invalid_hole, holes_played};

/// WHS course handicap, rounded half away from zero.
#[must_use]
pub fn course_handicap(handicap_index: f64, slope_rating: f64, course_rating: f64, par: i32) -> i32 {
    let raw = handicap_index * slope_rating / NEUTRAL_SLOPE + (course_rating - f64::from(par));
    raw.round() as i32
}

/// Hole indices ordered hardest first. Without a usable stroke index the
/// holes are taken in playing order.
fn hole_priority(stroke_index: Option<&[i32]>) -> [usize; HOLES] {
    let mut order: [usize; HOLES] = std::array::from_fn(|hole| hole);
    if let Some(index) = stroke_index.filter(|idx| idx.len() == HOLES) {
        order.sort_by_key(|&hole| index[hole]);
    }
    order
}

/// Handicap strokes received on each hole.
///
/// Every hole gets one stroke per full pass of 18, and the remainder goes to
/// the hardest holes. A plus handicap gives strokes back, starting from the
/// easiest holes. The result always sums to `course_handicap`.
#[must_use]
pub fn distribute_handicap_strokes(
    course_handicap: i32,
    stroke_index: Option<&[i32]>,
) -> [i32; HOLES] {
    let order = hole_priority(stroke_index);
    let holes = HOLES as i32;
    let passes = course_handicap.abs() / holes;
    let remainder = (course_handicap.abs() % holes) as usize;
    let sign = course_handicap.signum();

    let mut strokes = [sign * passes; HOLES];
    let extra = if course_handicap >= 0 {
        &order[..remainder]
    } else {
        &order[HOLES - remainder..]
    };
    for &hole in extra {
        strokes[hole] += sign;
    }
    strokes
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetScore {
    pub per_hole: [i32; HOLES],
    pub total: i32,
    pub relative_to_par: i32,
}

/// Net card for the played holes. Unplayed and unreported holes keep their
/// sentinel and add nothing to the totals.
#[must_use]
pub fn net_score(score: &[i32], strokes: &[i32], par: &[i32]) -> NetScore {
    let mut net = NetScore {
        per_hole: [0; HOLES],
        total: 0,
        relative_to_par: 0,
    };
    for (hole, &gross) in score.iter().enumerate().take(HOLES) {
        if gross > 0 {
            let value = gross - strokes.get(hole).copied().unwrap_or(0);
            net.per_hole[hole] = value;
            net.total += value;
            net.relative_to_par += value - par.get(hole).copied().unwrap_or(0);
        } else {
            net.per_hole[hole] = gross;
        }
    }
    net
}

/// What can be said about a player's net round.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetOutcome {
    pub course_handicap: i32,
    pub strokes: [i32; HOLES],
    /// Only known once all 18 holes are in.
    pub total: Option<i32>,
    pub relative_to_par: i32,
}

/// Net result for a card, or `None` when no net figure may be shown at all:
/// the course handicap is unknown or a hole went unreported.
#[must_use]
pub fn net_outcome(
    score: &[i32],
    par: &[i32],
    course_handicap: Option<i32>,
    stroke_index: Option<&[i32]>,
) -> Option<NetOutcome> {
    let course_handicap = course_handicap?;
    if has_invalid_hole(score) {
        return None;
    }
    let strokes = distribute_handicap_strokes(course_handicap, stroke_index);
    let net = net_score(score, &strokes, par);
    Some(NetOutcome {
        course_handicap,
        strokes,
        total: (holes_played(score) == HOLES).then_some(net.total),
        relative_to_par: net.relative_to_par,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STROKE_INDEX: [i32; HOLES] = [7, 15, 1, 11, 3, 17, 5, 13, 9, 8, 16, 2, 12, 4, 18, 6, 14, 10];

    fn hole_with_index(index: i32) -> usize {
        STROKE_INDEX.iter().position(|&s| s == index).unwrap()
    }

    #[test]
    fn course_handicap_matches_whs_worked_example() {
        assert_eq!(course_handicap(10.0, 120.0, 70.0, 72), 9);
        assert_eq!(course_handicap(0.0, 113.0, 72.0, 72), 0);
        assert_eq!(course_handicap(-2.0, 130.0, 73.0, 72), -1);
    }

    #[test]
    fn course_handicap_rounds_half_away_from_zero() {
        // 4.5 exactly
        assert_eq!(course_handicap(4.5, 113.0, 72.0, 72), 5);
        assert_eq!(course_handicap(-4.5, 113.0, 72.0, 72), -5);
    }

    #[test]
    fn remainder_goes_to_hardest_holes() {
        let strokes = distribute_handicap_strokes(3, Some(&STROKE_INDEX[..]));
        assert_eq!(strokes.iter().sum::<i32>(), 3);
        for index in 1..=3 {
            assert_eq!(strokes[hole_with_index(index)], 1);
        }
        assert_eq!(strokes[hole_with_index(4)], 0);
    }

    #[test]
    fn handicap_above_eighteen_wraps() {
        let strokes = distribute_handicap_strokes(20, Some(&STROKE_INDEX[..]));
        assert_eq!(strokes.iter().sum::<i32>(), 20);
        assert_eq!(strokes[hole_with_index(1)], 2);
        assert_eq!(strokes[hole_with_index(2)], 2);
        assert_eq!(strokes[hole_with_index(3)], 1);
        assert_eq!(strokes[hole_with_index(18)], 1);
    }

    #[test]
    fn plus_handicap_gives_back_on_easiest_holes() {
        let strokes = distribute_handicap_strokes(-2, Some(&STROKE_INDEX[..]));
        assert_eq!(strokes.iter().sum::<i32>(), -2);
        assert_eq!(strokes[hole_with_index(18)], -1);
        assert_eq!(strokes[hole_with_index(17)], -1);
        assert_eq!(strokes[hole_with_index(1)], 0);
    }

    #[test]
    fn missing_stroke_index_uses_hole_order() {
        let strokes = distribute_handicap_strokes(2, None);
        assert_eq!(&strokes[..3], &[1, 1, 0]);
        let strokes = distribute_handicap_strokes(-1, None);
        assert_eq!(strokes[17], -1);
    }

    #[test]
    fn net_total_for_worked_example() {
        let score = [5; HOLES];
        let par = [4; HOLES];
        let ch = course_handicap(10.0, 120.0, 70.0, 72);
        let outcome = net_outcome(&score, &par, Some(ch), Some(&STROKE_INDEX[..])).unwrap();
        assert_eq!(outcome.total, Some(81));
        assert_eq!(outcome.relative_to_par, 9);
    }

    #[test]
    fn partial_round_has_relative_but_no_total() {
        let mut score = [0; HOLES];
        score[..9].copy_from_slice(&[5; 9]);
        let par = [4; HOLES];
        let outcome = net_outcome(&score, &par, Some(18), Some(&STROKE_INDEX[..])).unwrap();
        assert_eq!(outcome.total, None);
        assert_eq!(outcome.relative_to_par, 0);
    }

    #[test]
    fn net_withheld_for_unreported_hole_or_unknown_handicap() {
        let mut score = [5; HOLES];
        let par = [4; HOLES];
        assert!(net_outcome(&score, &par, None, Some(&STROKE_INDEX[..])).is_none());
        score[6] = -1;
        assert!(net_outcome(&score, &par, Some(9), Some(&STROKE_INDEX[..])).is_none());
    }

    #[test]
    fn net_card_keeps_sentinels() {
        let mut score = [4; HOLES];
        score[0] = 0;
        let net = net_score(&score, &[1; HOLES], &[4; HOLES]);
        assert_eq!(net.per_hole[0], 0);
        assert_eq!(net.per_hole[1], 3);
        assert_eq!(net.total, 51);
        assert_eq!(net.relative_to_par, -17);
    }
}
