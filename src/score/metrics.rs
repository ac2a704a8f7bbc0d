use crate::model::UNREPORTED;

/// Holes with strokes recorded, plus holes the player gave up on.
#[must_use]
pub fn holes_played(score: &[i32]) -> usize {
    score.iter().filter(|&&s| s > 0 || s == UNREPORTED).count()
}

#[must_use]
pub fn gross_score(score: &[i32]) -> i32 {
    score.iter().filter(|&&s| s > 0).sum()
}

#[must_use]
pub fn relative_to_par(score: &[i32], par: &[i32]) -> i32 {
    score
        .iter()
        .zip(par)
        .filter(|(s, _)| **s > 0)
        .map(|(s, p)| s - p)
        .sum()
}

#[must_use]
pub fn has_invalid_hole(score: &[i32]) -> bool {
    score.contains(&UNREPORTED)
}
