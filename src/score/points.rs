use crate::model::{CompetitionSettings, PointsTemplate};
use crate::score::ranking::TieGroup;

/// Default payout: the winner gets N + 2, second gets N, then one less per
/// place down to zero.
#[must_use]
pub fn default_points(position: usize, field_size: usize) -> usize {
    match position {
        0 => 0,
        1 => field_size + 2,
        2 => field_size,
        p => field_size.saturating_sub(p - 1),
    }
}

/// Where per-position points come from.
#[derive(Debug, Clone, Copy)]
pub enum PointsSource<'a> {
    Formula,
    Template(&'a PointsTemplate),
}

impl<'a> PointsSource<'a> {
    #[must_use]
    pub fn from_settings(settings: &'a CompetitionSettings) -> Self {
        settings
            .points_template
            .as_ref()
            .map_or(PointsSource::Formula, PointsSource::Template)
    }

    /// Points one position would earn on its own, before the competition
    /// multiplier. A template's own multiplier is applied to its lookup here.
    #[must_use]
    pub fn raw_points(&self, position: usize, field_size: usize) -> f64 {
        match self {
            PointsSource::Formula => default_points(position, field_size) as f64,
            PointsSource::Template(template) => {
                template.points_for(position) * template.multiplier().unwrap_or(1.0)
            }
        }
    }
}

#[must_use]
pub fn scaled_points(raw: f64, multiplier: f64) -> i32 {
    (raw * multiplier).round() as i32
}

/// Points for each member of a tie group: the mean of what the covered
/// positions would pay, scaled, then rounded once.
#[must_use]
pub fn tie_points(
    group: &TieGroup,
    field_size: usize,
    source: PointsSource<'_>,
    competition_multiplier: f64,
) -> i32 {
    if group.len == 0 {
        return 0;
    }
    let total: f64 = group
        .positions()
        .map(|position| source.raw_points(position, field_size))
        .sum();
    scaled_points(total / group.len as f64, competition_multiplier)
}

/// Points for every item covered by `groups`, in list order.
#[must_use]
pub fn allocate_points(
    groups: &[TieGroup],
    field_size: usize,
    source: PointsSource<'_>,
    competition_multiplier: f64,
) -> Vec<i32> {
    groups
        .iter()
        .flat_map(|group| {
            let points = tie_points(group, field_size, source, competition_multiplier);
            std::iter::repeat_n(points, group.len)
        })
        .collect()
}
