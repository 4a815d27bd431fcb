use serde::Serialize;

use super::model::RATING_LABELS;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelShare {
    pub label: &'static str,
    pub percentage: f64,
}

/// Percentage share per canonical label plus the denominator used.
///
/// Ratings that are missing or outside the canonical set count toward
/// `total` without landing in any label, so shares may sum to less than 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingDistribution {
    pub stats: Vec<LabelShare>,
    pub total: usize,
}

#[cfg(test)]
impl RatingDistribution {
    pub fn percentage_of(&self, label: &str) -> Option<f64> {
        self.stats
            .iter()
            .find(|share| share.label == label)
            .map(|share| share.percentage)
    }
}

pub fn compute_distribution<S: AsRef<str>>(ratings: &[Option<S>]) -> RatingDistribution {
    let total = ratings.len();

    let stats = RATING_LABELS
        .iter()
        .map(|&label| {
            let count = ratings
                .iter()
                .filter(|rating| {
                    rating
                        .as_ref()
                        .is_some_and(|value| AsRef::<str>::as_ref(value) == label)
                })
                .count();
            LabelShare {
                label,
                percentage: percentage(count, total),
            }
        })
        .collect();

    RatingDistribution { stats, total }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let share = count as f64 / total as f64 * 100.0;
    (share * 10.0).round() / 10.0
}
