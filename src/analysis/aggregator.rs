//! Ranking aggregation.
//!
//! Turns per-evaluator, per-criterion scores into an ordered ranking.
//! Every renderer consumes [`compute_ranking`], so the terminal table and
//! the exported files always agree on the order for the same snapshot.

use crate::models::{CategoryFilter, Criterion, Photo, RankedPhoto};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Rank the photos that pass `filter`, best first.
///
/// Photos are scored independently with [`score_photo`] and ordered with
/// [`compare_ranked`]. The sort is stable, so photos that compare equal
/// keep their snapshot order and repeated calls give identical output.
pub fn compute_ranking<'a>(photos: &'a [Photo], filter: &CategoryFilter) -> Vec<RankedPhoto<'a>> {
    let mut ranked: Vec<RankedPhoto<'a>> = photos
        .iter()
        .filter(|photo| filter.matches(&photo.category))
        .map(score_photo)
        .collect();

    ranked.sort_by(compare_ranked);

    debug!("Ranked {} photos for category {}", ranked.len(), filter);
    ranked
}

/// Compute the ranking figures of a single photo.
///
/// - `criteria_scores` holds the raw sums of the fixed criteria.
/// - `average` is the mean of each evaluation's own mean, so every
///   evaluator weighs the same however many criteria they scored.
///
/// Malformed scores count as zero, both in the sums and in the
/// evaluation's mean, and are tallied in `malformed_scores`.
pub fn score_photo(photo: &Photo) -> RankedPhoto<'_> {
    let mut criteria_scores: BTreeMap<Criterion, i64> =
        Criterion::ALL.iter().map(|c| (c.clone(), 0)).collect();
    let mut malformed_scores = 0;
    let mut sum_of_means = 0.0;

    for evaluation in &photo.evaluations {
        let mut total: i64 = 0;

        for (criterion, value) in &evaluation.scores {
            let score = match value.as_integer() {
                Some(score) => score,
                None => {
                    debug!(
                        "Malformed score {:?} for {} by {} on photo {}; counting as 0",
                        value, criterion, evaluation.evaluator, photo.id
                    );
                    malformed_scores += 1;
                    0
                }
            };

            total = total.saturating_add(score);
            if let Some(sum) = criteria_scores.get_mut(criterion) {
                *sum = sum.saturating_add(score);
            }
        }

        // An evaluation without scores still counts, with a mean of zero
        if !evaluation.scores.is_empty() {
            sum_of_means += total as f64 / evaluation.scores.len() as f64;
        }
    }

    let num_evaluations = photo.evaluations.len();
    let average = if num_evaluations > 0 {
        sum_of_means / num_evaluations as f64
    } else {
        0.0
    };

    RankedPhoto {
        photo,
        average,
        num_evaluations,
        criteria_scores,
        malformed_scores,
    }
}

/// Ranking order: higher `average` first, then the first criterion in
/// [`Criterion::TIE_BREAK_ORDER`] whose per-criterion averages differ.
pub fn compare_ranked(a: &RankedPhoto<'_>, b: &RankedPhoto<'_>) -> Ordering {
    descending(a.average, b.average).then_with(|| {
        Criterion::TIE_BREAK_ORDER
            .iter()
            .map(|criterion| {
                descending(
                    a.criterion_average(criterion),
                    b.criterion_average(criterion),
                )
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    })
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
