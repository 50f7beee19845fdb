//! Evaluation progress: what is left to score and how far each category got.

use crate::models::{Category, CategoryFilter, Photo};
use serde::Serialize;
use std::collections::BTreeMap;

/// Photos in `filter` that `evaluator` has not evaluated yet, in snapshot order.
pub fn pending_for_evaluator<'a>(
    photos: &'a [Photo],
    evaluator: &str,
    filter: &CategoryFilter,
) -> Vec<&'a Photo> {
    photos
        .iter()
        .filter(|photo| filter.matches(&photo.category))
        .filter(|photo| photo.evaluation_by(evaluator).is_none())
        .collect()
}

/// Evaluation progress of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    /// Photos in the category.
    pub photos: usize,
    /// Photos with at least one evaluation.
    pub evaluated_photos: usize,
    /// Evaluations across all photos in the category.
    pub evaluations: usize,
}

/// Group photos by category.
pub fn group_by_category(photos: &[Photo]) -> BTreeMap<Category, Vec<&Photo>> {
    let mut grouped: BTreeMap<Category, Vec<&Photo>> = BTreeMap::new();

    for photo in photos {
        grouped.entry(photo.category.clone()).or_default().push(photo);
    }

    grouped
}

/// Summarize every fixed category (even empty ones) plus any other
/// category present in the snapshot.
pub fn category_summaries(photos: &[Photo]) -> Vec<CategorySummary> {
    let mut grouped = group_by_category(photos);
    for category in Category::ALL {
        grouped.entry(category).or_default();
    }

    grouped
        .into_iter()
        .map(|(category, photos)| CategorySummary {
            category,
            photos: photos.len(),
            evaluated_photos: photos.iter().filter(|p| !p.evaluations.is_empty()).count(),
            evaluations: photos.iter().map(|p| p.evaluations.len()).sum(),
        })
        .collect()
}
