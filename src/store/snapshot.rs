//! In-memory photo snapshot and evaluation submission.

use super::StoreError;
use crate::models::{Evaluation, EvaluationSubmission, Photo};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A consistent set of photos handed to the aggregator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoSnapshot {
    photos: Vec<Photo>,
}

/// How a submission changed the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The evaluator had not evaluated the photo; the evaluation was appended.
    Added,
    /// The evaluator's previous evaluation at `index` was replaced.
    Replaced { index: usize },
}

impl PhotoSnapshot {
    /// Build a snapshot, enforcing unique photo ids and one evaluation
    /// per evaluator.
    ///
    /// Duplicate photo ids keep the first occurrence. A repeated evaluator
    /// on the same photo replaces the earlier evaluation in place, the same
    /// way a resubmission does.
    pub fn from_photos(photos: Vec<Photo>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(photos.len());

        for mut photo in photos {
            if !seen.insert(photo.id.clone()) {
                warn!("Duplicate photo id {}; keeping the first occurrence", photo.id);
                continue;
            }

            let evaluations = std::mem::take(&mut photo.evaluations);
            photo.evaluations = merge_evaluations(&photo.id, evaluations);
            kept.push(photo);
        }

        Self { photos: kept }
    }

    /// All photos, in snapshot order.
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Find a photo by id.
    pub fn find(&self, photo_id: &str) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == photo_id)
    }

    /// Apply an evaluation to its photo.
    ///
    /// A first evaluation from the evaluator is appended; a later one
    /// replaces the earlier at the same position. Evaluators match after
    /// trimming and lowercasing.
    pub fn submit_evaluation(
        &mut self,
        submission: EvaluationSubmission,
    ) -> Result<SubmitOutcome, StoreError> {
        let EvaluationSubmission {
            photo_id,
            evaluation,
        } = submission;

        let photo = self
            .photos
            .iter_mut()
            .find(|p| p.id == photo_id)
            .ok_or_else(|| StoreError::PhotoNotFound(photo_id.clone()))?;

        match photo
            .evaluations
            .iter()
            .position(|e| e.is_by(&evaluation.evaluator))
        {
            Some(index) => {
                debug!(
                    "Replacing evaluation {} by {} on photo {}",
                    index, evaluation.evaluator, photo_id
                );
                photo.evaluations[index] = evaluation;
                Ok(SubmitOutcome::Replaced { index })
            }
            None => {
                debug!("Adding evaluation by {} on photo {}", evaluation.evaluator, photo_id);
                photo.evaluations.push(evaluation);
                Ok(SubmitOutcome::Added)
            }
        }
    }
}

fn merge_evaluations(photo_id: &str, evaluations: Vec<Evaluation>) -> Vec<Evaluation> {
    let mut merged: Vec<Evaluation> = Vec::with_capacity(evaluations.len());

    for evaluation in evaluations {
        match merged
            .iter()
            .position(|e| e.is_by(&evaluation.evaluator))
        {
            Some(index) => {
                warn!(
                    "Photo {} has more than one evaluation by {}; keeping the latest",
                    photo_id, evaluation.evaluator
                );
                merged[index] = evaluation;
            }
            None => merged.push(evaluation),
        }
    }

    merged
}

/// Check a submission against the evaluation form: at least one score,
/// only fixed criteria, and integer scores inside `min..=max`.
///
/// The aggregator itself never validates; this guards the write path.
pub fn validate_submission(
    submission: &EvaluationSubmission,
    min: i64,
    max: i64,
) -> Result<(), StoreError> {
    let evaluation = &submission.evaluation;

    if evaluation.scores.is_empty() {
        return Err(StoreError::EmptyEvaluation(evaluation.evaluator.clone()));
    }

    for (criterion, value) in &evaluation.scores {
        if !criterion.is_known() {
            return Err(StoreError::UnknownCriterion(criterion.key().to_string()));
        }

        match value.as_integer() {
            Some(score) if (min..=max).contains(&score) => {}
            _ => {
                return Err(StoreError::InvalidScore {
                    criterion: criterion.key().to_string(),
                    value: value.to_string(),
                    min,
                    max,
                })
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::score_photo;
    use crate::models::{normalize_evaluator, Category, Criterion, ScoreValue};

    fn evaluation(evaluator: &str, scores: &[(Criterion, i64)]) -> Evaluation {
        Evaluation {
            evaluator: evaluator.to_string(),
            scores: scores
                .iter()
                .map(|(c, v)| (c.clone(), ScoreValue::Integer(*v)))
                .collect(),
            comments: None,
        }
    }

    fn photo(id: &str, evaluations: Vec<Evaluation>) -> Photo {
        Photo {
            id: id.to_string(),
            category: Category::Fauna,
            participant: None,
            image_ref: None,
            evaluations,
        }
    }

    fn submission(photo_id: &str, evaluation: Evaluation) -> EvaluationSubmission {
        EvaluationSubmission {
            photo_id: photo_id.to_string(),
            evaluation,
        }
    }

    #[test]
    fn test_submit_appends_new_evaluator() {
        let mut snapshot = PhotoSnapshot::from_photos(vec![photo(
            "p1",
            vec![evaluation("ana", &[(Criterion::Contexto, 7)])],
        )]);

        let outcome = snapshot
            .submit_evaluation(submission(
                "p1",
                evaluation("bruno", &[(Criterion::Contexto, 9)]),
            ))
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Added);
        let photo = snapshot.find("p1").unwrap();
        assert_eq!(photo.evaluations.len(), 2);
        assert_eq!(photo.evaluations[1].evaluator, "bruno");
    }

    #[test]
    fn test_resubmission_replaces_in_place() {
        let mut snapshot = PhotoSnapshot::from_photos(vec![photo(
            "p1",
            vec![
                evaluation("ana", &[(Criterion::Contexto, 4)]),
                evaluation("bruno", &[(Criterion::Contexto, 6)]),
            ],
        )]);

        let before = score_photo(snapshot.find("p1").unwrap()).criteria_scores
            [&Criterion::Contexto];

        let outcome = snapshot
            .submit_evaluation(submission(
                "p1",
                evaluation("ana", &[(Criterion::Contexto, 9)]),
            ))
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Replaced { index: 0 });

        let photo = snapshot.find("p1").unwrap();
        assert_eq!(photo.evaluations.len(), 2);
        assert_eq!(photo.evaluations[0].evaluator, "ana");
        assert_eq!(photo.evaluations[1].evaluator, "bruno");

        let ranked = score_photo(photo);
        assert_eq!(ranked.num_evaluations, 2);
        assert_eq!(ranked.criteria_scores[&Criterion::Contexto], before + 5);
    }

    #[test]
    fn test_resubmission_matches_stored_evaluator_case_insensitively() {
        let mut snapshot = PhotoSnapshot::from_photos(vec![photo(
            "p1",
            vec![evaluation("Jurado1", &[(Criterion::Contexto, 5)])],
        )]);

        let outcome = snapshot
            .submit_evaluation(submission(
                "p1",
                evaluation(&normalize_evaluator(" Jurado1 "), &[(Criterion::Contexto, 9)]),
            ))
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Replaced { index: 0 });

        let ranked = score_photo(snapshot.find("p1").unwrap());
        assert_eq!(ranked.num_evaluations, 1);
        assert_eq!(ranked.criteria_scores[&Criterion::Contexto], 9);
    }

    #[test]
    fn test_from_photos_merges_evaluators_differing_in_case() {
        let snapshot = PhotoSnapshot::from_photos(vec![photo(
            "p1",
            vec![
                evaluation("Ana", &[(Criterion::Contexto, 3)]),
                evaluation("ana ", &[(Criterion::Contexto, 7)]),
            ],
        )]);

        let photo = snapshot.find("p1").unwrap();
        assert_eq!(photo.evaluations.len(), 1);
        assert_eq!(
            photo.evaluations[0].scores.get(&Criterion::Contexto),
            Some(&ScoreValue::Integer(7))
        );
    }

    #[test]
    fn test_submit_to_unknown_photo() {
        let mut snapshot = PhotoSnapshot::from_photos(vec![photo("p1", vec![])]);

        let err = snapshot
            .submit_evaluation(submission("missing", evaluation("ana", &[])))
            .unwrap_err();

        assert!(matches!(err, StoreError::PhotoNotFound(ref id) if id == "missing"));
    }

    #[test]
    fn test_from_photos_normalizes_duplicates() {
        let snapshot = PhotoSnapshot::from_photos(vec![
            photo(
                "p1",
                vec![
                    evaluation("ana", &[(Criterion::Contexto, 3)]),
                    evaluation("bruno", &[(Criterion::Contexto, 5)]),
                    evaluation("ana", &[(Criterion::Contexto, 8)]),
                ],
            ),
            photo("p1", vec![]),
            photo("p2", vec![]),
        ]);

        assert_eq!(snapshot.len(), 2);
        let photo = snapshot.find("p1").unwrap();
        assert_eq!(photo.evaluations.len(), 2);
        assert_eq!(photo.evaluations[0].evaluator, "ana");
        assert_eq!(
            photo.evaluations[0].scores.get(&Criterion::Contexto),
            Some(&ScoreValue::Integer(8))
        );
    }

    #[test]
    fn test_validate_submission() {
        let ok = submission(
            "p1",
            evaluation("ana", &[(Criterion::Contexto, 1), (Criterion::Resolucao, 10)]),
        );
        assert!(validate_submission(&ok, 1, 10).is_ok());

        let out_of_range = submission("p1", evaluation("ana", &[(Criterion::Contexto, 11)]));
        assert!(matches!(
            validate_submission(&out_of_range, 1, 10),
            Err(StoreError::InvalidScore { .. })
        ));

        let unknown = submission(
            "p1",
            evaluation("ana", &[(Criterion::Other("luz".to_string()), 5)]),
        );
        assert!(matches!(
            validate_submission(&unknown, 1, 10),
            Err(StoreError::UnknownCriterion(_))
        ));

        let empty = submission("p1", evaluation("ana", &[]));
        assert!(matches!(
            validate_submission(&empty, 1, 10),
            Err(StoreError::EmptyEvaluation(_))
        ));
    }

    #[test]
    fn test_validate_submission_rejects_malformed_text() {
        let mut malformed = evaluation("ana", &[]);
        malformed
            .scores
            .insert(Criterion::Contexto, ScoreValue::Text("abc".to_string()));

        let err = validate_submission(&submission("p1", malformed), 1, 10).unwrap_err();
        assert!(err.to_string().contains("contexto"));
    }
}
