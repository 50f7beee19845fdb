//! Plain-text renderers for the terminal.

use super::format_average;
use crate::analysis::CategorySummary;
use crate::labels::Labels;
use crate::models::{Photo, RankedPhoto};

const MISSING_PARTICIPANT: &str = "Not provided";

/// Format a ranking as one line per photo:
/// position, average, participant, evaluation count and category.
pub fn format_ranking_table(ranking: &[RankedPhoto<'_>], labels: &Labels) -> String {
    if ranking.is_empty() {
        return "No photos registered for this category.".to_string();
    }

    let name_width = ranking
        .iter()
        .map(|r| participant(r.photo).chars().count())
        .max()
        .unwrap_or(0);

    ranking
        .iter()
        .enumerate()
        .map(|(idx, ranked)| {
            let index_str = format!("{:>2}.", idx + 1);
            let average = format!("{:>6}", format_average(ranked.average));
            let evaluations = match ranked.num_evaluations {
                1 => "(1 evaluation)".to_string(),
                n => format!("({} evaluations)", n),
            };

            format!(
                "{} {}  {}  {:<15}  {}",
                index_str,
                average,
                pad(participant(ranked.photo), name_width),
                evaluations,
                labels.category(&ranked.photo.category)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format per-category evaluation progress.
pub fn format_category_summaries(summaries: &[CategorySummary], labels: &Labels) -> String {
    let rows: Vec<(String, &CategorySummary)> = summaries
        .iter()
        .map(|s| (labels.category(&s.category), s))
        .collect();

    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|(label, summary)| {
            format!(
                "{}  {:<14}  {:>3} photos  {:>3} evaluated  {:>3} evaluations",
                pad(label, label_width),
                summary.category.key(),
                summary.photos,
                summary.evaluated_photos,
                summary.evaluations
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the photos still waiting for an evaluator.
pub fn format_pending(
    pending: &[&Photo],
    evaluator: &str,
    scope_label: &str,
    labels: &Labels,
) -> String {
    if pending.is_empty() {
        return format!("🎉 {} has evaluated every photo in {}.", evaluator, scope_label);
    }

    let mut lines = vec![format!(
        "{} photo(s) pending for {} in {}:",
        pending.len(),
        evaluator,
        scope_label
    )];

    lines.extend(pending.iter().map(|photo| {
        format!(
            "  - {}  {}  ({})",
            photo.id,
            participant(photo),
            labels.category(&photo.category)
        )
    }));

    lines.join("\n")
}

fn participant(photo: &Photo) -> &str {
    photo.participant_name().unwrap_or(MISSING_PARTICIPANT)
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{category_summaries, compute_ranking, pending_for_evaluator};
    use crate::models::{Category, CategoryFilter, Criterion, Evaluation, ScoreValue};

    fn photo(id: &str, category: Category, participant: &str, scores: &[i64]) -> Photo {
        Photo {
            id: id.to_string(),
            category,
            participant: Some(participant.to_string()),
            image_ref: None,
            evaluations: scores
                .iter()
                .enumerate()
                .map(|(i, score)| Evaluation {
                    evaluator: format!("jurado{}", i + 1),
                    scores: [(Criterion::Contexto, ScoreValue::Integer(*score))]
                        .into_iter()
                        .collect(),
                    comments: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_ranking_message() {
        assert_eq!(
            format_ranking_table(&[], &Labels::default()),
            "No photos registered for this category."
        );
    }

    #[test]
    fn test_ranking_lines() {
        let photos = vec![
            photo("a", Category::Fauna, "Ana", &[6]),
            photo("b", Category::Agua, "Bruno", &[9, 10]),
            photo("c", Category::Flora, "", &[]),
        ];
        let ranking = compute_ranking(&photos, &CategoryFilter::All);

        let table = format_ranking_table(&ranking, &Labels::default());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(" 1.   9.50  Bruno"));
        assert!(lines[0].contains("(2 evaluations)"));
        assert!(lines[0].ends_with("Água"));
        assert!(lines[1].starts_with(" 2.   6.00  Ana"));
        assert!(lines[1].contains("(1 evaluation)"));
        assert!(lines[2].contains("Not provided"));
        assert!(lines[2].contains("(0 evaluations)"));
    }

    #[test]
    fn test_category_summaries_lists_every_category() {
        let photos = vec![photo("a", Category::Fauna, "Ana", &[6])];
        let summaries = category_summaries(&photos);

        let text = format_category_summaries(&summaries, &Labels::default());
        assert_eq!(text.lines().count(), Category::ALL.len());
        assert!(text.contains("Destruição do Cerrado"));

        let fauna = text.lines().find(|l| l.starts_with("Fauna")).unwrap();
        assert!(fauna.contains("  1 photos"));
        assert!(fauna.contains("  1 evaluated"));
    }

    #[test]
    fn test_pending_lists_photos() {
        let photos = vec![
            photo("a", Category::Fauna, "Ana", &[6]),
            photo("b", Category::Fauna, "Bruno", &[]),
        ];
        let pending = pending_for_evaluator(&photos, "jurado1", &CategoryFilter::All);

        let text = format_pending(&pending, "jurado1", "All categories", &Labels::default());
        assert!(text.starts_with("1 photo(s) pending for jurado1"));
        assert!(text.contains("  - b  Bruno  (Fauna)"));
        assert!(!text.contains("  - a "));
    }

    #[test]
    fn test_pending_when_done() {
        let text = format_pending(&[], "jurado1", "Flora", &Labels::default());
        assert!(text.contains("has evaluated every photo in Flora"));
    }
}
