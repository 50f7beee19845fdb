//! Markdown and JSON report generation.
//!
//! Builds a full ranking report with per-photo evaluation details from
//! the aggregator output.

use super::{format_average, ReportOptions};
use crate::labels::Labels;
use crate::models::{Criterion, Evaluation, RankedPhoto, RankingReport, ReportMetadata};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(
    report: &RankingReport<'_>,
    labels: &Labels,
    options: &ReportOptions,
) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!(
        "# Photo Contest Ranking: {}\n\n",
        report.metadata.category_label
    ));

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report, options));
    output.push_str(&generate_ranking_section(&report.ranking, labels));

    if options.include_evaluations {
        output.push_str(&generate_details_section(&report.ranking, labels, options));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Snapshot:** `{}`\n", metadata.snapshot));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Category:** {} (`{}`)\n",
        metadata.category_label, metadata.category
    ));
    section.push_str(&format!(
        "- **Photos Ranked:** {}\n",
        metadata.photos_ranked
    ));
    section.push_str(&format!(
        "- **Total Evaluations:** {}\n",
        metadata.total_evaluations
    ));
    section.push_str(&format!("- **Evaluators:** {}\n", metadata.evaluators));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &RankingReport<'_>, options: &ReportOptions) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Ranking](#ranking)\n");

    if options.include_evaluations && !report.ranking.is_empty() {
        toc.push_str("- [Photo Details](#photo-details)\n");
        for (index, ranked) in report.ranking.iter().enumerate() {
            toc.push_str(&format!(
                "  - [{}. {}](#{})\n",
                index + 1,
                ranked.photo.id,
                photo_anchor(&ranked.photo.id)
            ));
        }
    }

    toc.push('\n');

    toc
}

/// Generate the ranking table.
fn generate_ranking_section(ranking: &[RankedPhoto<'_>], labels: &Labels) -> String {
    let mut section = String::new();

    section.push_str("## Ranking\n\n");

    if ranking.is_empty() {
        section.push_str("No photos registered for this category.\n\n");
        return section;
    }

    section.push_str("| # | Participant | Category | Average | Evaluations |\n");
    section.push_str("|:---:|:---|:---|:---:|:---:|\n");

    for (index, ranked) in ranking.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            index + 1,
            escape_cell(ranked.photo.participant_name().unwrap_or("Not provided")),
            escape_cell(&labels.category(&ranked.photo.category)),
            format_average(ranked.average),
            ranked.num_evaluations
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-photo details section.
fn generate_details_section(
    ranking: &[RankedPhoto<'_>],
    labels: &Labels,
    options: &ReportOptions,
) -> String {
    if ranking.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Photo Details\n\n");

    for (index, ranked) in ranking.iter().enumerate() {
        section.push_str(&generate_photo_block(index + 1, ranked, labels, options));
    }

    section
}

/// Generate the details block for a single photo.
fn generate_photo_block(
    position: usize,
    ranked: &RankedPhoto<'_>,
    labels: &Labels,
    options: &ReportOptions,
) -> String {
    let photo = ranked.photo;
    let mut block = String::new();

    block.push_str(&format!(
        "### {}. {} {{#{}}}\n\n",
        position,
        photo.id,
        photo_anchor(&photo.id)
    ));

    block.push_str(&format!(
        "*Participant: {} | Category: {} | Average: {} | Evaluations: {}*\n\n",
        photo.participant_name().unwrap_or("Not provided"),
        labels.category(&photo.category),
        format_average(ranked.average),
        ranked.num_evaluations
    ));

    block.push_str(&format!(
        "[View image]({})\n\n",
        photo.image_url(&options.image_url_template)
    ));

    if ranked.malformed_scores > 0 {
        block.push_str(&format!(
            "> ⚠️ {} unreadable score(s) counted as zero.\n\n",
            ranked.malformed_scores
        ));
    }

    if photo.evaluations.is_empty() {
        block.push_str("No evaluations yet.\n\n---\n\n");
        return block;
    }

    // Criterion averages
    block.push_str("| Criterion | Average |\n");
    block.push_str("|:---|:---:|\n");
    for criterion in &Criterion::TIE_BREAK_ORDER {
        block.push_str(&format!(
            "| {} | {} |\n",
            escape_cell(&labels.criterion(criterion)),
            format_average(ranked.criterion_average(criterion))
        ));
    }
    block.push('\n');

    for evaluation in &photo.evaluations {
        block.push_str(&generate_evaluation_block(evaluation, labels, options));
    }

    block.push_str("---\n\n");

    block
}

/// Generate one evaluator's scores.
fn generate_evaluation_block(
    evaluation: &Evaluation,
    labels: &Labels,
    options: &ReportOptions,
) -> String {
    let mut block = String::new();

    block.push_str(&format!("#### Evaluator: {}\n\n", evaluation.evaluator));

    if evaluation.scores.is_empty() {
        block.push_str("No scores.\n\n");
    } else {
        block.push_str("| Criterion | Score |\n");
        block.push_str("|:---|:---:|\n");
        for (criterion, value) in &evaluation.scores {
            block.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(&labels.criterion(criterion)),
                escape_cell(&value.to_string())
            ));
        }
        block.push('\n');
    }

    if options.include_comments {
        block.push_str(&format!(
            "**Comments:** {}\n\n",
            evaluation.comments_text().unwrap_or("None")
        ));
    }

    block
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by PhotoJury*\n");

    footer
}

fn photo_anchor(id: &str) -> String {
    format!("photo-{}", id.replace(['/', '.', ' '], "-").to_lowercase())
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &RankingReport<'_>) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_ranking;
    use crate::config::Config;
    use crate::models::{Category, CategoryFilter, Photo, ScoreValue};

    fn photos() -> Vec<Photo> {
        vec![
            Photo {
                id: "1aXf9kQm".to_string(),
                category: Category::Fauna,
                participant: Some("Mariana | Rocha".to_string()),
                image_ref: None,
                evaluations: vec![Evaluation {
                    evaluator: "jurado1".to_string(),
                    scores: [
                        (Criterion::Contexto, ScoreValue::Integer(8)),
                        (Criterion::Resolucao, ScoreValue::Text("9".to_string())),
                    ]
                    .into_iter()
                    .collect(),
                    comments: Some("Ótima luz natural.".to_string()),
                }],
            },
            Photo {
                id: "3cZh1mSo".to_string(),
                category: Category::Flora,
                participant: None,
                image_ref: Some("https://img/3.jpg".to_string()),
                evaluations: vec![],
            },
        ]
    }

    fn report(photos: &[Photo]) -> RankingReport<'_> {
        let filter = CategoryFilter::All;
        let ranking = compute_ranking(photos, &filter);
        RankingReport {
            metadata: ReportMetadata::from_ranking(
                "photos.json",
                &filter,
                "All categories".to_string(),
                &ranking,
            ),
            ranking,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let photos = photos();
        let report = report(&photos);
        let options = ReportOptions::from(&Config::default());

        let markdown = generate_markdown_report(&report, &Labels::default(), &options);

        assert!(markdown.contains("# Photo Contest Ranking: All categories"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Ranking"));
        assert!(markdown.contains("## Photo Details"));
        assert!(markdown.contains("| 1 | Mariana \\| Rocha | Fauna | 8.50 | 1 |"));
        assert!(markdown.contains("| 2 | Not provided | Flora | 0.00 | 0 |"));
        assert!(markdown.contains("https://lh3.googleusercontent.com/d/1aXf9kQm"));
        assert!(markdown.contains("[View image](https://img/3.jpg)"));
        assert!(markdown.contains("No evaluations yet."));
        assert!(markdown.contains("**Comments:** Ótima luz natural."));
    }

    #[test]
    fn test_markdown_respects_options() {
        let photos = photos();
        let report = report(&photos);
        let mut options = ReportOptions::from(&Config::default());
        options.include_comments = false;

        let markdown = generate_markdown_report(&report, &Labels::default(), &options);
        assert!(!markdown.contains("**Comments:**"));
        assert!(markdown.contains("#### Evaluator: jurado1"));

        options.include_evaluations = false;
        let markdown = generate_markdown_report(&report, &Labels::default(), &options);
        assert!(!markdown.contains("## Photo Details"));
        assert!(markdown.contains("## Ranking"));
    }

    #[test]
    fn test_empty_ranking() {
        let report = report(&[]);
        let options = ReportOptions::from(&Config::default());

        let markdown = generate_markdown_report(&report, &Labels::default(), &options);
        assert!(markdown.contains("No photos registered for this category."));
        assert!(!markdown.contains("## Photo Details"));
    }

    #[test]
    fn test_generate_metadata_section() {
        let photos = photos();
        let report = report(&photos);

        let section = generate_metadata_section(&report.metadata);
        assert!(section.contains("`photos.json`"));
        assert!(section.contains("**Photos Ranked:** 2"));
        assert!(section.contains("**Total Evaluations:** 1"));
        assert!(section.contains("**Evaluators:** 1"));
    }

    #[test]
    fn test_generate_json_report() {
        let photos = photos();
        let report = report(&photos);
        let json = generate_json_report(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["photos_ranked"], 2);
        assert_eq!(value["ranking"][0]["id"], "1aXf9kQm");
        assert_eq!(value["ranking"][0]["average"], 8.5);
        assert_eq!(value["ranking"][0]["numEvaluations"], 1);
        assert_eq!(value["ranking"][0]["criteriaScores"]["contexto"], 8);
    }
}
