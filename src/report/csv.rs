//! CSV export of a ranking.

use super::format_average;
use crate::labels::Labels;
use crate::models::{CategoryFilter, Criterion, RankedPhoto};
use chrono::NaiveDate;

const FIXED_HEADERS: [&str; 5] = [
    "Position",
    "Participant",
    "Category",
    "Overall Average",
    "Number of Evaluations",
];

/// Render a ranking as CSV: one header row, then one row per photo in
/// ranking order. Criterion columns follow the tie-break priority order.
pub fn generate_csv(ranking: &[RankedPhoto<'_>], labels: &Labels) -> String {
    let mut headers: Vec<String> = FIXED_HEADERS.iter().map(|h| escape_field(h)).collect();
    headers.extend(
        Criterion::TIE_BREAK_ORDER
            .iter()
            .map(|criterion| escape_field(&labels.criterion(criterion))),
    );

    let mut output = headers.join(",");
    output.push('\n');

    for (index, ranked) in ranking.iter().enumerate() {
        let mut row = vec![
            (index + 1).to_string(),
            quote(ranked.photo.participant_name().unwrap_or("")),
            escape_field(ranked.photo.category.key()),
            format_average(ranked.average),
            ranked.num_evaluations.to_string(),
        ];
        row.extend(
            Criterion::TIE_BREAK_ORDER
                .iter()
                .map(|criterion| format_average(ranked.criterion_average(criterion))),
        );

        output.push_str(&row.join(","));
        output.push('\n');
    }

    output
}

/// Default export file name: `ranking_<filter>_<YYYY-MM-DD>.csv`.
pub fn default_export_file_name(filter: &CategoryFilter, date: NaiveDate) -> String {
    let key: String = filter
        .key()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    format!("ranking_{}_{}.csv", key, date.format("%Y-%m-%d"))
}

/// Always quote, doubling embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Quote only when the field would otherwise break the row.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_string()
    }
}
