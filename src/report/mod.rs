//! Ranking renderers.
//!
//! Every renderer takes the output of
//! [`compute_ranking`](crate::analysis::compute_ranking) as-is and never
//! re-sorts it.

pub mod csv;
pub mod generator;
pub mod table;

pub use csv::{default_export_file_name, generate_csv};
pub use generator::{generate_json_report, generate_markdown_report};
pub use table::{format_category_summaries, format_pending, format_ranking_table};

use crate::config::Config;

/// Rendering options taken from the configuration.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Include per-photo evaluation details.
    pub include_evaluations: bool,
    /// Include evaluator comments in the details.
    pub include_comments: bool,
    /// Template for image URLs of photos without an image reference.
    pub image_url_template: String,
}

impl From<&Config> for ReportOptions {
    fn from(config: &Config) -> Self {
        Self {
            include_evaluations: config.report.include_evaluations,
            include_comments: config.report.include_comments,
            image_url_template: config.contest.image_url_template.clone(),
        }
    }
}

/// Format an average with exactly two decimals.
///
/// Rounding looks at the exact decimal value of the `f64`: values above
/// the half round up, exact halves round away from zero (8.125 -> "8.13")
/// and values whose binary form sits just below a half round down
/// (2.675 is stored as 2.67499... and gives "2.67").
pub fn format_average(value: f64) -> String {
    if !value.is_finite() {
        return format!("{:.2}", value);
    }

    // Float formatting with a precision prints exact decimal digits
    let exact = format!("{:.30}", value.abs());
    let Some((whole, fraction)) = exact.split_once('.') else {
        return format!("{:.2}", value);
    };

    let Ok(mut cents) = format!("{}{}", whole, &fraction[..2]).parse::<u128>() else {
        return format!("{:.2}", value);
    };
    if fraction.as_bytes()[2] >= b'5' {
        cents += 1;
    }

    let sign = if value < 0.0 && cents != 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, cents / 100, cents % 100)
}
