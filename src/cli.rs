//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{
    normalize_evaluator, CategoryFilter, Criterion, Evaluation, EvaluationSubmission, ScoreValue,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PhotoJury - jury scoring and ranking for photo contests
///
/// Ranks contest photos by the average of their jury evaluations,
/// exports rankings as CSV and records new evaluations.
///
/// Examples:
///   photojury rank
///   photojury rank --category fauna --format markdown -o fauna.md
///   photojury export --category agua
///   photojury submit --photo-id 1aXf9kQm --evaluator jurado1 --score contexto=8
///   photojury pending --evaluator jurado1
///   photojury init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Photo snapshot: a JSON file or a directory of JSON documents
    ///
    /// Can also be set via PHOTOJURY_PHOTOS env var or .photojury.toml config.
    #[arg(short, long, value_name = "PATH", env = "PHOTOJURY_PHOTOS", global = true)]
    pub photos: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .photojury.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Rank photos by average jury score
    Rank(RankArgs),
    /// Export a ranking as CSV
    Export(ExportArgs),
    /// Record an evaluation for a photo
    Submit(SubmitArgs),
    /// List photos an evaluator has not scored yet
    Pending(PendingArgs),
    /// Show evaluation progress per category
    Categories,
    /// Generate a default .photojury.toml configuration file
    InitConfig,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RankArgs {
    /// Category key to rank, or "all"
    #[arg(long, default_value = "all", value_name = "CATEGORY")]
    pub category: String,

    /// Output format
    #[arg(long, default_value = "table", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExportArgs {
    /// Category key to export, or "all"
    #[arg(long, default_value = "all", value_name = "CATEGORY")]
    pub category: String,

    /// Output file
    ///
    /// Defaults to ranking_<category>_<YYYY-MM-DD>.csv
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SubmitArgs {
    /// Read the submission from a JSON file
    /// ({"photoId", "evaluator", "scores", "comments"})
    #[arg(long, value_name = "FILE", conflicts_with_all = ["photo_id", "scores", "comments"])]
    pub file: Option<PathBuf>,

    /// Photo being evaluated
    #[arg(long, value_name = "ID", required_unless_present = "file")]
    pub photo_id: Option<String>,

    /// Evaluator identifier
    #[arg(short, long, value_name = "NAME", required_unless_present = "file")]
    pub evaluator: Option<String>,

    /// Criterion score, repeatable
    ///
    /// Example: --score composicao-foto=8 --score contexto=7
    #[arg(long = "score", value_name = "CRITERION=VALUE", value_parser = parse_score_pair)]
    pub scores: Vec<(String, i64)>,

    /// Free-text comments
    #[arg(long, value_name = "TEXT")]
    pub comments: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PendingArgs {
    /// Evaluator identifier
    #[arg(short, long, value_name = "NAME")]
    pub evaluator: String,

    /// Category key to check, or "all"
    #[arg(long, default_value = "all", value_name = "CATEGORY")]
    pub category: String,
}

/// Output format for the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain-text table (default)
    #[default]
    Table,
    /// Markdown report
    Markdown,
    /// JSON report
    Json,
    /// CSV export
    Csv,
}

/// Parse a `criterion=value` pair.
pub fn parse_score_pair(s: &str) -> Result<(String, i64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CRITERION=VALUE, got '{}'", s))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing criterion in '{}'", s));
    }

    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("score for '{}' must be an integer, got '{}'", key, value.trim()))?;

    Ok((key.to_lowercase(), value))
}

impl RankArgs {
    pub fn filter(&self) -> CategoryFilter {
        CategoryFilter::from(self.category.as_str())
    }
}

impl ExportArgs {
    pub fn filter(&self) -> CategoryFilter {
        CategoryFilter::from(self.category.as_str())
    }
}

impl PendingArgs {
    pub fn filter(&self) -> CategoryFilter {
        CategoryFilter::from(self.category.as_str())
    }
}

impl SubmitArgs {
    /// Build a submission from the inline flags.
    ///
    /// Returns `None` in `--file` mode or when the photo id or evaluator
    /// is missing.
    pub fn inline_submission(&self) -> Option<EvaluationSubmission> {
        if self.file.is_some() {
            return None;
        }

        let photo_id = self.photo_id.as_deref()?.trim().to_string();
        let evaluator = normalize_evaluator(self.evaluator.as_deref()?);

        let scores = self
            .scores
            .iter()
            .map(|(key, value)| (Criterion::from(key.as_str()), ScoreValue::Integer(*value)))
            .collect();

        let comments = self
            .comments
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);

        Some(EvaluationSubmission {
            photo_id,
            evaluation: Evaluation {
                evaluator,
                scores,
                comments,
            },
        })
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            Command::Submit(submit) if submit.file.is_none() => {
                let evaluator = submit.evaluator.as_deref().unwrap_or("");
                if evaluator.trim().is_empty() {
                    return Err("Evaluator must not be empty".to_string());
                }

                let photo_id = submit.photo_id.as_deref().unwrap_or("");
                if photo_id.trim().is_empty() {
                    return Err("Photo id must not be empty".to_string());
                }

                if submit.scores.is_empty() {
                    return Err("At least one --score CRITERION=VALUE is required".to_string());
                }
            }
            Command::Pending(pending) => {
                if pending.evaluator.trim().is_empty() {
                    return Err("Evaluator must not be empty".to_string());
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
