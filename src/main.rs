//! PhotoJury - photo contest jury scoring
//!
//! A CLI tool that ranks contest photos by the average of their jury
//! evaluations, exports rankings as CSV and records new evaluations.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, unreadable snapshot, rejected submission, etc.)

mod analysis;
mod cli;
mod config;
mod labels;
mod models;
mod report;
mod store;

use anyhow::{Context, Result};
use cli::{Args, Command, ExportArgs, OutputFormat, PendingArgs, RankArgs, SubmitArgs};
use config::{Config, DEFAULT_CONFIG_FILE};
use labels::Labels;
use models::{CategoryFilter, EvaluationSubmission, RankingReport, ReportMetadata};
use report::ReportOptions;
use std::path::{Path, PathBuf};
use store::{LoadedSnapshot, SubmitOutcome};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("PhotoJury v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .photojury.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to set the snapshot path, score range and labels.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load the configuration and snapshot, then dispatch the command.
/// Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    let labels = Labels::from(&config.contest);

    let snapshot_path = PathBuf::from(&config.general.photos);
    let loaded = store::load_snapshot(&snapshot_path)
        .await
        .with_context(|| format!("Failed to load photos from {}", snapshot_path.display()))?;

    match args.command {
        Command::Rank(ref rank) => handle_rank(rank, &loaded, &config, &labels).await,
        Command::Export(ref export) => handle_export(export, &loaded, &labels).await,
        Command::Submit(ref submit) => handle_submit(submit, loaded, &config).await,
        Command::Pending(ref pending) => handle_pending(pending, &loaded, &labels),
        Command::Categories => handle_categories(&loaded, &labels),
        // Handled before logging starts
        Command::InitConfig => Ok(0),
    }
}

/// Rank photos and print or save the result in the requested format.
async fn handle_rank(
    rank: &RankArgs,
    loaded: &LoadedSnapshot,
    config: &Config,
    labels: &Labels,
) -> Result<i32> {
    let filter = rank.filter();
    warn_unknown_filter(&filter);

    let ranking = analysis::compute_ranking(loaded.snapshot.photos(), &filter);
    let scope = labels.filter(&filter);
    info!("Ranked {} photos in {}", ranking.len(), scope);

    let output = match rank.format {
        OutputFormat::Table => format!(
            "🏆 Ranking: {}\n\n{}\n",
            scope,
            report::format_ranking_table(&ranking, labels)
        ),
        OutputFormat::Csv => report::generate_csv(&ranking, labels),
        OutputFormat::Markdown | OutputFormat::Json => {
            let snapshot = loaded.source.path().display().to_string();
            let metadata = ReportMetadata::from_ranking(&snapshot, &filter, scope, &ranking);
            let report = RankingReport { metadata, ranking };

            if rank.format == OutputFormat::Json {
                report::generate_json_report(&report)?
            } else {
                report::generate_markdown_report(&report, labels, &ReportOptions::from(config))
            }
        }
    };

    match rank.output {
        Some(ref path) => {
            write_output(path, &output).await?;
            println!("✅ Ranking saved to: {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(0)
}

/// Export a ranking as a CSV file.
async fn handle_export(export: &ExportArgs, loaded: &LoadedSnapshot, labels: &Labels) -> Result<i32> {
    let filter = export.filter();
    warn_unknown_filter(&filter);

    let ranking = analysis::compute_ranking(loaded.snapshot.photos(), &filter);

    if ranking.is_empty() {
        warn!("No photos to export for {}", labels.filter(&filter));
        println!("⚠️  No photos to export for {}.", labels.filter(&filter));
        return Ok(0);
    }

    let path = export.output.clone().unwrap_or_else(|| {
        let today = chrono::Local::now().date_naive();
        PathBuf::from(report::default_export_file_name(&filter, today))
    });

    let csv = report::generate_csv(&ranking, labels);
    write_output(&path, &csv).await?;

    println!(
        "✅ Exported {} photos ({}) to: {}",
        ranking.len(),
        labels.filter(&filter),
        path.display()
    );
    Ok(0)
}

/// Validate and record an evaluation, then save the snapshot.
async fn handle_submit(submit: &SubmitArgs, mut loaded: LoadedSnapshot, config: &Config) -> Result<i32> {
    let submission = match submit.file {
        Some(ref file) => read_submission(file).await?,
        None => submit
            .inline_submission()
            .context("Submission needs --photo-id and --evaluator")?,
    };

    store::validate_submission(
        &submission,
        config.contest.min_score,
        config.contest.max_score,
    )?;

    let photo_id = submission.photo_id.clone();
    let evaluator = submission.evaluation.evaluator.clone();

    let outcome = loaded.snapshot.submit_evaluation(submission)?;
    store::save_snapshot(&loaded).await?;

    match outcome {
        SubmitOutcome::Added => {
            println!("✅ Recorded evaluation by {} for photo {}.", evaluator, photo_id)
        }
        SubmitOutcome::Replaced { .. } => println!(
            "✅ Updated the evaluation by {} for photo {}.",
            evaluator, photo_id
        ),
    }

    Ok(0)
}

/// List photos the evaluator still has to score.
fn handle_pending(pending: &PendingArgs, loaded: &LoadedSnapshot, labels: &Labels) -> Result<i32> {
    let filter = pending.filter();
    warn_unknown_filter(&filter);

    let evaluator = models::normalize_evaluator(&pending.evaluator);
    let photos = analysis::pending_for_evaluator(loaded.snapshot.photos(), &evaluator, &filter);

    println!(
        "{}",
        report::format_pending(&photos, &evaluator, &labels.filter(&filter), labels)
    );
    Ok(0)
}

/// Print evaluation progress per category.
fn handle_categories(loaded: &LoadedSnapshot, labels: &Labels) -> Result<i32> {
    let summaries = analysis::category_summaries(loaded.snapshot.photos());

    println!("📂 Categories:\n");
    println!("{}", report::format_category_summaries(&summaries, labels));
    Ok(0)
}

/// Read a submission document, normalizing the evaluator.
async fn read_submission(path: &Path) -> Result<EvaluationSubmission> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read submission {}", path.display()))?;

    let mut submission: EvaluationSubmission = serde_json::from_str(&content)
        .with_context(|| format!("Invalid submission in {}", path.display()))?;
    submission.evaluation.evaluator = models::normalize_evaluator(&submission.evaluation.evaluator);

    if submission.evaluation.evaluator.is_empty() {
        anyhow::bail!("Submission in {} has an empty evaluator", path.display());
    }

    Ok(submission)
}

async fn write_output(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn warn_unknown_filter(filter: &CategoryFilter) {
    if let CategoryFilter::Only(category) = filter {
        if !category.is_known() {
            warn!("Unknown category '{}'; no fixed category matches it", category);
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
