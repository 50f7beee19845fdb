//! Data models for the photo contest.
//!
//! This module contains the photo and evaluation records read from a
//! snapshot, plus the ranked projections and report structures built
//! from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Contest category a photo competes in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Fauna,
    Flora,
    Agua,
    Destruicao,
    Pesquisas,
    Religiosidade,
    Povos,
    /// A key outside the fixed set, kept verbatim.
    Other(String),
}

impl Category {
    /// The fixed categories, in display order.
    pub const ALL: [Category; 7] = [
        Category::Fauna,
        Category::Flora,
        Category::Agua,
        Category::Destruicao,
        Category::Pesquisas,
        Category::Religiosidade,
        Category::Povos,
    ];

    /// Returns the storage key of the category.
    pub fn key(&self) -> &str {
        match self {
            Category::Fauna => "fauna",
            Category::Flora => "flora",
            Category::Agua => "agua",
            Category::Destruicao => "destruicao",
            Category::Pesquisas => "pesquisas",
            Category::Religiosidade => "religiosidade",
            Category::Povos => "povos",
            Category::Other(key) => key,
        }
    }

    /// Whether the category belongs to the fixed set.
    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "fauna" => Category::Fauna,
            "flora" => Category::Flora,
            "agua" => Category::Agua,
            "destruicao" => Category::Destruicao,
            "pesquisas" => Category::Pesquisas,
            "religiosidade" => Category::Religiosidade,
            "povos" => Category::Povos,
            _ => Category::Other(s.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from(s.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.key().to_string()
    }
}

/// Scoring criterion of an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Criterion {
    Enquadramento,
    Criatividade,
    Contexto,
    ComposicaoFoto,
    ComposicaoCores,
    Identificacao,
    Resolucao,
    /// A key outside the fixed set, kept verbatim.
    Other(String),
}

impl Criterion {
    /// The fixed criteria, in canonical order.
    pub const ALL: [Criterion; 7] = [
        Criterion::Enquadramento,
        Criterion::Criatividade,
        Criterion::Contexto,
        Criterion::ComposicaoFoto,
        Criterion::ComposicaoCores,
        Criterion::Identificacao,
        Criterion::Resolucao,
    ];

    /// Order in which criteria break ties between equal overall averages.
    pub const TIE_BREAK_ORDER: [Criterion; 7] = [
        Criterion::ComposicaoFoto,
        Criterion::Criatividade,
        Criterion::Enquadramento,
        Criterion::Contexto,
        Criterion::ComposicaoCores,
        Criterion::Identificacao,
        Criterion::Resolucao,
    ];

    /// Returns the storage key of the criterion.
    pub fn key(&self) -> &str {
        match self {
            Criterion::Enquadramento => "enquadramento",
            Criterion::Criatividade => "criatividade",
            Criterion::Contexto => "contexto",
            Criterion::ComposicaoFoto => "composicao-foto",
            Criterion::ComposicaoCores => "composicao-cores",
            Criterion::Identificacao => "identificacao",
            Criterion::Resolucao => "resolucao",
            Criterion::Other(key) => key,
        }
    }

    /// Whether the criterion belongs to the fixed set.
    pub fn is_known(&self) -> bool {
        !matches!(self, Criterion::Other(_))
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Keys are matched exactly as written, so distinct spellings stay
/// distinct scores.
impl From<&str> for Criterion {
    fn from(s: &str) -> Self {
        match s {
            "enquadramento" => Criterion::Enquadramento,
            "criatividade" => Criterion::Criatividade,
            "contexto" => Criterion::Contexto,
            "composicao-foto" => Criterion::ComposicaoFoto,
            "composicao-cores" => Criterion::ComposicaoCores,
            "identificacao" => Criterion::Identificacao,
            "resolucao" => Criterion::Resolucao,
            _ => Criterion::Other(s.to_string()),
        }
    }
}

impl From<String> for Criterion {
    fn from(s: String) -> Self {
        Criterion::from(s.as_str())
    }
}

impl From<Criterion> for String {
    fn from(criterion: Criterion) -> Self {
        criterion.key().to_string()
    }
}

/// A score exactly as it appeared in the snapshot.
///
/// Scores are integers, but stored documents also carry floats and
/// strings. [`ScoreValue::as_integer`] reads them with integer-prefix
/// semantics; values it cannot read are malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl ScoreValue {
    /// Returns the integer value, or `None` when the score is malformed.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ScoreValue::Integer(n) => Some(*n),
            ScoreValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            ScoreValue::Float(_) => None,
            ScoreValue::Text(s) => parse_integer_prefix(s),
            ScoreValue::Other(_) => None,
        }
    }
}

impl From<i64> for ScoreValue {
    fn from(n: i64) -> Self {
        ScoreValue::Integer(n)
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Integer(n) => write!(f, "{}", n),
            ScoreValue::Float(x) => write!(f, "{}", x),
            ScoreValue::Text(s) => write!(f, "{}", s),
            ScoreValue::Other(value) => write!(f, "{}", value),
        }
    }
}

/// Leading whitespace, optional sign, then at least one decimal digit.
/// Trailing garbage is ignored ("7px" reads as 7).
fn parse_integer_prefix(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let value: i64 = rest[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Evaluator identifiers are compared trimmed and lowercased.
pub fn normalize_evaluator(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One evaluator's scores for one photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Evaluator identifier (unique per photo).
    pub evaluator: String,
    /// Criterion scores; missing criteria do not contribute.
    #[serde(default)]
    pub scores: BTreeMap<Criterion, ScoreValue>,
    /// Free-text comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Evaluation {
    /// Whether this evaluation was left by `evaluator`, compared after
    /// [`normalize_evaluator`].
    pub fn is_by(&self, evaluator: &str) -> bool {
        normalize_evaluator(&self.evaluator) == normalize_evaluator(evaluator)
    }

    /// Returns the comments, treating blank text as absent.
    pub fn comments_text(&self) -> Option<&str> {
        self.comments
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// A contest photo and the evaluations it has received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Unique photo identifier.
    pub id: String,
    /// Category the photo competes in.
    pub category: Category,
    /// Name of the submitting participant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<String>,
    /// Opaque reference used to display the image.
    #[serde(default, alias = "url", skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    /// Evaluations, at most one per evaluator.
    #[serde(default, alias = "ratings")]
    pub evaluations: Vec<Evaluation>,
}

impl Photo {
    /// Returns the participant name, treating an empty name as absent.
    pub fn participant_name(&self) -> Option<&str> {
        self.participant
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Resolves a displayable image URL, falling back to the template.
    ///
    /// The template's `{id}` placeholder is replaced with the photo id.
    pub fn image_url(&self, template: &str) -> String {
        match self.image_ref.as_deref().filter(|r| !r.is_empty()) {
            Some(reference) => reference.to_string(),
            None => template.replace("{id}", &self.id),
        }
    }

    /// Returns the evaluation left by `evaluator`, if any.
    pub fn evaluation_by(&self, evaluator: &str) -> Option<&Evaluation> {
        self.evaluations.iter().find(|e| e.is_by(evaluator))
    }
}

/// An evaluation addressed to a specific photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSubmission {
    /// Target photo.
    pub photo_id: String,
    #[serde(flatten)]
    pub evaluation: Evaluation,
}

/// Selects which photos take part in a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every category.
    #[default]
    All,
    /// A single category.
    Only(Category),
}

impl CategoryFilter {
    /// Whether a photo of `category` passes the filter.
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => only == category,
        }
    }

    /// Returns `all` or the category key.
    pub fn key(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.key(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(Category::from(s))
        }
    }
}

/// A photo with its derived ranking figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPhoto<'a> {
    /// The underlying photo record.
    #[serde(flatten)]
    pub photo: &'a Photo,
    /// Mean of the per-evaluation means (full precision).
    pub average: f64,
    /// Number of evaluations on the photo.
    pub num_evaluations: usize,
    /// Raw per-criterion sums over the fixed criteria.
    pub criteria_scores: BTreeMap<Criterion, i64>,
    /// Scores that could not be read and were counted as zero.
    pub malformed_scores: usize,
}

impl RankedPhoto<'_> {
    /// Per-criterion average: the criterion's sum divided by the number of
    /// evaluations on the photo. Zero when the photo has no evaluations.
    pub fn criterion_average(&self, criterion: &Criterion) -> f64 {
        if self.num_evaluations == 0 {
            return 0.0;
        }

        let sum = self.criteria_scores.get(criterion).copied().unwrap_or(0);
        sum as f64 / self.num_evaluations as f64
    }
}

/// Metadata about a ranking report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the snapshot was loaded from.
    pub snapshot: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Category filter key (`all` or a category key).
    pub category: String,
    /// Display label of the filter.
    pub category_label: String,
    /// Number of photos in the ranking.
    pub photos_ranked: usize,
    /// Total evaluations across the ranked photos.
    pub total_evaluations: usize,
    /// Distinct evaluators across the ranked photos.
    pub evaluators: usize,
}

impl ReportMetadata {
    /// Builds metadata describing `ranking`.
    pub fn from_ranking(
        snapshot: &str,
        filter: &CategoryFilter,
        category_label: String,
        ranking: &[RankedPhoto<'_>],
    ) -> Self {
        let evaluators: BTreeSet<String> = ranking
            .iter()
            .flat_map(|r| {
                r.photo
                    .evaluations
                    .iter()
                    .map(|e| normalize_evaluator(&e.evaluator))
            })
            .collect();

        Self {
            snapshot: snapshot.to_string(),
            generated_at: Utc::now(),
            category: filter.key().to_string(),
            category_label,
            photos_ranked: ranking.len(),
            total_evaluations: ranking.iter().map(|r| r.num_evaluations).sum(),
            evaluators: evaluators.len(),
        }
    }
}

/// A complete ranking report.
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport<'a> {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Ranked photos, best first.
    pub ranking: Vec<RankedPhoto<'a>>,
}
