//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.photojury.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".photojury.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Contest settings.
    #[serde(default)]
    pub contest: ContestConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Photo snapshot path (JSON file or directory of JSON documents).
    #[serde(default = "default_photos")]
    pub photos: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            photos: default_photos(),
        }
    }
}

fn default_photos() -> String {
    "photos.json".to_string()
}

/// Contest settings: score range, image URLs and display labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestConfig {
    /// Template for image URLs of photos without an image reference.
    /// `{id}` is replaced with the photo id.
    #[serde(default = "default_image_url_template")]
    pub image_url_template: String,

    /// Lowest score accepted on submission.
    #[serde(default = "default_min_score")]
    pub min_score: i64,

    /// Highest score accepted on submission.
    #[serde(default = "default_max_score")]
    pub max_score: i64,

    /// Category label overrides, keyed by category key.
    #[serde(default)]
    pub category_labels: BTreeMap<String, String>,

    /// Criterion label overrides, keyed by criterion key.
    #[serde(default)]
    pub criterion_labels: BTreeMap<String, String>,
}

impl Default for ContestConfig {
    fn default() -> Self {
        Self {
            image_url_template: default_image_url_template(),
            min_score: default_min_score(),
            max_score: default_max_score(),
            category_labels: BTreeMap::new(),
            criterion_labels: BTreeMap::new(),
        }
    }
}

fn default_image_url_template() -> String {
    "https://lh3.googleusercontent.com/d/{id}".to_string()
}

fn default_min_score() -> i64 {
    1
}

fn default_max_score() -> i64 {
    10
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include per-photo evaluation details in Markdown reports.
    #[serde(default = "default_true")]
    pub include_evaluations: bool,

    /// Include evaluator comments in the details.
    #[serde(default = "default_true")]
    pub include_comments: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_evaluations: true,
            include_comments: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref photos) = args.photos {
            self.general.photos = photos.display().to_string();
        }
    }

    /// Check settings that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.contest.min_score > self.contest.max_score {
            anyhow::bail!(
                "contest.min_score ({}) must not exceed contest.max_score ({})",
                self.contest.min_score,
                self.contest.max_score
            );
        }

        if self.general.photos.trim().is_empty() {
            anyhow::bail!("general.photos must not be empty");
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.photos, "photos.json");
        assert_eq!(config.contest.min_score, 1);
        assert_eq!(config.contest.max_score, 10);
        assert!(config.report.include_evaluations);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
photos = "snapshots/2024"

[contest]
max_score = 5

[contest.category_labels]
agua = "Water"

[report]
include_comments = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.photos, "snapshots/2024");
        assert_eq!(config.contest.min_score, 1);
        assert_eq!(config.contest.max_score, 5);
        assert_eq!(
            config.contest.category_labels.get("agua").map(String::as_str),
            Some("Water")
        );
        assert!(config.report.include_evaluations);
        assert!(!config.report.include_comments);
    }

    #[test]
    fn test_logging_is_not_a_config_setting() {
        assert!(!Config::default_toml().contains("verbose"));

        // Files written by older versions still load
        let config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        assert_eq!(config.general.photos, "photos.json");
    }

    #[test]
    fn test_validate_rejects_inverted_score_range() {
        let mut config = Config::default();
        config.contest.min_score = 8;
        config.contest.max_score = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[contest]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.contest.image_url_template, default_image_url_template());
    }
}
