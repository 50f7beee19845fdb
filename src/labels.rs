//! Display labels for categories and criteria.
//!
//! Labels come from a static table that the `[contest]` config section can
//! override. Keys missing from the table fall back to [`format_key`].

use crate::config::ContestConfig;
use crate::models::{Category, CategoryFilter, Criterion};
use std::collections::BTreeMap;

/// Built-in criterion labels. These match the fallback formatting of each
/// key so exported CSV headers stay stable.
const CRITERION_LABELS: [(&str, &str); 7] = [
    ("enquadramento", "Enquadramento"),
    ("criatividade", "Criatividade"),
    ("contexto", "Contexto"),
    ("composicao-foto", "Composicao Foto"),
    ("composicao-cores", "Composicao Cores"),
    ("identificacao", "Identificacao"),
    ("resolucao", "Resolucao"),
];

const CATEGORY_LABELS: [(&str, &str); 7] = [
    ("fauna", "Fauna"),
    ("flora", "Flora"),
    ("agua", "Água"),
    ("destruicao", "Destruição do Cerrado"),
    ("pesquisas", "Pesquisas Científicas"),
    ("religiosidade", "Religiosidade"),
    ("povos", "Povos Tradicionais"),
];

/// Label lookup tables.
#[derive(Debug, Clone)]
pub struct Labels {
    criteria: BTreeMap<String, String>,
    categories: BTreeMap<String, String>,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            criteria: to_table(&CRITERION_LABELS),
            categories: to_table(&CATEGORY_LABELS),
        }
    }
}

impl From<&ContestConfig> for Labels {
    fn from(config: &ContestConfig) -> Self {
        let mut labels = Self::default();
        labels.criteria.extend(
            config
                .criterion_labels
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        labels.categories.extend(
            config
                .category_labels
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        labels
    }
}

impl Labels {
    /// Label of a criterion.
    pub fn criterion(&self, criterion: &Criterion) -> String {
        lookup(&self.criteria, criterion.key())
    }

    /// Label of a category.
    pub fn category(&self, category: &Category) -> String {
        lookup(&self.categories, category.key())
    }

    /// Label of a category filter.
    pub fn filter(&self, filter: &CategoryFilter) -> String {
        match filter {
            CategoryFilter::All => "All categories".to_string(),
            CategoryFilter::Only(category) => self.category(category),
        }
    }
}

fn to_table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn lookup(table: &BTreeMap<String, String>, key: &str) -> String {
    table
        .get(key)
        .cloned()
        .unwrap_or_else(|| format_key(key))
}

/// Formats a raw key for display: `-` and `_` become spaces and every
/// word starts with an uppercase letter.
pub fn format_key(key: &str) -> String {
    let mut formatted = String::with_capacity(key.len());
    let mut at_word_start = true;

    for ch in key.chars() {
        let ch = if ch == '-' || ch == '_' { ' ' } else { ch };

        if ch.is_alphanumeric() {
            if at_word_start {
                formatted.extend(ch.to_uppercase());
            } else {
                formatted.push(ch);
            }
            at_word_start = false;
        } else {
            formatted.push(ch);
            at_word_start = true;
        }
    }

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_key() {
        assert_eq!(format_key("composicao-foto"), "Composicao Foto");
        assert_eq!(format_key("povos_tradicionais"), "Povos Tradicionais");
        assert_eq!(format_key("luz"), "Luz");
        assert_eq!(format_key(""), "");
    }

    #[test]
    fn test_builtin_criterion_labels_match_fallback() {
        for (key, label) in CRITERION_LABELS {
            assert_eq!(format_key(key), label);
        }
    }

    #[test]
    fn test_builtin_labels() {
        let labels = Labels::default();
        assert_eq!(labels.criterion(&Criterion::ComposicaoCores), "Composicao Cores");
        assert_eq!(labels.category(&Category::Agua), "Água");
        assert_eq!(labels.category(&Category::Destruicao), "Destruição do Cerrado");
        assert_eq!(labels.filter(&CategoryFilter::All), "All categories");
    }

    #[test]
    fn test_fallback_for_unknown_keys() {
        let labels = Labels::default();
        assert_eq!(
            labels.category(&Category::Other("arte_urbana".to_string())),
            "Arte Urbana"
        );
        assert_eq!(
            labels.criterion(&Criterion::Other("uso-da-luz".to_string())),
            "Uso Da Luz"
        );
    }

    #[test]
    fn test_config_overrides() {
        let mut config = ContestConfig::default();
        config
            .criterion_labels
            .insert("composicao-foto".to_string(), "Composição da Foto".to_string());
        config
            .category_labels
            .insert("fauna".to_string(), "Animais".to_string());

        let labels = Labels::from(&config);
        assert_eq!(labels.criterion(&Criterion::ComposicaoFoto), "Composição da Foto");
        assert_eq!(labels.category(&Category::Fauna), "Animais");
        assert_eq!(labels.category(&Category::Flora), "Flora");
    }
}
