//! Text normalization: tokenization, lowercasing and lemmatization.
//!
//! Tokens follow Unicode word boundaries (UAX #29). Whitespace is dropped,
//! punctuation is kept as standalone tokens the way a word tokenizer does,
//! so "¿Tienes fiebre?" becomes `["¿", "tienes", "fiebre", "?"]`.

use crate::error::AppError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;
use unicode_segmentation::UnicodeSegmentation;

/// Upper bound on lemmatization passes for a single word.
const MAX_LEMMA_PASSES: usize = 4;

/// Irregular forms that suffix rules would get wrong.
/// Words mapped to themselves are protected from the rules.
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("people", "person"),
    ("oxen", "ox"),
    ("this", "this"),
    ("thus", "thus"),
    ("yes", "yes"),
    ("gas", "gas"),
    ("lens", "lens"),
    ("news", "news"),
    ("series", "series"),
    ("species", "species"),
    ("always", "always"),
    ("perhaps", "perhaps"),
    ("diabetes", "diabetes"),
    ("herpes", "herpes"),
    ("measles", "measles"),
    ("mumps", "mumps"),
];

/// Detachment rules, longest suffix first. `(suffix, replacement)`.
const DETACHMENT_RULES: &[(&str, &str)] = &[
    ("tches", "tch"),
    ("shes", "sh"),
    ("sses", "ss"),
    ("zzes", "zz"),
    ("xes", "x"),
    ("ies", "y"),
    ("s", ""),
];

/// Endings that look plural but are not.
const PROTECTED_ENDINGS: &[&str] = &["ss", "us", "is"];

/// Reduces a lowercase word to its dictionary base form.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: HashMap<String, String>,
    min_stem_len: usize,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    /// Lemmatizer with the built-in irregular table.
    pub fn new() -> Self {
        let exceptions = IRREGULAR_FORMS
            .iter()
            .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
            .collect();
        Self {
            exceptions,
            min_stem_len: 3,
        }
    }

    /// Extends the irregular table with a JSON object `{"form": "lemma"}`.
    pub fn with_table_file(mut self, path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        let table: HashMap<String, String> = serde_json::from_str(&raw)?;
        info!("Loaded {} lemma entries from {:?}", table.len(), path);
        for (form, lemma) in table {
            self.exceptions.insert(form.to_lowercase(), lemma.to_lowercase());
        }
        Ok(self)
    }

    /// Lemmatize until the form stops changing.
    pub fn lemmatize(&self, word: &str) -> String {
        let mut current = word.to_string();
        for _ in 0..MAX_LEMMA_PASSES {
            let next = self.lemmatize_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn lemmatize_once(&self, word: &str) -> String {
        if let Some(lemma) = self.exceptions.get(word) {
            return lemma.clone();
        }
        if !word.chars().all(char::is_alphabetic) {
            return word.to_string();
        }
        if PROTECTED_ENDINGS.iter().any(|end| word.ends_with(end)) {
            return word.to_string();
        }

        for (suffix, replacement) in DETACHMENT_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                let candidate = format!("{}{}", stem, replacement);
                if candidate.chars().count() >= self.min_stem_len {
                    return candidate;
                }
            }
        }
        word.to_string()
    }
}

/// Splits text into word and punctuation tokens, dropping whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_word_bounds()
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| segment.to_string())
        .collect()
}

/// Tokenizes, lowercases and lemmatizes raw input.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    lemmatizer: Lemmatizer,
}

impl TextNormalizer {
    pub fn new(lemmatizer: Lemmatizer) -> Self {
        Self { lemmatizer }
    }

    /// Canonical lowercase lemma sequence for `text`.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .iter()
            .map(|token| self.normalize_token(token))
            .collect()
    }

    /// Lowercase + lemmatize a single already-split token.
    pub fn normalize_token(&self, token: &str) -> String {
        self.lemmatizer.lemmatize(&token.to_lowercase())
    }
}
