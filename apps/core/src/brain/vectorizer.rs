//! Bag-of-words vectorization over a fixed vocabulary.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Ordered, unique normalized tokens known to the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    /// Builds a vocabulary, rejecting duplicate entries.
    pub fn new(words: Vec<String>) -> Result<Self, AppError> {
        ensure_unique(&words, "vocabulary")?;
        Ok(Self { words })
    }

    /// Loads a JSON array of strings produced by the trainer.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        Self::new(serde_json::from_str(&raw)?)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Binary presence vector: slot `i` is 1.0 iff `words[i]` occurs in `tokens`.
    pub fn vectorize<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<f32> {
        let present: HashSet<&str> = tokens.iter().map(|t| t.as_ref()).collect();
        self.words
            .iter()
            .map(|word| if present.contains(word.as_str()) { 1.0 } else { 0.0 })
            .collect()
    }
}

/// Ordered, unique intent tags; index `i` matches model output `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassList {
    tags: Vec<String>,
}

impl ClassList {
    pub fn new(tags: Vec<String>) -> Result<Self, AppError> {
        ensure_unique(&tags, "class list")?;
        Ok(Self { tags })
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        Self::new(serde_json::from_str(&raw)?)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.tags.get(index).map(String::as_str)
    }

    pub fn position(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.position(tag).is_some()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

fn ensure_unique(items: &[String], what: &str) -> Result<(), AppError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.as_str()) {
            return Err(AppError::Validation(format!(
                "duplicate entry '{}' in {}",
                item, what
            )));
        }
    }
    Ok(())
}
