//! Feature extraction shared with the offline trainer.
//!
//! Builds the vocabulary and class list from the intent store and encodes each
//! pattern as a (bag-of-words, one-hot label) row. Fitting the network is done
//! elsewhere; this module only guarantees training and inference see the same
//! features.

use super::normalizer::{tokenize, TextNormalizer};
use super::vectorizer::{ClassList, Vocabulary};
use crate::error::AppError;
use crate::store::IntentStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Punctuation tokens left out of the vocabulary.
pub const IGNORE_TOKENS: &[&str] = &["?", "!", "¿", "¡", ".", ","];

/// One encoded training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    pub bag: Vec<f32>,
    pub label: Vec<f32>,
}

/// Sorted, deduplicated vocabulary plus tags in first-appearance order.
///
/// Intents without patterns contribute no class since there is nothing to
/// train them on.
pub fn build_vocabulary(
    store: &IntentStore,
    normalizer: &TextNormalizer,
) -> Result<(Vocabulary, ClassList), AppError> {
    let mut words = BTreeSet::new();
    let mut tags: Vec<String> = Vec::new();

    for record in store.records() {
        for pattern in &record.patterns {
            for token in tokenize(pattern) {
                if IGNORE_TOKENS.contains(&token.as_str()) {
                    continue;
                }
                words.insert(normalizer.normalize_token(&token));
            }
            if !tags.contains(&record.tag) {
                tags.push(record.tag.clone());
            }
        }
    }

    Ok((
        Vocabulary::new(words.into_iter().collect())?,
        ClassList::new(tags)?,
    ))
}

/// One row per pattern, in store order.
pub fn training_rows(
    store: &IntentStore,
    normalizer: &TextNormalizer,
    vocabulary: &Vocabulary,
    classes: &ClassList,
) -> Result<Vec<TrainingRow>, AppError> {
    let mut rows = Vec::new();
    for record in store.records() {
        if record.patterns.is_empty() {
            continue;
        }
        let index = classes.position(&record.tag).ok_or_else(|| {
            AppError::Validation(format!("tag '{}' missing from class list", record.tag))
        })?;
        for pattern in &record.patterns {
            let mut label = vec![0.0; classes.len()];
            label[index] = 1.0;
            rows.push(TrainingRow {
                bag: vocabulary.vectorize(&normalizer.normalize(pattern)),
                label,
            });
        }
    }
    Ok(rows)
}
