//! Intent classification using the trained bag-of-words model.
//!
//! Wraps an [`IntentModel`] together with the class list it was trained on and
//! turns its probability vector into a single predicted tag.

use super::model::IntentModel;
use super::vectorizer::ClassList;
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    /// Predicted tag, always a member of the class list
    pub tag: String,
    /// Probability of the predicted tag (0.0 - 1.0)
    pub confidence: f32,
}

impl IntentResult {
    pub fn new(tag: impl Into<String>, confidence: f32) -> Self {
        Self {
            tag: tag.into(),
            confidence,
        }
    }
}

/// Intent classifier over a fixed class list
pub struct IntentClassifier {
    model: Box<dyn IntentModel>,
    classes: ClassList,
}

impl std::fmt::Debug for IntentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentClassifier")
            .field("input_dim", &self.model.input_dim())
            .field("classes", &self.classes.tags())
            .finish()
    }
}

impl IntentClassifier {
    /// Pairs a model with its class list. The model's output width must match.
    pub fn new(model: Box<dyn IntentModel>, classes: ClassList) -> Result<Self, AppError> {
        if classes.is_empty() {
            return Err(AppError::Model("class list is empty".to_string()));
        }
        if model.output_dim() != classes.len() {
            return Err(AppError::Model(format!(
                "model produces {} outputs but the class list has {} tags",
                model.output_dim(),
                classes.len()
            )));
        }
        Ok(Self { model, classes })
    }

    pub fn input_dim(&self) -> usize {
        self.model.input_dim()
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    /// Classify a bag-of-words vector.
    ///
    /// Picks the highest probability; on ties the first index wins.
    pub fn classify(&self, vector: &[f32]) -> Result<IntentResult, AppError> {
        let probabilities = self.model.predict(vector)?;
        if probabilities.len() != self.classes.len() {
            return Err(AppError::Model(format!(
                "model returned {} probabilities for {} classes",
                probabilities.len(),
                self.classes.len()
            )));
        }

        let mut best_index = 0;
        let mut best_score = f32::NEG_INFINITY;
        for (i, p) in probabilities.iter().enumerate() {
            if *p > best_score {
                best_score = *p;
                best_index = i;
            }
        }

        let tag = self
            .classes
            .get(best_index)
            .ok_or_else(|| AppError::Internal(format!("no class at index {}", best_index)))?;

        // NaN never wins the comparison, so an all-NaN row ends up at 0.0
        let confidence = best_score.clamp(0.0, 1.0);

        Ok(IntentResult::new(tag, confidence))
    }
}
