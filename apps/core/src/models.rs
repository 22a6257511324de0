use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single intent: its tag, example patterns and canned responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRecord {
    /// Unique identifier of the intent (e.g., "saludo", "new_symptom_12").
    pub tag: String,
    /// Example user messages for this intent.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Replies the bot may choose from.
    #[serde(default)]
    pub responses: Vec<String>,
}

impl IntentRecord {
    pub fn new(tag: impl Into<String>, patterns: Vec<String>, responses: Vec<String>) -> Self {
        Self {
            tag: tag.into(),
            patterns,
            responses,
        }
    }
}

/// On-disk shape of the intent store: `{"intents": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentsDocument {
    pub intents: Vec<IntentRecord>,
}

/// A satisfaction survey submitted by a user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SurveyEntry {
    /// Full name of the respondent.
    #[validate(length(min = 1))]
    pub full_name: String,
    /// Satisfaction score, 1 (bad) to 5 (great).
    #[validate(range(min = 1, max = 5))]
    pub satisfaction: u8,
    /// Free-text feedback, may be empty.
    #[serde(default)]
    pub feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_parses_missing_lists_as_empty() {
        let doc: IntentsDocument =
            serde_json::from_str(r#"{"intents": [{"tag": "vacio"}]}"#).unwrap();
        assert_eq!(doc.intents.len(), 1);
        assert!(doc.intents[0].patterns.is_empty());
        assert!(doc.intents[0].responses.is_empty());
    }

    #[test]
    fn test_survey_validation() {
        let ok = SurveyEntry {
            full_name: "Ana Pérez".to_string(),
            satisfaction: 5,
            feedback: String::new(),
        };
        assert!(ok.validate().is_ok());

        let bad = SurveyEntry {
            full_name: String::new(),
            satisfaction: 9,
            feedback: "?".to_string(),
        };
        assert!(bad.validate().is_err());
    }
}
