//! Response resolution and the teaching dialogue.
//!
//! Given a prediction, the raw message and the conversation's teaching state,
//! decides the reply text. Teaching mode appends new intents to the store.
//!
//! ```text
//!  Idle --(low confidence + teach command)--> AwaitingSymptom
//!  AwaitingSymptom --(any message)--> AwaitingResponse{symptom}
//!  AwaitingResponse{symptom} --(any message, store append ok)--> Idle
//! ```

use super::intent::IntentResult;
use crate::config::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::error::AppError;
use crate::store::IntentStore;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Placeholder replaced by the user's message in the fallback template.
const MESSAGE_PLACEHOLDER: &str = "{message}";

/// Per-conversation teaching state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TeachingSession {
    #[default]
    Idle,
    AwaitingSymptom,
    AwaitingResponse { symptom: String },
}

impl TeachingSession {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, TeachingSession::Idle)
    }

    pub fn pending_symptom(&self) -> Option<&str> {
        match self {
            TeachingSession::AwaitingResponse { symptom } => Some(symptom),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        *self = TeachingSession::Idle;
    }
}

/// Which branch produced a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyKind {
    /// High-confidence prediction answered from its own responses
    Classified { tag: String },
    /// Low confidence, but the message literally matched a stored pattern
    PatternMatch { tag: String },
    /// Teach command accepted, waiting for the symptom
    TeachStarted,
    /// Symptom stored, waiting for the response
    SymptomCaptured,
    /// New intent appended to the store
    Taught { tag: String },
    /// Nothing matched
    NotUnderstood,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub kind: ReplyKind,
}

impl Reply {
    fn new(text: impl Into<String>, kind: ReplyKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Threshold, teach commands and canned replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub confidence_threshold: f32,
    /// Lowercase commands that start teaching mode.
    pub teach_commands: Vec<String>,
    pub ask_symptom: String,
    pub ask_response: String,
    pub saved: String,
    /// Must contain `{message}`.
    pub not_understood: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            teach_commands: vec!["te quiero enseñar".to_string(), "nuevo".to_string()],
            ask_symptom: "Okay, escribe el síntoma.".to_string(),
            ask_response: "Ahora escribe la respuesta.".to_string(),
            saved: "Tu información se guardó correctamente.".to_string(),
            not_understood:
                "No entiendo... '{message}'. Si quieres me lo puedes enseñar, diciendo nuevo."
                    .to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn with_threshold(mut self, confidence_threshold: f32) -> Self {
        self.confidence_threshold = confidence_threshold;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseResolver {
    config: ResolverConfig,
}

impl ResponseResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn is_teach_command(&self, message: &str) -> bool {
        let lowered = message.to_lowercase();
        self.config.teach_commands.iter().any(|c| *c == lowered)
    }

    /// Decide the reply for one message.
    ///
    /// Only the store append in the last teaching step can fail; the session
    /// is left untouched in that case.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        session: &mut TeachingSession,
        store: &mut IntentStore,
        prediction: &IntentResult,
        message: &str,
        rng: &mut R,
    ) -> Result<Reply, AppError> {
        match session {
            TeachingSession::AwaitingSymptom => {
                *session = TeachingSession::AwaitingResponse {
                    symptom: message.to_string(),
                };
                return Ok(Reply::new(&self.config.ask_response, ReplyKind::SymptomCaptured));
            }
            TeachingSession::AwaitingResponse { symptom } => {
                let tag = store.next_teaching_tag();
                store.append(
                    tag.clone(),
                    vec![symptom.clone()],
                    vec![message.to_string()],
                )?;
                info!("Taught new intent '{}'", tag);
                session.reset();
                return Ok(Reply::new(&self.config.saved, ReplyKind::Taught { tag }));
            }
            TeachingSession::Idle => {}
        }

        if prediction.confidence >= self.config.confidence_threshold {
            if let Some(record) = store.find_by_tag(&prediction.tag) {
                if let Some(text) = record.responses.choose(rng) {
                    return Ok(Reply::new(
                        text.clone(),
                        ReplyKind::Classified {
                            tag: record.tag.clone(),
                        },
                    ));
                }
                warn!("Intent '{}' has no responses", record.tag);
            } else {
                warn!(
                    "Predicted tag '{}' ({:.2}) is not in the intent store; class list and store are out of sync",
                    prediction.tag, prediction.confidence
                );
            }
        } else if self.is_teach_command(message) {
            *session = TeachingSession::AwaitingSymptom;
            return Ok(Reply::new(&self.config.ask_symptom, ReplyKind::TeachStarted));
        }

        if let Some(record) = store.find_by_exact_pattern(message) {
            if let Some(text) = record.responses.choose(rng) {
                return Ok(Reply::new(
                    text.clone(),
                    ReplyKind::PatternMatch {
                        tag: record.tag.clone(),
                    },
                ));
            }
        }

        Ok(Reply::new(
            self.config.not_understood.replace(MESSAGE_PLACEHOLDER, message),
            ReplyKind::NotUnderstood,
        ))
    }
}
