//! Chat Engine - Main orchestrator for the Brain module.
//!
//! Runs the full pipeline for one message:
//! 1. Normalize (tokenize, lowercase, lemmatize)
//! 2. Vectorize over the trained vocabulary
//! 3. Classify into (tag, confidence)
//! 4. Resolve the reply, possibly appending to the intent store

use rand::Rng;
use std::time::Instant;
use tracing::{error, info};

use super::intent::{IntentClassifier, IntentResult};
use super::model::DenseNetwork;
use super::normalizer::{Lemmatizer, TextNormalizer};
use super::resolver::{Reply, ResolverConfig, ResponseResolver, TeachingSession};
use super::vectorizer::{ClassList, Vocabulary};
use crate::audit_log::AuditLog;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::store::IntentStore;

pub struct ChatEngine {
    normalizer: TextNormalizer,
    vocabulary: Vocabulary,
    classifier: IntentClassifier,
    store: IntentStore,
    resolver: ResponseResolver,
    audit: Option<AuditLog>,
}

impl ChatEngine {
    /// Assembles an engine from already-loaded parts.
    ///
    /// Fails if the vocabulary does not match the model's input width.
    pub fn new(
        normalizer: TextNormalizer,
        vocabulary: Vocabulary,
        classifier: IntentClassifier,
        store: IntentStore,
        resolver: ResponseResolver,
    ) -> Result<Self, AppError> {
        if vocabulary.len() != classifier.input_dim() {
            return Err(AppError::Model(format!(
                "vocabulary has {} words but the model expects {} inputs",
                vocabulary.len(),
                classifier.input_dim()
            )));
        }
        Ok(Self {
            normalizer,
            vocabulary,
            classifier,
            store,
            resolver,
            audit: None,
        })
    }

    /// Loads every artifact named by the configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let paths = config.paths();

        let mut lemmatizer = Lemmatizer::new();
        if let Some(table) = &config.lemma_table {
            lemmatizer = lemmatizer.with_table_file(table)?;
        }

        let vocabulary = Vocabulary::load(&paths.vocabulary_path())?;
        let classes = ClassList::load(&paths.classes_path())?;
        let model = DenseNetwork::load(&paths.model_path())?;
        let classifier = IntentClassifier::new(Box::new(model), classes)?;
        let store = IntentStore::load(paths.intents_path())?;
        let resolver = ResponseResolver::new(
            ResolverConfig::default().with_threshold(config.confidence_threshold),
        );

        let engine = Self::new(
            TextNormalizer::new(lemmatizer),
            vocabulary,
            classifier,
            store,
            resolver,
        )?
        .with_audit_log(AuditLog::new(
            paths.interaction_log_path(),
            paths.survey_log_path(),
        ));

        info!(
            "Chat engine ready: {} words, {} classes, {} intents",
            engine.vocabulary.len(),
            engine.classifier.classes().len(),
            engine.store.len()
        );
        Ok(engine)
    }

    pub fn with_audit_log(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn store(&self) -> &IntentStore {
        &self.store
    }

    pub fn audit_log(&self) -> Option<&AuditLog> {
        self.audit.as_ref()
    }

    pub fn classes(&self) -> &ClassList {
        self.classifier.classes()
    }

    /// Classes the model can predict that have no record in the store.
    pub fn unknown_classes(&self) -> Vec<String> {
        self.classifier
            .classes()
            .tags()
            .iter()
            .filter(|tag| self.store.find_by_tag(tag).is_none())
            .cloned()
            .collect()
    }

    /// Normalize, vectorize and classify a message.
    pub fn predict(&self, message: &str) -> Result<IntentResult, AppError> {
        let tokens = self.normalizer.normalize(message);
        let bag = self.vocabulary.vectorize(&tokens);
        self.classifier.classify(&bag)
    }

    /// Full pipeline with the thread-local random source.
    pub fn respond(
        &mut self,
        session: &mut TeachingSession,
        message: &str,
    ) -> Result<String, AppError> {
        let reply = self.respond_with_rng(session, message, &mut rand::thread_rng())?;
        Ok(reply.text)
    }

    /// Full pipeline with an injected random source.
    pub fn respond_with_rng<R: Rng + ?Sized>(
        &mut self,
        session: &mut TeachingSession,
        message: &str,
        rng: &mut R,
    ) -> Result<Reply, AppError> {
        let start = Instant::now();

        let prediction = self.predict(message)?;
        let reply = self
            .resolver
            .resolve(session, &mut self.store, &prediction, message, rng)?;

        info!(
            "Predicted {} ({:.2}) -> {:?} in {}ms",
            prediction.tag,
            prediction.confidence,
            reply.kind,
            start.elapsed().as_millis()
        );

        if let Some(audit) = &self.audit {
            if let Err(e) = audit.record_interaction(message, &reply.text) {
                error!("Failed to write interaction log: {}", e);
            }
        }

        Ok(reply)
    }
}
