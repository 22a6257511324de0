//! # Brain Module
//!
//! Intent recognition and reply selection for the symptom chatbot.
//!
//! ## Components
//! - `normalizer`: Tokenization, lowercasing and lemmatization
//! - `vectorizer`: Bag-of-words vectors over the trained vocabulary
//! - `model`: Dense network exported by the trainer
//! - `intent`: Classifier turning model output into a tag and confidence
//! - `resolver`: Reply selection and the teaching dialogue
//! - `training`: Feature extraction shared with the trainer
//! - `engine`: Main orchestrator

pub mod engine;
pub mod intent;
pub mod model;
pub mod normalizer;
pub mod resolver;
pub mod training;
pub mod vectorizer;

// Re-export main types for convenience
pub use engine::ChatEngine;
pub use intent::{IntentClassifier, IntentResult};
pub use model::{Activation, DenseLayer, DenseNetwork, IntentModel};
pub use normalizer::{tokenize, Lemmatizer, TextNormalizer};
pub use resolver::{Reply, ReplyKind, ResolverConfig, ResponseResolver, TeachingSession};
pub use training::{build_vocabulary, training_rows, TrainingRow};
pub use vectorizer::{ClassList, Vocabulary};
