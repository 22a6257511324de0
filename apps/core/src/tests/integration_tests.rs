//! Integration Tests
//!
//! Full startup from artifacts on disk: preflight, engine loading, teaching
//! that survives a restart, and feature extraction matching inference.

use super::fixtures;
use crate::actors::ChatbotHandle;
use crate::brain::{build_vocabulary, training_rows, ChatEngine, TeachingSession, TextNormalizer};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::preflight::run_preflight_checks;
use crate::store::IntentStore;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tokio::time::Duration;

fn config_for(dir: &Path) -> AppConfig {
    AppConfig {
        data_dir: dir.to_path_buf(),
        ..AppConfig::default()
    }
}

#[cfg(test)]
mod startup_tests {
    use super::*;

    #[test]
    fn test_engine_loads_from_artifacts() {
        let dir = tempdir().unwrap();
        let paths = fixtures::write_artifacts(dir.path());

        let report = run_preflight_checks(&paths);
        assert!(report.ready_to_start, "{}", report.summary);

        let engine = ChatEngine::from_config(&config_for(dir.path())).unwrap();
        assert_eq!(engine.classes().tags(), &fixtures::CLASSES);
        assert_eq!(engine.store().len(), fixtures::records().len());
        assert!(engine.unknown_classes().is_empty());
        assert!(engine.audit_log().is_some());
    }

    #[test]
    fn test_engine_rejects_vocabulary_model_mismatch() {
        let dir = tempdir().unwrap();
        let paths = fixtures::write_artifacts(dir.path());
        fs::write(paths.vocabulary_path(), r#"["chao", "hola"]"#).unwrap();

        let result = ChatEngine::from_config(&config_for(dir.path()));
        assert!(matches!(result, Err(AppError::Model(_))));
    }

    #[test]
    fn test_lemma_table_is_applied() {
        let dir = tempdir().unwrap();
        fixtures::write_artifacts(dir.path());
        let table = dir.path().join("lemmas.json");
        fs::write(&table, r#"{"buenas": "hola"}"#).unwrap();

        let config = AppConfig {
            lemma_table: Some(table),
            ..config_for(dir.path())
        };
        let engine = ChatEngine::from_config(&config).unwrap();
        assert_eq!(engine.predict("Buenas").unwrap().tag, "saludo");
    }

    #[test]
    fn test_threshold_from_config() {
        let dir = tempdir().unwrap();
        fixtures::write_artifacts(dir.path());

        // Uniform 1/3 predictions now clear the bar
        let config = AppConfig {
            confidence_threshold: 0.3,
            ..config_for(dir.path())
        };
        let mut engine = ChatEngine::from_config(&config).unwrap();
        let reply = engine
            .respond(&mut TeachingSession::new(), "algo raro")
            .unwrap();
        assert_eq!(reply, "¡Hasta luego!");
    }
}

#[cfg(test)]
mod persistence_tests {
    use super::*;

    #[tokio::test]
    async fn test_taught_intent_survives_restart() {
        let dir = tempdir().unwrap();
        let paths = fixtures::write_artifacts(dir.path());
        let config = config_for(dir.path());

        let chatbot = ChatbotHandle::new(
            ChatEngine::from_config(&config).unwrap(),
            Duration::from_secs(5),
        );
        for message in ["nuevo", "me arde la garganta", "Haz gárgaras con agua tibia."] {
            chatbot
                .process_message("s1".into(), message.into())
                .await
                .unwrap();
        }
        chatbot.shutdown().await.unwrap();

        let store = IntentStore::load(paths.intents_path()).unwrap();
        let taught = store.records().last().unwrap();
        assert_eq!(taught.tag, "new_symptom_5");
        assert_eq!(taught.patterns, vec!["me arde la garganta".to_string()]);

        // A fresh engine answers the taught pattern through the fallback
        let mut engine = ChatEngine::from_config(&config).unwrap();
        let reply = engine
            .respond(&mut TeachingSession::new(), "Me arde la garganta")
            .unwrap();
        assert_eq!(reply, "Haz gárgaras con agua tibia.");

        let log = fs::read_to_string(paths.interaction_log_path()).unwrap();
        assert_eq!(log.lines().count(), 4);
        assert!(log
            .lines()
            .last()
            .unwrap()
            .starts_with("Usuario: Me arde la garganta - Bot:"));
    }
}

#[cfg(test)]
mod feature_tests {
    use super::*;

    #[test]
    fn test_training_features_match_inference() {
        let normalizer = TextNormalizer::default();
        let store = IntentStore::in_memory(fixtures::records()).unwrap();

        let (vocabulary, classes) = build_vocabulary(&store, &normalizer).unwrap();
        assert_eq!(
            classes.tags(),
            &["despedida", "fiebre", "saludo", "extra"]
        );
        assert!(vocabulary.words().contains(&"hello".to_string()));

        let rows = training_rows(&store, &normalizer, &vocabulary, &classes).unwrap();
        assert_eq!(rows.len(), 5);

        // "Hello" in the store and "HELLO" typed by a user share a feature vector
        let typed = vocabulary.vectorize(&normalizer.normalize("HELLO"));
        assert_eq!(rows[3].bag, typed);
        assert_eq!(rows[3].label, vec![0.0, 0.0, 1.0, 0.0]);
    }
}
