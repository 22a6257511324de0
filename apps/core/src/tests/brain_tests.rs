//! Brain Module Tests
//!
//! End-to-end behavior of the chat engine: classification, the exact-pattern
//! fallback, the "don't understand" reply and the teaching dialogue.

use super::fixtures::{self, CLASSES, FEVER_REPLY, GREETINGS};
use crate::brain::{ReplyKind, TeachingSession};
use crate::error::AppError;
use crate::models::IntentRecord;
use crate::store::IntentStore;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn not_understood(message: &str) -> String {
    format!(
        "No entiendo... '{}'. Si quieres me lo puedes enseñar, diciendo nuevo.",
        message
    )
}

#[cfg(test)]
mod classification_tests {
    use super::*;

    #[test]
    fn test_known_word_is_classified_with_high_confidence() {
        let engine = fixtures::engine();

        let result = engine.predict("hola").unwrap();
        assert_eq!(result.tag, "saludo");
        assert!(result.confidence > 0.99);

        let result = engine.predict("Tengo FIEBRE!").unwrap();
        assert_eq!(result.tag, "fiebre");
    }

    #[test]
    fn test_confidence_in_range_and_tag_in_class_list() {
        let engine = fixtures::engine();

        let messages = vec![
            "",
            "hola",
            "chao chao",
            "hola fiebre",
            "¿?¡!",
            "algo completamente distinto",
            "HOLA, tengo fiebre, chao",
        ];

        for message in messages {
            let result = engine.predict(message).unwrap();
            assert!(
                (0.0..=1.0).contains(&result.confidence),
                "confidence out of range for '{}': {}",
                message,
                result.confidence
            );
            assert!(
                CLASSES.contains(&result.tag.as_str()),
                "unexpected tag '{}' for '{}'",
                result.tag,
                message
            );
        }
    }

    #[test]
    fn test_no_known_words_is_uniform_and_first_class_wins() {
        let engine = fixtures::engine();

        let result = engine.predict("nada conocido").unwrap();
        assert_eq!(result.tag, "despedida");
        assert!((result.confidence - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_high_confidence_reply_comes_from_tag_responses() {
        let mut engine = fixtures::engine();
        let mut session = TeachingSession::new();

        for _ in 0..10 {
            let reply = engine.respond(&mut session, "hola").unwrap();
            assert!(GREETINGS.contains(&reply.as_str()), "got '{}'", reply);
        }

        let reply = engine.respond(&mut session, "tengo fiebre").unwrap();
        assert_eq!(reply, FEVER_REPLY);
        assert_eq!(session, TeachingSession::Idle);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = fixtures::engine();
        let mut b = fixtures::engine();
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        for _ in 0..5 {
            let reply_a = a
                .respond_with_rng(&mut TeachingSession::new(), "hola", &mut rng_a)
                .unwrap();
            let reply_b = b
                .respond_with_rng(&mut TeachingSession::new(), "hola", &mut rng_b)
                .unwrap();
            assert_eq!(reply_a, reply_b);
        }
    }
}

#[cfg(test)]
mod fallback_tests {
    use super::*;

    #[test]
    fn test_exact_pattern_fallback_is_case_insensitive() {
        let mut engine = fixtures::engine();
        let mut session = TeachingSession::new();

        // "hello" is not in the vocabulary, so the model is unsure
        assert!(engine.predict("HELLO").unwrap().confidence < 0.7);

        let reply = engine
            .respond_with_rng(&mut session, "HELLO", &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(
            reply.kind,
            ReplyKind::PatternMatch {
                tag: "saludo".into()
            }
        );
        assert!(GREETINGS.contains(&reply.text.as_str()));
    }

    #[test]
    fn test_fallback_reaches_intents_outside_class_list() {
        let mut engine = fixtures::engine();
        let mut session = TeachingSession::new();

        let reply = engine.respond(&mut session, "Me duele la panza").unwrap();
        assert_eq!(reply, "Puede ser indigestión.");
    }

    #[test]
    fn test_not_understood_embeds_message() {
        let mut engine = fixtures::engine();
        let mut session = TeachingSession::new();

        let reply = engine.respond(&mut session, "¿Qué es esto?").unwrap();
        assert_eq!(reply, not_understood("¿Qué es esto?"));
    }

    #[test]
    fn test_empty_message() {
        let mut engine = fixtures::engine();
        let mut session = TeachingSession::new();

        let reply = engine.respond(&mut session, "").unwrap();
        assert_eq!(reply, not_understood(""));
        assert_eq!(session, TeachingSession::Idle);
    }

    #[test]
    fn test_predicted_tag_missing_from_store_falls_through() {
        // Store without "despedida" although the model can predict it
        let store = IntentStore::in_memory(
            fixtures::records()
                .into_iter()
                .filter(|r| r.tag != "despedida")
                .collect(),
        )
        .unwrap();
        let mut engine = fixtures::engine_with_store(store);
        let mut session = TeachingSession::new();

        assert_eq!(engine.unknown_classes(), vec!["despedida".to_string()]);

        let prediction = engine.predict("chao").unwrap();
        assert_eq!(prediction.tag, "despedida");
        assert!(prediction.confidence > 0.99);

        let reply = engine.respond(&mut session, "chao").unwrap();
        assert_eq!(reply, not_understood("chao"));
    }

    #[test]
    fn test_intent_without_responses_falls_through() {
        let mut records = fixtures::records();
        records[1] = IntentRecord::new("fiebre", vec!["tengo fiebre".into()], vec![]);
        let mut engine =
            fixtures::engine_with_store(IntentStore::in_memory(records).unwrap());
        let mut session = TeachingSession::new();

        let reply = engine.respond(&mut session, "fiebre").unwrap();
        assert_eq!(reply, not_understood("fiebre"));
    }
}

#[cfg(test)]
mod teaching_tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_teaching_round_trip() {
        let mut engine = fixtures::engine();
        let mut session = TeachingSession::new();
        let before = engine.store().len();

        assert_eq!(
            engine.respond(&mut session, "nuevo").unwrap(),
            "Okay, escribe el síntoma."
        );
        assert_eq!(session, TeachingSession::AwaitingSymptom);

        assert_eq!(
            engine.respond(&mut session, "fever").unwrap(),
            "Ahora escribe la respuesta."
        );
        assert_eq!(session.pending_symptom(), Some("fever"));

        assert_eq!(
            engine.respond(&mut session, "take rest").unwrap(),
            "Tu información se guardó correctamente."
        );
        assert_eq!(session, TeachingSession::Idle);

        let store = engine.store();
        assert_eq!(store.len(), before + 1);
        let taught = &store.records()[before];
        assert_eq!(taught.tag, format!("new_symptom_{}", before + 1));
        assert_eq!(taught.patterns, vec!["fever".to_string()]);
        assert_eq!(taught.responses, vec!["take rest".to_string()]);

        // The taught pattern is reachable through the exact fallback
        assert_eq!(engine.respond(&mut session, "FEVER").unwrap(), "take rest");
    }

    #[test]
    fn test_teaching_state_wins_over_classification() {
        let mut engine = fixtures::engine();
        let mut session = TeachingSession::new();

        engine.respond(&mut session, "te quiero enseñar").unwrap();

        // "hola" is a confident greeting but is captured as the symptom
        let reply = engine.respond(&mut session, "hola").unwrap();
        assert_eq!(reply, "Ahora escribe la respuesta.");

        let reply = engine.respond(&mut session, "nuevo").unwrap();
        assert_eq!(reply, "Tu información se guardó correctamente.");
        let taught = engine.store().records().last().unwrap();
        assert_eq!(taught.patterns, vec!["hola".to_string()]);
        assert_eq!(taught.responses, vec!["nuevo".to_string()]);
    }

    #[test]
    fn test_teach_command_needs_exact_text() {
        let mut engine = fixtures::engine();
        let mut session = TeachingSession::new();

        let reply = engine.respond(&mut session, "nuevo síntoma").unwrap();
        assert_eq!(reply, not_understood("nuevo síntoma"));
        assert_eq!(session, TeachingSession::Idle);
    }

    #[test]
    fn test_taught_intent_is_persisted() {
        let dir = tempdir().unwrap();
        let mut engine = fixtures::persisted_engine(dir.path());
        let mut session = TeachingSession::new();

        for message in ["nuevo", "dolor de oído", "Consulta a un médico."] {
            engine.respond(&mut session, message).unwrap();
        }

        let reloaded = IntentStore::load(dir.path().join("intents.json")).unwrap();
        assert_eq!(reloaded.records(), engine.store().records());
        let raw = fs::read_to_string(dir.path().join("intents.json")).unwrap();
        assert!(raw.contains("dolor de oído"));
    }

    #[test]
    fn test_failed_write_keeps_session_awaiting_response() {
        let dir = tempdir().unwrap();
        let store_dir = dir.path().join("store");
        fs::create_dir(&store_dir).unwrap();
        let mut engine = fixtures::persisted_engine(&store_dir);
        let mut session = TeachingSession::new();

        engine.respond(&mut session, "nuevo").unwrap();
        engine.respond(&mut session, "fever").unwrap();

        fs::remove_dir_all(&store_dir).unwrap();
        let before = engine.store().len();

        let result = engine.respond(&mut session, "take rest");
        assert!(matches!(result, Err(AppError::Io(_))));
        assert_eq!(
            session,
            TeachingSession::AwaitingResponse {
                symptom: "fever".into()
            }
        );
        assert_eq!(engine.store().len(), before);

        // Once the directory is back the same answer completes the lesson
        fs::create_dir(&store_dir).unwrap();
        assert_eq!(
            engine.respond(&mut session, "take rest").unwrap(),
            "Tu información se guardó correctamente."
        );
        assert_eq!(engine.store().len(), before + 1);
    }
}
