//! Preflight Check System
//!
//! Verifies every artifact the chatbot needs before it serves a single
//! message. A failed critical check means the process must not start.

use crate::brain::{ClassList, DenseNetwork, IntentModel, Vocabulary};
use crate::fs_manager::PortablePathManager;
use crate::store::IntentStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete preflight check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
    pub ready_to_start: bool,
    pub summary: String,
    pub checked_at: DateTime<Utc>,
}

/// Runs all checks against the artifacts under `paths`.
pub fn run_preflight_checks(paths: &PortablePathManager) -> PreflightReport {
    info!("Running preflight checks in {:?}", paths.data_dir());

    let mut checks = Vec::new();

    let store = match IntentStore::load(paths.intents_path()) {
        Ok(store) => {
            checks.push(CheckResult::pass(
                "intent_store",
                &format!("{} intents loaded", store.len()),
            ));
            Some(store)
        }
        Err(e) => {
            checks.push(CheckResult::fail(
                "intent_store",
                "Intent store could not be loaded",
                Some(e.to_string()),
            ));
            None
        }
    };

    let vocabulary = match Vocabulary::load(&paths.vocabulary_path()) {
        Ok(v) if v.is_empty() => {
            checks.push(CheckResult::fail("vocabulary", "Vocabulary is empty", None));
            None
        }
        Ok(v) => {
            checks.push(CheckResult::pass(
                "vocabulary",
                &format!("{} words", v.len()),
            ));
            Some(v)
        }
        Err(e) => {
            checks.push(CheckResult::fail(
                "vocabulary",
                "Vocabulary could not be loaded",
                Some(e.to_string()),
            ));
            None
        }
    };

    let classes = match ClassList::load(&paths.classes_path()) {
        Ok(c) if c.is_empty() => {
            checks.push(CheckResult::fail("class_list", "Class list is empty", None));
            None
        }
        Ok(c) => {
            checks.push(CheckResult::pass("class_list", &format!("{} classes", c.len())));
            Some(c)
        }
        Err(e) => {
            checks.push(CheckResult::fail(
                "class_list",
                "Class list could not be loaded",
                Some(e.to_string()),
            ));
            None
        }
    };

    let model = match DenseNetwork::load(&paths.model_path()) {
        Ok(m) => {
            checks.push(CheckResult::pass(
                "model",
                &format!("{} -> {}", m.input_dim(), m.output_dim()),
            ));
            Some(m)
        }
        Err(e) => {
            checks.push(CheckResult::fail(
                "model",
                "Model could not be loaded",
                Some(e.to_string()),
            ));
            None
        }
    };

    if let (Some(model), Some(vocabulary), Some(classes)) = (&model, &vocabulary, &classes) {
        checks.push(check_dimensions(model, vocabulary, classes));
    }

    if let (Some(store), Some(classes)) = (&store, &classes) {
        checks.push(check_store_covers_classes(store, classes));
    }

    let all_passed = checks.iter().all(|c| c.passed);
    let ready_to_start = checks
        .iter()
        .filter(|c| is_critical_check(&c.name))
        .all(|c| c.passed);

    let summary = if all_passed {
        "All checks passed. System ready.".to_string()
    } else {
        let failed: Vec<&str> = checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.name.as_str())
            .collect();
        format!("Failed checks: {}", failed.join(", "))
    };

    for check in &checks {
        if check.passed {
            info!("  [ok] {}: {}", check.name, check.message);
        } else {
            warn!(
                "  [FAIL] {}: {} {}",
                check.name,
                check.message,
                check.details.as_deref().unwrap_or("")
            );
        }
    }

    PreflightReport {
        all_passed,
        checks,
        ready_to_start,
        summary,
        checked_at: Utc::now(),
    }
}

fn check_dimensions(
    model: &DenseNetwork,
    vocabulary: &Vocabulary,
    classes: &ClassList,
) -> CheckResult {
    if model.input_dim() != vocabulary.len() {
        return CheckResult::fail(
            "dimensions",
            "Model input does not match vocabulary",
            Some(format!(
                "model expects {}, vocabulary has {}",
                model.input_dim(),
                vocabulary.len()
            )),
        );
    }
    if model.output_dim() != classes.len() {
        return CheckResult::fail(
            "dimensions",
            "Model output does not match class list",
            Some(format!(
                "model produces {}, class list has {}",
                model.output_dim(),
                classes.len()
            )),
        );
    }
    CheckResult::pass("dimensions", "Model matches vocabulary and class list")
}

/// Every predictable tag should have a record to answer from.
fn check_store_covers_classes(store: &IntentStore, classes: &ClassList) -> CheckResult {
    let missing: Vec<&str> = classes
        .tags()
        .iter()
        .map(String::as_str)
        .filter(|tag| store.find_by_tag(tag).is_none())
        .collect();

    if missing.is_empty() {
        CheckResult::pass("store_sync", "Every class has an intent record")
    } else {
        CheckResult::fail(
            "store_sync",
            "Classes without intent records",
            Some(missing.join(", ")),
        )
    }
}

/// Drift between class list and store is reported but does not block startup.
fn is_critical_check(name: &str) -> bool {
    name != "store_sync"
}
