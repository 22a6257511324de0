//! Intent store: the ordered, append-only registry of intents.
//!
//! The whole document is rewritten on every append. Writes go to a sibling
//! temporary file which is then renamed over the store, so a failed write
//! leaves the previous document intact.

use crate::error::AppError;
use crate::models::{IntentRecord, IntentsDocument};
use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Prefix of tags synthesized by teaching mode.
pub const TEACHING_TAG_PREFIX: &str = "new_symptom_";

#[derive(Debug, Clone)]
pub struct IntentStore {
    /// Backing file; `None` keeps the store in memory only.
    path: Option<PathBuf>,
    records: Vec<IntentRecord>,
}

impl IntentStore {
    /// Loads the store document from disk.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let raw = fs::read_to_string(&path)?;
        let document: IntentsDocument = serde_json::from_str(&raw)?;
        ensure_unique_tags(&document.intents)?;
        info!(
            "Loaded {} intents from {:?}",
            document.intents.len(),
            path
        );
        Ok(Self {
            path: Some(path),
            records: document.intents,
        })
    }

    /// A store that is never written to disk.
    pub fn in_memory(records: Vec<IntentRecord>) -> Result<Self, AppError> {
        ensure_unique_tags(&records)?;
        Ok(Self {
            path: None,
            records,
        })
    }

    /// A new store that persists to `path`, starting from `records`.
    pub fn create(path: impl Into<PathBuf>, records: Vec<IntentRecord>) -> Result<Self, AppError> {
        ensure_unique_tags(&records)?;
        let store = Self {
            path: Some(path.into()),
            records,
        };
        store.persist()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[IntentRecord] {
        &self.records
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.tag.as_str())
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&IntentRecord> {
        self.records.iter().find(|r| r.tag == tag)
    }

    /// Case-insensitive literal match of `message` against every pattern,
    /// scanning records in store order. No tokenization or lemmatization.
    pub fn find_by_exact_pattern(&self, message: &str) -> Option<&IntentRecord> {
        let needle = message.to_lowercase();
        self.records.iter().find(|record| {
            record
                .patterns
                .iter()
                .any(|pattern| pattern.to_lowercase() == needle)
        })
    }

    /// Tag for the next taught intent: `new_symptom_{len + 1}`, bumped until unused.
    pub fn next_teaching_tag(&self) -> String {
        let mut n = self.records.len() + 1;
        loop {
            let candidate = format!("{}{}", TEACHING_TAG_PREFIX, n);
            if self.find_by_tag(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Appends a record and persists the store before returning.
    ///
    /// If persisting fails the record is removed again and the error returned.
    pub fn append(
        &mut self,
        tag: impl Into<String>,
        patterns: Vec<String>,
        responses: Vec<String>,
    ) -> Result<&IntentRecord, AppError> {
        let record = IntentRecord::new(tag, patterns, responses);
        if record.tag.trim().is_empty() {
            return Err(AppError::Store("intent tag must not be empty".to_string()));
        }
        if self.find_by_tag(&record.tag).is_some() {
            return Err(AppError::Store(format!(
                "intent tag '{}' already exists",
                record.tag
            )));
        }

        self.records.push(record);
        if let Err(e) = self.persist() {
            self.records.pop();
            error!("Failed to persist intent store: {}", e);
            return Err(e);
        }

        let appended = &self.records[self.records.len() - 1];
        info!("Appended intent '{}' ({} total)", appended.tag, self.records.len());
        Ok(appended)
    }

    /// Serializes the full document to a temp file and renames it into place.
    fn persist(&self) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let tmp_path = temp_path_for(path);
        let result = write_document(&tmp_path, &self.records).and_then(|_| {
            fs::rename(&tmp_path, path)?;
            Ok(())
        });
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }
}

fn write_document(path: &Path, records: &[IntentRecord]) -> Result<(), AppError> {
    #[derive(serde::Serialize)]
    struct DocumentRef<'a> {
        intents: &'a [IntentRecord],
    }

    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &DocumentRef { intents: records })?;
    writer.write_all(b"\n")?;
    let file = writer.into_inner().map_err(|e| AppError::Io(e.into_error()))?;
    file.sync_all()?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "intents.json".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}

fn ensure_unique_tags(records: &[IntentRecord]) -> Result<(), AppError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.tag.as_str()) {
            return Err(AppError::Store(format!(
                "duplicate intent tag '{}'",
                record.tag
            )));
        }
    }
    Ok(())
}
