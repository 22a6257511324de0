//! Audit Log Module
//!
//! Append-only text records kept next to the data directory:
//! - `interaction_log.txt`: one line per (user message, bot reply) pair
//! - `survey_log.txt`: one block per satisfaction survey
//!
//! Nothing in the decision pipeline reads these files back.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let log = AuditLog::new(paths.interaction_log_path(), paths.survey_log_path());
//! log.record_interaction("hola", "¡Hola!")?;
//! ```

use crate::error::AppError;
use crate::models::SurveyEntry;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use validator::Validate;

#[derive(Debug, Clone)]
pub struct AuditLog {
    interaction_path: PathBuf,
    survey_path: PathBuf,
}

impl AuditLog {
    pub fn new(interaction_path: impl Into<PathBuf>, survey_path: impl Into<PathBuf>) -> Self {
        Self {
            interaction_path: interaction_path.into(),
            survey_path: survey_path.into(),
        }
    }

    pub fn interaction_path(&self) -> &Path {
        &self.interaction_path
    }

    pub fn survey_path(&self) -> &Path {
        &self.survey_path
    }

    /// Appends `Usuario: {message} - Bot: {reply}`.
    ///
    /// Line breaks inside either text are flattened to spaces so that each
    /// interaction stays on a single line.
    pub fn record_interaction(&self, message: &str, reply: &str) -> Result<(), AppError> {
        let line = format!(
            "Usuario: {} - Bot: {}\n",
            single_line(message),
            single_line(reply)
        );
        append(&self.interaction_path, &line)
    }

    /// Validates and appends a survey block followed by a blank line.
    pub fn submit_survey(&self, entry: &SurveyEntry) -> Result<(), AppError> {
        entry.validate()?;
        let block = format!(
            "Nombre: {}\nSatisfacción: {}\nComentario: {}\n\n",
            single_line(&entry.full_name),
            entry.satisfaction,
            single_line(&entry.feedback)
        );
        append(&self.survey_path, &block)?;
        info!("Survey recorded for '{}'", entry.full_name);
        Ok(())
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

fn append(path: &Path, text: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}
