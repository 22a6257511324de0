use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const INTENTS_FILENAME: &str = "intents.json";
const VOCABULARY_FILENAME: &str = "words.json";
const CLASSES_FILENAME: &str = "classes.json";
const MODEL_FILENAME: &str = "model.json";
const INTERACTION_LOG_FILENAME: &str = "interaction_log.txt";
const SURVEY_LOG_FILENAME: &str = "survey_log.txt";

/// Resolves every artifact path from a single data directory.
#[derive(Debug, Clone)]
pub struct PortablePathManager {
    data_dir: PathBuf,
}

impl PortablePathManager {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Default data directory: `./data` next to the executable.
    ///
    /// In debug builds the executable lives in `target/debug`, so we walk back
    /// to the workspace root and prefer `apps/core/data` when it exists.
    pub fn default_data_dir() -> PathBuf {
        match std::env::current_exe() {
            Ok(mut path) => {
                path.pop(); // remove exe name
                #[cfg(debug_assertions)]
                {
                    let mut workspace = path.clone();
                    workspace.pop(); // remove debug
                    workspace.pop(); // remove target
                    let core_data = workspace.join("apps").join("core").join("data");
                    if core_data.exists() {
                        return core_data;
                    }
                }
                path.join("data")
            }
            Err(e) => {
                warn!(
                    "Failed to get current exe path: {}. Falling back to ./data.",
                    e
                );
                PathBuf::from("data")
            }
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Intent store document (./data/intents.json).
    pub fn intents_path(&self) -> PathBuf {
        self.data_dir.join(INTENTS_FILENAME)
    }

    /// Vocabulary produced by the trainer (./data/words.json).
    pub fn vocabulary_path(&self) -> PathBuf {
        self.data_dir.join(VOCABULARY_FILENAME)
    }

    /// Class list produced by the trainer (./data/classes.json).
    pub fn classes_path(&self) -> PathBuf {
        self.data_dir.join(CLASSES_FILENAME)
    }

    /// Trained network (./data/model.json).
    pub fn model_path(&self) -> PathBuf {
        self.data_dir.join(MODEL_FILENAME)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn interaction_log_path(&self) -> PathBuf {
        self.logs_dir().join(INTERACTION_LOG_FILENAME)
    }

    pub fn survey_log_path(&self) -> PathBuf {
        self.logs_dir().join(SURVEY_LOG_FILENAME)
    }

    /// Creates the data and logs directories if they don't exist.
    pub fn init(&self) -> Result<(), std::io::Error> {
        for dir in [self.data_dir.clone(), self.logs_dir()] {
            if !dir.exists() {
                info!("Creating directory: {:?}", dir);
                fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}
