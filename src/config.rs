use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::TisError;

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Exported model graph used by the runtime backend.
    pub model_path: String,
    pub device: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            device: "cpu".to_string(),
        }
    }
}

/// Settings for the persisted transcript store used in structured mode.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub store_path: PathBuf,
    #[serde(default)]
    pub train: Vec<String>,
    #[serde(default)]
    pub val: Vec<String>,
    #[serde(default)]
    pub test: Vec<String>,
    /// Upper bound on `transcripts * padded_length` tokens per batch.
    #[serde(default = "default_max_memory")]
    pub max_memory: usize,
    #[serde(default = "default_max_transcripts_per_batch")]
    pub max_transcripts_per_batch: usize,
    /// Encoding threads; `0` lets rayon decide.
    #[serde(default)]
    pub num_workers: usize,
}

fn default_max_memory() -> usize {
    DatasetConfig::DEFAULT_MAX_MEMORY
}
fn default_max_transcripts_per_batch() -> usize {
    DatasetConfig::DEFAULT_MAX_TRANSCRIPTS_PER_BATCH
}

impl DatasetConfig {
    pub const DEFAULT_MAX_MEMORY: usize = 24_000;
    pub const DEFAULT_MAX_TRANSCRIPTS_PER_BATCH: usize = 2_000;

    pub fn from_json(path: &Path) -> Result<Self, TisError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| TisError::io("read dataset config", e))?;
        let mut config: Self =
            serde_json::from_str(&data).map_err(|e| TisError::json("parse dataset config", e))?;
        if config.store_path.is_relative() {
            if let Some(parent) = path.parent() {
                config.store_path = parent.join(&config.store_path);
            }
        }
        Ok(config)
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::new(),
            train: Vec::new(),
            val: Vec::new(),
            test: Vec::new(),
            max_memory: Self::DEFAULT_MAX_MEMORY,
            max_transcripts_per_batch: Self::DEFAULT_MAX_TRANSCRIPTS_PER_BATCH,
            num_workers: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum InputMode {
    Dataset(DatasetConfig),
    /// A single raw RNA/DNA string.
    Sequence(String),
    Fasta(PathBuf),
}

#[derive(Debug, Clone)]
pub struct PredictConfig {
    pub input: InputMode,
    pub model: ModelConfig,
    pub max_seq_len: usize,
    pub min_prob: f32,
    /// Artifacts are written to `<out_prefix>.csv` and `<out_prefix>.npy.json`.
    pub out_prefix: PathBuf,
}

impl PredictConfig {
    pub const DEFAULT_MAX_SEQ_LEN: usize = 30_000;
    pub const DEFAULT_MIN_PROB: f32 = 0.01;

    pub fn new(input: InputMode, out_prefix: impl Into<PathBuf>) -> Self {
        Self {
            input,
            model: ModelConfig::default(),
            max_seq_len: Self::DEFAULT_MAX_SEQ_LEN,
            min_prob: Self::DEFAULT_MIN_PROB,
            out_prefix: out_prefix.into(),
        }
    }

    pub fn validate(&self) -> Result<(), TisError> {
        if !(0.0..1.0).contains(&self.min_prob) {
            return Err(TisError::invalid_input(format!(
                "min_prob must lie in [0, 1), got {}",
                self.min_prob
            )));
        }
        if self.max_seq_len == 0 {
            return Err(TisError::invalid_input("max_seq_len must be > 0"));
        }
        if self.out_prefix.as_os_str().is_empty() {
            return Err(TisError::invalid_input("output prefix must not be empty"));
        }
        Ok(())
    }

    pub fn table_path(&self) -> PathBuf {
        with_suffix(&self.out_prefix, ".csv")
    }

    pub fn raw_path(&self) -> PathBuf {
        with_suffix(&self.out_prefix, ".npy.json")
    }
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}
