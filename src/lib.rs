pub mod annotation;
pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod sequence;
pub mod types;

pub use annotation::ArtifactSummary;
pub use config::{DatasetConfig, InputMode, ModelConfig, PredictConfig};
pub use dataset::TranscriptDataset;
pub use error::TisError;
pub use pipeline::builder::PredictorBuilder;
pub use pipeline::collate::CollatedBatch;
pub use pipeline::input::{InputSource, SequenceBatches};
pub use pipeline::runtime::Predictor;
pub use pipeline::traits::{BatchSource, RuntimeBackend};
pub use types::{CandidateSite, InferenceOutput, ResultRecord, TranscriptBatch};
