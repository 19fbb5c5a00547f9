use crate::annotation::{annotate, ArtifactSummary};
use crate::config::PredictConfig;
use crate::error::TisError;
use crate::pipeline::collate::collate;
use crate::pipeline::input::InputSource;
use crate::pipeline::postprocess::{positive_class_probabilities, unpad_probabilities};
use crate::pipeline::traits::{BatchSource, RuntimeBackend};
use crate::sequence::alphabet::decode;
use crate::types::InferenceOutput;

pub struct Predictor {
    backend: Box<dyn RuntimeBackend>,
}

impl Predictor {
    pub(crate) fn new(backend: Box<dyn RuntimeBackend>) -> Self {
        Self { backend }
    }

    pub fn device_label(&self) -> String {
        self.backend.device_label()
    }

    pub fn infer(&self, source: &dyn BatchSource) -> Result<InferenceOutput, TisError> {
        self.infer_with_progress(source, |_| {})
    }

    /// Runs every batch of `source` through the model, calling `on_batch`
    /// with the number of finished batches. Outputs keep batch order.
    pub fn infer_with_progress(
        &self,
        source: &dyn BatchSource,
        mut on_batch: impl FnMut(usize),
    ) -> Result<InferenceOutput, TisError> {
        let mut output = InferenceOutput {
            targets: source.has_targets().then(Vec::new),
            ..InferenceOutput::default()
        };

        for index in 0..source.len() {
            let batch = source.batch(index)?;
            let collated = collate(&batch)?;
            let logits = self.backend.infer(&collated)?;
            let probabilities = positive_class_probabilities(&logits, &collated)?;
            let predictions = unpad_probabilities(&probabilities, &collated)?;

            tracing::debug!(
                batch = index,
                transcripts = batch.len(),
                width = collated.width(),
                "batch inferred"
            );

            for encoded in &batch.encoded {
                output.sequences.push(decode(encoded)?);
            }
            if let Some(targets) = output.targets.as_mut() {
                let batch_targets = batch.targets.ok_or_else(|| {
                    TisError::invalid_input(format!("batch {index} is missing targets"))
                })?;
                targets.extend(batch_targets);
            }
            output.ids.extend(batch.ids);
            output.predictions.extend(predictions);
            on_batch(index + 1);
        }

        tracing::info!(
            transcripts = output.len(),
            batches = source.len(),
            "inference finished"
        );
        Ok(output)
    }

    /// Loads the configured input, predicts and writes the artifacts.
    pub fn run(&self, config: &PredictConfig) -> Result<ArtifactSummary, TisError> {
        config.validate()?;
        let source = InputSource::from_config(config)?;
        self.run_with_source(&source, config, |_| {})
    }

    pub fn run_with_source(
        &self,
        source: &dyn BatchSource,
        config: &PredictConfig,
        on_batch: impl FnMut(usize),
    ) -> Result<ArtifactSummary, TisError> {
        let output = self.infer_with_progress(source, on_batch)?;
        annotate(
            &output,
            config.min_prob,
            &config.table_path(),
            &config.raw_path(),
        )
    }
}
