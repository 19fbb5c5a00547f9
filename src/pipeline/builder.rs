use crate::config::ModelConfig;
use crate::error::TisError;
use crate::pipeline::model_runtime::build_runtime_backend;
use crate::pipeline::runtime::Predictor;
use crate::pipeline::traits::RuntimeBackend;

pub struct PredictorBuilder {
    config: ModelConfig,
    runtime_backend: Option<Box<dyn RuntimeBackend>>,
}

impl PredictorBuilder {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            runtime_backend: None,
        }
    }

    /// Uses an already loaded model instead of loading `config.model_path`.
    pub fn with_runtime_backend(mut self, runtime_backend: Box<dyn RuntimeBackend>) -> Self {
        self.runtime_backend = Some(runtime_backend);
        self
    }

    pub fn build(self) -> Result<Predictor, TisError> {
        let runtime_backend = if let Some(runtime_backend) = self.runtime_backend {
            runtime_backend
        } else {
            build_runtime_backend(&self.config)?
        };

        tracing::info!(device = %runtime_backend.device_label(), "TIS predictor ready");
        Ok(Predictor::new(runtime_backend))
    }
}
