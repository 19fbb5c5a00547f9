#[cfg(feature = "onnx")]
use std::path::Path;

use crate::config::ModelConfig;
use crate::error::TisError;
use crate::pipeline::traits::RuntimeBackend;

/// Loads the model named by `config.model_path`.
pub(crate) fn build_runtime_backend(
    config: &ModelConfig,
) -> Result<Box<dyn RuntimeBackend>, TisError> {
    if config.model_path.is_empty() {
        return Err(TisError::invalid_input("no model path configured"));
    }
    build_onnx_runtime_backend(config)
}

fn build_onnx_runtime_backend(config: &ModelConfig) -> Result<Box<dyn RuntimeBackend>, TisError> {
    #[cfg(feature = "onnx")]
    {
        Ok(Box::new(OnnxRuntimeBackend::load(config)?))
    }

    #[cfg(not(feature = "onnx"))]
    {
        let _ = config;
        Err(TisError::runtime(
            "build runtime backend",
            "ONNX runtime support is disabled; enable the `onnx` cargo feature",
        ))
    }
}

#[cfg(feature = "onnx")]
struct OnnxRuntimeBackend {
    session: std::sync::Mutex<ort::session::Session>,
    device_label: String,
}

#[cfg(feature = "onnx")]
impl OnnxRuntimeBackend {
    fn load(config: &ModelConfig) -> Result<Self, TisError> {
        let execution_providers = onnx_execution_providers(config.device.as_str())?;
        let session = ort::session::Session::builder()
            .map_err(|e| TisError::runtime("onnx session builder", e))?
            .with_execution_providers(execution_providers)
            .map_err(|e| TisError::runtime("onnx execution providers", e))?
            .commit_from_file(Path::new(&config.model_path))
            .map_err(|e| TisError::runtime("onnx model load", e))?;

        tracing::info!(
            inputs = session.inputs().len(),
            outputs = session.outputs().len(),
            model_path = %config.model_path,
            device = %config.device,
            "TIS ONNX model loaded"
        );

        let device_label = parse_onnx_device(config.device.as_str())?;
        Ok(Self {
            session: std::sync::Mutex::new(session),
            device_label: device_label.to_string(),
        })
    }
}

#[cfg(feature = "onnx")]
impl RuntimeBackend for OnnxRuntimeBackend {
    fn infer(
        &self,
        batch: &crate::pipeline::collate::CollatedBatch,
    ) -> Result<candle_core::Tensor, TisError> {
        let (b, l) = batch
            .tokens
            .dims2()
            .map_err(|e| TisError::runtime("token tensor dims", e))?;
        let tokens: Vec<i64> = batch
            .tokens
            .flatten_all()
            .and_then(|t| t.to_vec1::<i64>())
            .map_err(|e| TisError::runtime("read token tensor", e))?;

        let input = ort::value::TensorRef::from_array_view(([b, l], tokens.as_slice()))
            .map_err(|e| TisError::runtime("onnx input tensor", e))?;
        let mut session = self
            .session
            .lock()
            .map_err(|_| TisError::runtime("onnx session lock", "session mutex poisoned"))?;
        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| TisError::runtime("onnx forward pass", e))?;
        if outputs.len() == 0 {
            return Err(TisError::runtime(
                "onnx forward pass",
                "model produced no outputs",
            ));
        }
        let (shape, logits) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| TisError::runtime("onnx extract logits", e))?;
        let dims = onnx_output_dims(&shape.iter().copied().collect::<Vec<i64>>())?;

        candle_core::Tensor::from_vec(logits.to_vec(), dims, &candle_core::Device::Cpu)
            .map_err(|e| TisError::runtime("logits tensor creation", e))
    }

    fn device_label(&self) -> String {
        self.device_label.clone()
    }
}

#[cfg(feature = "onnx")]
fn onnx_execution_providers(
    device: &str,
) -> Result<Vec<ort::ep::ExecutionProviderDispatch>, TisError> {
    match parse_onnx_device(device)? {
        "cpu" => Ok(vec![ort::ep::CPU::default().build()]),
        "cuda" => Ok(vec![
            ort::ep::CUDA::default()
                .with_device_id(0)
                .build()
                .error_on_failure(),
            ort::ep::CPU::default().build(),
        ]),
        _ => Err(TisError::invalid_input(format!(
            "unsupported ONNX device '{device}', expected 'cpu' or 'cuda'"
        ))),
    }
}

#[cfg(feature = "onnx")]
fn parse_onnx_device(device: &str) -> Result<&'static str, TisError> {
    if device.eq_ignore_ascii_case("cpu") {
        Ok("cpu")
    } else if device.eq_ignore_ascii_case("cuda") {
        Ok("cuda")
    } else {
        Err(TisError::invalid_input(format!(
            "unsupported ONNX device '{device}', expected 'cpu' or 'cuda'"
        )))
    }
}

#[cfg(feature = "onnx")]
fn onnx_output_dims(dims: &[i64]) -> Result<Vec<usize>, TisError> {
    if !(2..=3).contains(&dims.len()) {
        return Err(TisError::invalid_input(format!(
            "unsupported ONNX logits rank {}; expected [B, L] or [B, L, C]",
            dims.len()
        )));
    }
    dims.iter()
        .map(|&d| {
            usize::try_from(d).map_err(|_| {
                TisError::invalid_input(format!("ONNX output dimension must be >= 0, got {d}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_path_is_rejected() {
        let err = match build_runtime_backend(&ModelConfig::default()) {
            Ok(_) => panic!("an empty model path cannot be loaded"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("no model path"));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn disabled_onnx_feature_is_reported() {
        let config = ModelConfig {
            model_path: "model.onnx".to_string(),
            ..ModelConfig::default()
        };
        let err = match build_runtime_backend(&config) {
            Ok(_) => panic!("backend requires the onnx feature"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("enable the `onnx` cargo feature"));
    }
}
