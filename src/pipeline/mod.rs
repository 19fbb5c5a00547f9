pub mod builder;
pub mod collate;
pub mod input;
pub(crate) mod model_runtime;
pub mod postprocess;
pub mod runtime;
pub mod traits;
