use candle_core::Tensor;

use crate::error::TisError;
use crate::pipeline::collate::CollatedBatch;
use crate::types::TranscriptBatch;

/// A loaded sequence model.
pub trait RuntimeBackend: Send + Sync {
    /// Returns raw scores for every framed position of the batch, shaped
    /// `[B, L]` (one logit per position) or `[B, L, C]` with class 1 = TIS.
    fn infer(&self, batch: &CollatedBatch) -> Result<Tensor, TisError>;

    fn device_label(&self) -> String;
}

/// Ordered, indexable producer of transcript batches.
pub trait BatchSource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn batch(&self, index: usize) -> Result<TranscriptBatch, TisError>;

    /// Whether every batch carries ground-truth targets.
    fn has_targets(&self) -> bool;
}
