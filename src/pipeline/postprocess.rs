use candle_core::{DType, Tensor, D};

use crate::error::TisError;
use crate::pipeline::collate::CollatedBatch;
use crate::sequence::framing::VALID_MASK;

/// Converts backend scores into per-position TIS probabilities `[B, L]`.
/// Rank-2 scores go through a sigmoid; rank-3 scores through a softmax over
/// classes, keeping class 1.
pub fn positive_class_probabilities(
    logits: &Tensor,
    batch: &CollatedBatch,
) -> Result<Tensor, TisError> {
    let (b, l) = (batch.batch_size(), batch.width());
    let logits = logits
        .to_dtype(DType::F32)
        .map_err(|e| TisError::runtime("logits dtype", e))?;

    match *logits.dims() {
        [lb, ll] if (lb, ll) == (b, l) => candle_nn::ops::sigmoid(&logits)
            .map_err(|e| TisError::runtime("sigmoid", e)),
        [lb, ll, classes] if (lb, ll) == (b, l) && classes >= 2 => {
            candle_nn::ops::softmax(&logits, D::Minus1)
                .and_then(|p| p.narrow(2, 1, 1))
                .and_then(|p| p.squeeze(2))
                .map_err(|e| TisError::runtime("softmax", e))
        }
        _ => Err(TisError::runtime(
            "model output shape",
            format!(
                "expected [{b}, {l}] or [{b}, {l}, C>=2], got {:?}",
                logits.dims()
            ),
        )),
    }
}

/// Drops sentinel and padding positions, leaving one probability per nucleotide.
pub fn unpad_probabilities(
    probabilities: &Tensor,
    batch: &CollatedBatch,
) -> Result<Vec<Vec<f32>>, TisError> {
    let rows = probabilities
        .to_vec2::<f32>()
        .map_err(|e| TisError::runtime("read probabilities", e))?;
    let mask = batch
        .mask
        .to_vec2::<i64>()
        .map_err(|e| TisError::runtime("read mask", e))?;

    rows.into_iter()
        .zip(mask)
        .zip(&batch.lengths)
        .map(|((row, mask_row), &expected)| {
            let kept: Vec<f32> = row
                .into_iter()
                .zip(mask_row)
                .filter(|&(_, m)| m == VALID_MASK)
                .map(|(p, _)| p)
                .collect();
            if kept.len() != expected {
                return Err(TisError::runtime(
                    "unpad probabilities",
                    format!("expected {expected} positions, got {}", kept.len()),
                ));
            }
            Ok(kept)
        })
        .collect()
}
