use std::iter;

use candle_core::{Device, Tensor};

use crate::error::TisError;
use crate::sequence::alphabet::PAD_SYMBOL;
use crate::sequence::framing::{frame, IGNORE_MASK};
use crate::types::TranscriptBatch;

/// Framed, right-padded batch ready for the model.
#[derive(Debug, Clone)]
pub struct CollatedBatch {
    /// Token ids, `I64 [B, L]`.
    pub tokens: Tensor,
    /// Validity mask aligned with `tokens`; sentinels and padding are `-1`.
    pub mask: Tensor,
    /// Nucleotide length of each transcript.
    pub lengths: Vec<usize>,
}

impl CollatedBatch {
    pub fn batch_size(&self) -> usize {
        self.lengths.len()
    }

    /// Padded framed length `L`.
    pub fn width(&self) -> usize {
        self.lengths.iter().max().map_or(0, |len| len + 2)
    }
}

pub fn collate(batch: &TranscriptBatch) -> Result<CollatedBatch, TisError> {
    if batch.is_empty() {
        return Err(TisError::invalid_input("cannot collate an empty batch"));
    }

    let framed: Vec<_> = batch.encoded.iter().map(|seq| frame(seq)).collect();
    let width = framed.iter().map(|f| f.len()).max().unwrap_or(0);

    let mut tokens = Vec::with_capacity(framed.len() * width);
    let mut mask = Vec::with_capacity(framed.len() * width);
    for f in &framed {
        let pad = width - f.len();
        tokens.extend(f.tokens.iter().map(|&t| i64::from(t)));
        tokens.extend(iter::repeat(i64::from(PAD_SYMBOL)).take(pad));
        mask.extend_from_slice(&f.mask);
        mask.extend(iter::repeat(IGNORE_MASK).take(pad));
    }

    let shape = (framed.len(), width);
    let tokens = Tensor::from_vec(tokens, shape, &Device::Cpu)
        .map_err(|e| TisError::runtime("token tensor creation", e))?;
    let mask = Tensor::from_vec(mask, shape, &Device::Cpu)
        .map_err(|e| TisError::runtime("mask tensor creation", e))?;

    tracing::debug!(
        transcripts = framed.len(),
        width,
        "collated batch"
    );

    Ok(CollatedBatch {
        tokens,
        mask,
        lengths: batch.encoded.iter().map(Vec::len).collect(),
    })
}
