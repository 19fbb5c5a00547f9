use crate::sequence::alphabet::{END_SYMBOL, START_SYMBOL};

/// Mask value for positions excluded from loss and probability extraction.
pub const IGNORE_MASK: i64 = -1;
/// Mask value for nucleotide positions.
pub const VALID_MASK: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedSequence {
    pub tokens: Vec<u8>,
    /// Aligned with `tokens`: [`IGNORE_MASK`] on both sentinels, [`VALID_MASK`] elsewhere.
    pub mask: Vec<i64>,
}

impl FramedSequence {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

pub fn frame(encoded: &[u8]) -> FramedSequence {
    let mut tokens = Vec::with_capacity(encoded.len() + 2);
    tokens.push(START_SYMBOL);
    tokens.extend_from_slice(encoded);
    tokens.push(END_SYMBOL);

    let mut mask = vec![VALID_MASK; tokens.len()];
    mask[0] = IGNORE_MASK;
    let last = mask.len() - 1;
    mask[last] = IGNORE_MASK;

    FramedSequence { tokens, mask }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::sequence::alphabet::encode;

    #[test]
    fn wraps_sequence_with_sentinels() {
        let framed = frame(&[0, 1, 2, 3]);
        assert_eq!(framed.tokens, vec![5, 0, 1, 2, 3, 6]);
        assert_eq!(framed.mask, vec![-1, 1, 1, 1, 1, -1]);
    }

    #[test]
    fn empty_sequence_frames_to_two_sentinels() {
        let framed = frame(&[]);
        assert_eq!(framed.tokens, vec![START_SYMBOL, END_SYMBOL]);
        assert_eq!(framed.mask, vec![IGNORE_MASK, IGNORE_MASK]);
    }

    #[test]
    fn length_and_mask_invariants_hold_for_random_sequences() {
        let mut rng = StdRng::seed_from_u64(7);
        let bases = ['A', 'T', 'U', 'C', 'G', 'N'];
        for _ in 0..200 {
            let len = rng.gen_range(0..300);
            let seq: String = (0..len)
                .map(|_| bases[rng.gen_range(0..bases.len())])
                .collect();
            let framed = frame(&encode(&seq).expect("random sequence is valid"));

            assert_eq!(framed.len(), seq.len() + 2);
            assert_eq!(framed.mask.len(), framed.len());
            let ignored: Vec<usize> = framed
                .mask
                .iter()
                .enumerate()
                .filter(|(_, &m)| m == IGNORE_MASK)
                .map(|(i, _)| i)
                .collect();
            assert_eq!(ignored, vec![0, framed.len() - 1]);
        }
    }
}
