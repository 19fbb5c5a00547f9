use std::path::Path;

use crate::config::{InputMode, PredictConfig};
use crate::dataset::TranscriptDataset;
use crate::error::TisError;
use crate::pipeline::traits::BatchSource;
use crate::sequence::alphabet::encode;
use crate::sequence::fasta::read_fasta;
use crate::types::TranscriptBatch;

/// Id given to a sequence passed directly on the command line.
pub const SINGLE_SEQUENCE_ID: &str = "seq_1";

/// Raw sequences, one transcript per batch.
#[derive(Debug, Clone)]
pub struct SequenceBatches {
    ids: Vec<String>,
    encoded: Vec<Vec<u8>>,
    omitted: usize,
}

impl SequenceBatches {
    /// Uppercases and encodes `(id, sequence)` pairs, dropping sequences longer
    /// than `max_seq_len`.
    pub fn from_named<I>(records: I, max_seq_len: usize) -> Result<Self, TisError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut ids = Vec::new();
        let mut encoded = Vec::new();
        let mut omitted = 0usize;
        for (id, sequence) in records {
            if sequence.len() > max_seq_len {
                tracing::warn!(
                    id = %id,
                    length = sequence.len(),
                    max_seq_len,
                    "sequence exceeds maximum length, omitting"
                );
                omitted += 1;
                continue;
            }
            encoded.push(encode(&sequence.to_ascii_uppercase())?);
            ids.push(id);
        }

        if omitted > 0 {
            tracing::info!(omitted, kept = ids.len(), "over-length sequences omitted");
        }
        if ids.is_empty() {
            return Err(TisError::EmptyInput { max_seq_len });
        }
        Ok(Self {
            ids,
            encoded,
            omitted,
        })
    }

    pub fn from_sequence(sequence: &str, max_seq_len: usize) -> Result<Self, TisError> {
        Self::from_named(
            [(SINGLE_SEQUENCE_ID.to_string(), sequence.to_string())],
            max_seq_len,
        )
    }

    pub fn from_fasta(path: &Path, max_seq_len: usize) -> Result<Self, TisError> {
        let entries = read_fasta(path)?;
        tracing::info!(records = entries.len(), path = %path.display(), "read fasta");
        Self::from_named(
            entries.into_iter().map(|e| (e.defline, e.sequence)),
            max_seq_len,
        )
    }

    /// Number of sequences dropped for exceeding the length limit.
    pub fn omitted(&self) -> usize {
        self.omitted
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

impl BatchSource for SequenceBatches {
    fn len(&self) -> usize {
        self.ids.len()
    }

    fn batch(&self, index: usize) -> Result<TranscriptBatch, TisError> {
        match (self.ids.get(index), self.encoded.get(index)) {
            (Some(id), Some(encoded)) => Ok(TranscriptBatch {
                ids: vec![id.clone()],
                encoded: vec![encoded.clone()],
                targets: None,
            }),
            _ => Err(out_of_range(index, self.ids.len())),
        }
    }

    fn has_targets(&self) -> bool {
        false
    }
}

impl BatchSource for TranscriptDataset {
    fn len(&self) -> usize {
        self.num_batches()
    }

    fn batch(&self, index: usize) -> Result<TranscriptBatch, TisError> {
        self.get_batch(index)
            .ok_or_else(|| out_of_range(index, self.num_batches()))
    }

    fn has_targets(&self) -> bool {
        true
    }
}

fn out_of_range(index: usize, len: usize) -> TisError {
    TisError::invalid_input(format!("batch index {index} out of range for {len} batches"))
}

/// Input of a prediction run: a structured dataset or raw sequences.
#[derive(Debug)]
pub enum InputSource {
    Dataset(TranscriptDataset),
    Sequences(SequenceBatches),
}

impl InputSource {
    pub fn from_config(config: &PredictConfig) -> Result<Self, TisError> {
        match &config.input {
            InputMode::Dataset(dataset) => Ok(Self::Dataset(TranscriptDataset::open(dataset)?)),
            InputMode::Sequence(sequence) => Ok(Self::Sequences(SequenceBatches::from_sequence(
                sequence,
                config.max_seq_len,
            )?)),
            InputMode::Fasta(path) => Ok(Self::Sequences(SequenceBatches::from_fasta(
                path,
                config.max_seq_len,
            )?)),
        }
    }

    fn inner(&self) -> &dyn BatchSource {
        match self {
            Self::Dataset(dataset) => dataset,
            Self::Sequences(sequences) => sequences,
        }
    }
}

impl BatchSource for InputSource {
    fn len(&self) -> usize {
        self.inner().len()
    }

    fn batch(&self, index: usize) -> Result<TranscriptBatch, TisError> {
        self.inner().batch(index)
    }

    fn has_targets(&self) -> bool {
        self.inner().has_targets()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn named(records: &[(&str, &str)]) -> Vec<(String, String)> {
        records
            .iter()
            .map(|(id, seq)| (id.to_string(), seq.to_string()))
            .collect()
    }

    #[test]
    fn over_length_sequences_are_filtered() {
        let batches = SequenceBatches::from_named(
            named(&[("short", "ATGCATGCAT"), ("long", "ATGCATGCATGCATG")]),
            10,
        )
        .expect("one sequence survives");
        assert_eq!(batches.ids(), &["short".to_string()]);
        assert_eq!(batches.omitted(), 1);
        assert_eq!(batches.len(), 1);
    }

    #[test]
    fn nothing_left_after_filtering_is_empty_input() {
        let err = SequenceBatches::from_named(named(&[("long", "ATGCATGCATGCATG")]), 10)
            .expect_err("no sequence fits");
        assert!(matches!(err, TisError::EmptyInput { max_seq_len: 10 }));
    }

    #[test]
    fn sequences_are_uppercased_before_encoding() {
        let batches = SequenceBatches::from_sequence("augc", 100).expect("valid rna");
        let batch = batches.batch(0).expect("batch 0");
        assert_eq!(batch.ids, vec![SINGLE_SEQUENCE_ID.to_string()]);
        assert_eq!(batch.encoded, vec![vec![0, 1, 3, 2]]);
        assert!(batch.targets.is_none());
    }

    #[test]
    fn invalid_symbol_aborts() {
        assert!(matches!(
            SequenceBatches::from_sequence("ATGX", 100),
            Err(TisError::UnknownSymbol { position: 3, .. })
        ));
    }

    #[test]
    fn one_transcript_per_batch_in_input_order() {
        let batches = SequenceBatches::from_named(
            named(&[("c", "ATG"), ("a", "GGG"), ("b", "CCC")]),
            100,
        )
        .expect("valid input");
        let ids: Vec<String> = (0..batches.len())
            .flat_map(|i| batches.batch(i).expect("batch").ids)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert!(batches.batch(3).is_err());
    }

    #[test]
    fn random_ids_come_back_in_input_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let bases = ['A', 'T', 'U', 'C', 'G', 'N'];
        let max_seq_len = 40;
        let mut records = Vec::new();
        let mut expected = Vec::new();
        for i in 0..250 {
            let id = format!("tr{}_{i}", rng.gen_range(0..1_000_000u32));
            let len = rng.gen_range(1..60);
            let seq: String = (0..len)
                .map(|_| bases[rng.gen_range(0..bases.len())])
                .collect();
            if len <= max_seq_len {
                expected.push(id.clone());
            }
            records.push((id, seq));
        }

        let batches = SequenceBatches::from_named(records, max_seq_len).expect("valid input");
        assert_eq!(batches.omitted(), 250 - expected.len());
        let ids: Vec<String> = (0..batches.len())
            .flat_map(|i| batches.batch(i).expect("batch").ids)
            .collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn input_source_reads_fasta_from_config() {
        let mut fasta = tempfile::NamedTempFile::new().expect("temp fasta");
        fasta
            .write_all(b">tr1 desc\nATGAAATAG\n>tr2\nGGGGGGGGGGGGGGGGGGGG\n")
            .expect("write fasta");
        let mut config = PredictConfig::new(InputMode::Fasta(fasta.path().to_path_buf()), "out");
        config.max_seq_len = 10;

        let source = InputSource::from_config(&config).expect("fasta source");
        assert!(matches!(source, InputSource::Sequences(_)));
        assert_eq!(source.len(), 1);
        assert!(!source.has_targets());
        assert_eq!(source.batch(0).expect("batch").ids, vec!["tr1 desc"]);
    }
}
