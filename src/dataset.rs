//! Structured transcript store and memory-bounded batching.
//!
//! The store is a JSON document listing transcripts with their contig and the
//! annotated TIS positions. Prediction runs over the `test` contigs of a
//! [`DatasetConfig`], or over every transcript when no test contigs are given.
//! Transcripts are grouped by length so that each batch stays within
//! `max_memory` padded tokens and `max_transcripts_per_batch` transcripts.

use std::collections::HashSet;
use std::path::Path;

use rayon::prelude::*;
use serde::Deserialize;

use crate::config::DatasetConfig;
use crate::error::TisError;
use crate::sequence::alphabet::encode;
use crate::types::TranscriptBatch;

#[derive(Debug, Clone, Deserialize)]
pub struct StoredTranscript {
    pub id: String,
    #[serde(default)]
    pub contig: String,
    pub seq: String,
    /// 0-based TIS positions on the transcript.
    #[serde(default)]
    pub tis: Vec<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptStore {
    pub transcripts: Vec<StoredTranscript>,
}

impl TranscriptStore {
    pub fn load(path: &Path) -> Result<Self, TisError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| TisError::io("read transcript store", e))?;
        serde_json::from_str(&data).map_err(|e| TisError::json("parse transcript store", e))
    }
}

/// Number of stored transcripts falling in each configured split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitCounts {
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

#[derive(Debug)]
pub struct TranscriptDataset {
    ids: Vec<String>,
    encoded: Vec<Vec<u8>>,
    targets: Vec<Vec<i64>>,
    batches: Vec<Vec<usize>>,
    splits: SplitCounts,
}

impl TranscriptDataset {
    pub fn open(config: &DatasetConfig) -> Result<Self, TisError> {
        let store = TranscriptStore::load(&config.store_path)?;
        Self::from_store(store, config)
    }

    pub fn from_store(store: TranscriptStore, config: &DatasetConfig) -> Result<Self, TisError> {
        if config.max_transcripts_per_batch == 0 {
            return Err(TisError::invalid_input(
                "max_transcripts_per_batch must be at least 1",
            ));
        }

        let splits = count_splits(&store.transcripts, config);
        let selected: Vec<StoredTranscript> = if config.test.is_empty() {
            store.transcripts
        } else {
            let test: HashSet<&str> = config.test.iter().map(String::as_str).collect();
            store
                .transcripts
                .into_iter()
                .filter(|tr| test.contains(tr.contig.as_str()))
                .collect()
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_workers)
            .build()
            .map_err(|e| TisError::runtime("build dataset worker pool", e))?;
        let encoded: Vec<(Vec<u8>, Vec<i64>)> = pool.install(|| {
            selected
                .par_iter()
                .map(encode_transcript)
                .collect::<Result<Vec<_>, TisError>>()
        })?;
        let (encoded, targets): (Vec<_>, Vec<_>) = encoded.into_iter().unzip();
        let ids: Vec<String> = selected.into_iter().map(|tr| tr.id).collect();

        let lengths: Vec<usize> = encoded.iter().map(Vec::len).collect();
        let batches = plan_batches(
            &lengths,
            config.max_memory,
            config.max_transcripts_per_batch,
        );

        tracing::info!(
            transcripts = ids.len(),
            batches = batches.len(),
            train = splits.train,
            val = splits.val,
            test = splits.test,
            "transcript dataset loaded"
        );

        Ok(Self {
            ids,
            encoded,
            targets,
            batches,
            splits,
        })
    }

    pub fn num_transcripts(&self) -> usize {
        self.ids.len()
    }

    pub fn num_batches(&self) -> usize {
        self.batches.len()
    }

    pub fn splits(&self) -> SplitCounts {
        self.splits
    }

    pub fn get_batch(&self, index: usize) -> Option<TranscriptBatch> {
        let members = self.batches.get(index)?;
        Some(TranscriptBatch {
            ids: members.iter().map(|&i| self.ids[i].clone()).collect(),
            encoded: members.iter().map(|&i| self.encoded[i].clone()).collect(),
            targets: Some(members.iter().map(|&i| self.targets[i].clone()).collect()),
        })
    }
}

fn encode_transcript(tr: &StoredTranscript) -> Result<(Vec<u8>, Vec<i64>), TisError> {
    let encoded = encode(&tr.seq.to_ascii_uppercase())?;
    let mut target = vec![0i64; encoded.len()];
    for &pos in &tr.tis {
        let slot = target.get_mut(pos).ok_or_else(|| {
            TisError::invalid_input(format!(
                "TIS position {pos} lies outside transcript {} of length {}",
                tr.id,
                encoded.len()
            ))
        })?;
        *slot = 1;
    }
    Ok((encoded, target))
}

fn count_splits(transcripts: &[StoredTranscript], config: &DatasetConfig) -> SplitCounts {
    let count = |contigs: &[String]| {
        transcripts
            .iter()
            .filter(|tr| contigs.iter().any(|c| c == &tr.contig))
            .count()
    };
    SplitCounts {
        train: count(config.train.as_slice()),
        val: count(config.val.as_slice()),
        test: count(config.test.as_slice()),
    }
}

/// Groups transcript indices into batches, shortest transcripts first.
/// A batch closes once adding the next transcript would exceed either the
/// transcript cap or `count * longest_framed_length > max_memory`. A
/// transcript that alone exceeds the memory budget still gets its own batch.
pub(crate) fn plan_batches(
    lengths: &[usize],
    max_memory: usize,
    max_transcripts_per_batch: usize,
) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..lengths.len()).collect();
    order.sort_by_key(|&i| lengths[i]);

    let mut batches = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    for idx in order {
        let framed_len = lengths[idx] + 2;
        let count = current.len() + 1;
        if !current.is_empty()
            && (count > max_transcripts_per_batch || count * framed_len > max_memory)
        {
            batches.push(std::mem::take(&mut current));
        }
        current.push(idx);
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}
