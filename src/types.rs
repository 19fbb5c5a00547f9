/// One batch yielded by an input source. All vectors are index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptBatch {
    pub ids: Vec<String>,
    /// Encoded, unframed symbols per transcript.
    pub encoded: Vec<Vec<u8>>,
    /// Per-position TIS labels, present only for structured inputs.
    pub targets: Option<Vec<Vec<i64>>>,
}

impl TranscriptBatch {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Concatenated model outputs of a prediction run, index-aligned by transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferenceOutput {
    pub ids: Vec<String>,
    pub predictions: Vec<Vec<f32>>,
    pub targets: Option<Vec<Vec<i64>>>,
    /// Nucleotide sequences recovered from the encoded input, used for translation.
    pub sequences: Vec<String>,
}

impl InferenceOutput {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSite {
    /// Index into [`InferenceOutput`] vectors.
    pub transcript: usize,
    pub id: String,
    pub position: usize,
    pub probability: f32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResultRecord {
    pub id: String,
    pub tis_pos: usize,
    pub output: f32,
    pub start_codon: String,
    /// First base of the in-frame stop codon, if one was found.
    pub stop_pos: Option<usize>,
    pub has_stop: bool,
    pub prot_len: usize,
    pub prot_seq: String,
}
