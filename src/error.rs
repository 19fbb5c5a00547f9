use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TisError {
    #[error("unknown nucleotide symbol {symbol:?} at position {position}")]
    UnknownSymbol { symbol: char, position: usize },
    #[error("codon {codon:?} is missing from the translation table")]
    UnknownCodon { codon: String },
    #[error(
        "no valid sequences left to predict on (all exceed max_seq_len={max_seq_len}); \
         raise the maximum sequence length or shorten the input"
    )]
    EmptyInput { max_seq_len: usize },
    #[error("failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{context}: {message}")]
    Runtime {
        context: &'static str,
        message: String,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl TisError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn runtime(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Runtime {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn output_write(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source: source.into(),
        }
    }
}
