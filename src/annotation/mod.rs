//! Turns per-position probabilities into candidate start sites, the
//! annotated result table and the raw prediction artifact.

pub mod raw;
pub mod sites;
pub mod table;

use std::path::{Path, PathBuf};

use crate::error::TisError;
use crate::types::InferenceOutput;

pub use raw::write_raw_outputs;
pub use sites::select_sites;
pub use table::{assemble_records, write_table};

/// What a prediction run left on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSummary {
    pub transcripts: usize,
    pub sites: usize,
    /// `None` when no position cleared the threshold.
    pub table_path: Option<PathBuf>,
    pub raw_path: PathBuf,
}

pub fn annotate(
    output: &InferenceOutput,
    min_prob: f32,
    table_path: &Path,
    raw_path: &Path,
) -> Result<ArtifactSummary, TisError> {
    let sites = select_sites(&output.ids, &output.predictions, min_prob);

    let written_table = if sites.is_empty() {
        tracing::info!(min_prob, transcripts = output.len(), "No sites of interest found");
        remove_stale_table(table_path)?;
        None
    } else {
        let records = assemble_records(output, &sites)?;
        write_table(table_path, &records)?;
        tracing::info!(
            sites = records.len(),
            path = %table_path.display(),
            "Site predictions saved"
        );
        Some(table_path.to_path_buf())
    };

    write_raw_outputs(raw_path, output)?;
    tracing::info!(path = %raw_path.display(), "Raw model outputs saved");

    Ok(ArtifactSummary {
        transcripts: output.len(),
        sites: sites.len(),
        table_path: written_table,
        raw_path: raw_path.to_path_buf(),
    })
}

/// Deletes a table left behind by an earlier run on the same prefix.
fn remove_stale_table(path: &Path) -> Result<(), TisError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed stale site table");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(TisError::output_write(path, e)),
    }
}
