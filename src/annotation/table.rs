use std::path::Path;

use crate::error::TisError;
use crate::sequence::translation::translate;
use crate::types::{CandidateSite, InferenceOutput, ResultRecord};

/// Translates the open reading frame behind every site.
pub fn assemble_records(
    output: &InferenceOutput,
    sites: &[CandidateSite],
) -> Result<Vec<ResultRecord>, TisError> {
    sites
        .iter()
        .map(|site| {
            let sequence = output.sequences.get(site.transcript).ok_or_else(|| {
                TisError::invalid_input(format!(
                    "site references transcript {} but only {} sequences are available",
                    site.transcript,
                    output.sequences.len()
                ))
            })?;
            let downstream = sequence.get(site.position..).unwrap_or("");
            let translation = translate(downstream)?;
            let start_codon = downstream.get(..3).unwrap_or(downstream).to_string();

            Ok(ResultRecord {
                id: site.id.clone(),
                tis_pos: site.position,
                output: site.probability,
                start_codon,
                stop_pos: translation.stop_position(site.position),
                has_stop: translation.has_stop,
                prot_len: translation.protein.chars().count(),
                prot_seq: translation.protein,
            })
        })
        .collect()
}

/// Writes `records` as CSV with a header row.
pub fn write_table(path: &Path, records: &[ResultRecord]) -> Result<(), TisError> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| TisError::output_write(path, e))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| TisError::output_write(path, e))?;
    }
    writer.flush().map_err(|e| TisError::output_write(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(sequence: &str) -> InferenceOutput {
        InferenceOutput {
            ids: vec!["tr1".to_string()],
            predictions: vec![vec![0.0; sequence.len()]],
            targets: None,
            sequences: vec![sequence.to_string()],
        }
    }

    fn site(position: usize, probability: f32) -> CandidateSite {
        CandidateSite {
            transcript: 0,
            id: "tr1".to_string(),
            position,
            probability,
        }
    }

    #[test]
    fn record_translates_from_site_to_stop() {
        let output = output("CCATGGCTTAGCC");
        let records = assemble_records(&output, &[site(2, 0.9)]).expect("records");
        assert_eq!(
            records,
            vec![ResultRecord {
                id: "tr1".to_string(),
                tis_pos: 2,
                output: 0.9,
                start_codon: "ATG".to_string(),
                stop_pos: Some(8),
                has_stop: true,
                prot_len: 2,
                prot_seq: "MA".to_string(),
            }]
        );
    }

    #[test]
    fn site_near_the_end_has_short_start_codon() {
        let output = output("GGGAT");
        let records = assemble_records(&output, &[site(3, 0.4)]).expect("records");
        assert_eq!(records[0].start_codon, "AT");
        assert_eq!(records[0].prot_seq, "");
        assert!(!records[0].has_stop);
        assert_eq!(records[0].stop_pos, None);
    }

    #[test]
    fn unknown_transcript_is_rejected() {
        let mut bad = site(0, 0.5);
        bad.transcript = 3;
        assert!(assemble_records(&output("ATG"), &[bad]).is_err());
    }

    #[test]
    fn table_has_header_and_empty_stop_column() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.csv");
        let records = assemble_records(&output("ATGAAA"), &[site(0, 0.5)]).expect("records");
        write_table(&path, &records).expect("write table");

        let written = std::fs::read_to_string(&path).expect("read table");
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("id,tis_pos,output,start_codon,stop_pos,has_stop,prot_len,prot_seq")
        );
        assert_eq!(lines.next(), Some("tr1,0,0.5,ATG,,false,2,MK"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn unwritable_table_reports_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join("out.csv");
        let err = write_table(&path, &[]).expect_err("parent directory is missing");
        assert!(matches!(err, TisError::OutputWrite { path: ref p, .. } if *p == path));
    }
}
