use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::TisError;
use crate::types::InferenceOutput;

/// One transcript of the raw artifact. Serialized as a bare JSON array.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RawRow<'a> {
    Predicted(&'a str, &'a [f32]),
    Labelled(&'a str, &'a [f32], &'a [i64]),
}

fn rows(output: &InferenceOutput) -> Vec<RawRow<'_>> {
    output
        .ids
        .iter()
        .zip(&output.predictions)
        .enumerate()
        .map(|(i, (id, preds))| {
            match output.targets.as_ref().and_then(|targets| targets.get(i)) {
                Some(targets) => RawRow::Labelled(id, preds, targets),
                None => RawRow::Predicted(id, preds),
            }
        })
        .collect()
}

/// Writes one `[id, predictions, (targets)]` row per transcript.
pub fn write_raw_outputs(path: &Path, output: &InferenceOutput) -> Result<(), TisError> {
    let file = File::create(path).map_err(|e| TisError::output_write(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &rows(output))
        .map_err(|e| TisError::output_write(path, e))?;
    writer.flush().map_err(|e| TisError::output_write(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn read(path: &Path) -> Value {
        let data = std::fs::read_to_string(path).expect("read raw output");
        serde_json::from_str(&data).expect("valid json")
    }

    #[test]
    fn direct_mode_rows_hold_id_and_predictions() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("run.npy.json");
        let output = InferenceOutput {
            ids: vec!["a".to_string(), "b".to_string()],
            predictions: vec![vec![0.5, 0.25], vec![1.0]],
            targets: None,
            sequences: vec!["AT".to_string(), "G".to_string()],
        };
        write_raw_outputs(&path, &output).expect("write raw");
        assert_eq!(read(&path), json!([["a", [0.5, 0.25]], ["b", [1.0]]]));
    }

    #[test]
    fn structured_mode_rows_carry_targets() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("run.npy.json");
        let output = InferenceOutput {
            ids: vec!["a".to_string()],
            predictions: vec![vec![0.5, 0.0]],
            targets: Some(vec![vec![1, 0]]),
            sequences: vec!["AT".to_string()],
        };
        write_raw_outputs(&path, &output).expect("write raw");
        assert_eq!(read(&path), json!([["a", [0.5, 0.0], [1, 0]]]));
    }

    #[test]
    fn empty_output_is_an_empty_array() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("run.npy.json");
        write_raw_outputs(&path, &InferenceOutput::default()).expect("write raw");
        assert_eq!(read(&path), json!([]));
    }
}
