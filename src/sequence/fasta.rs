use std::fs::File;
use std::path::Path;

use bio::io::fasta;

use crate::error::TisError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaEntry {
    /// Full defline: record id followed by its description, if any.
    pub defline: String,
    pub sequence: String,
}

pub fn read_fasta(path: &Path) -> Result<Vec<FastaEntry>, TisError> {
    let file = File::open(path).map_err(|e| TisError::io("open fasta", e))?;
    let reader = fasta::Reader::new(file);

    let mut entries = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| TisError::io("read fasta record", e))?;
        let defline = match record.desc() {
            Some(desc) => format!("{} {}", record.id(), desc),
            None => record.id().to_string(),
        };
        entries.push(FastaEntry {
            defline,
            sequence: String::from_utf8_lossy(record.seq()).into_owned(),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_fasta(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp fasta");
        file.write_all(content.as_bytes()).expect("write temp fasta");
        file
    }

    #[test]
    fn reads_multiline_records_in_order() {
        let file = write_fasta(">tr1\nATGC\nGCTA\n>tr2\nacgu\n");
        let entries = read_fasta(file.path()).expect("valid fasta");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].defline, "tr1");
        assert_eq!(entries[0].sequence, "ATGCGCTA");
        assert_eq!(entries[1].defline, "tr2");
        assert_eq!(entries[1].sequence, "acgu");
    }

    #[test]
    fn keeps_description_in_defline() {
        let file = write_fasta(">ENST0001 gene=ABC chr=1\nATG\n");
        let entries = read_fasta(file.path()).expect("valid fasta");
        assert_eq!(entries[0].defline, "ENST0001 gene=ABC chr=1");
    }

    #[test]
    fn empty_file_has_no_records() {
        let file = write_fasta("");
        assert!(read_fasta(file.path()).expect("empty fasta").is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_fasta(Path::new("/nonexistent/input.fa")).expect_err("missing file");
        assert!(matches!(err, TisError::Io { .. }));
    }
}
