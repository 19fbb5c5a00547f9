use crate::error::TisError;

pub const STOP_CODONS: [&[u8; 3]; 3] = [b"TAG", b"TGA", b"TAA"];

/// NCBI translation table 1 (standard code), codons enumerated in TCAG order:
/// index = 16 * first + 4 * second + third.
const STANDARD_CODE: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Residue emitted for codons containing an ambiguous base.
pub const UNKNOWN_RESIDUE: char = 'X';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub protein: String,
    pub has_stop: bool,
}

impl Translation {
    /// Position of the stop codon's first base when translation started at
    /// `start`, or `None` when the reading frame ran off the sequence.
    pub fn stop_position(&self, start: usize) -> Option<usize> {
        self.has_stop
            .then(|| start + 3 * self.protein.chars().count())
    }
}

const fn tcag_index(base: u8) -> Option<usize> {
    match base {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

fn normalize(codon: &[u8]) -> [u8; 3] {
    let mut out = [0u8; 3];
    for (dst, &src) in out.iter_mut().zip(codon) {
        *dst = if src == b'U' { b'T' } else { src };
    }
    out
}

pub fn is_stop_codon(codon: &[u8]) -> bool {
    codon.len() == 3 && STOP_CODONS.contains(&&normalize(codon))
}

pub fn amino_acid(codon: &[u8]) -> Result<char, TisError> {
    let unknown = || TisError::UnknownCodon {
        codon: String::from_utf8_lossy(codon).into_owned(),
    };
    if codon.len() != 3 {
        return Err(unknown());
    }
    if codon.contains(&b'N') && codon.iter().all(|b| b"ATUCGN".contains(b)) {
        return Ok(UNKNOWN_RESIDUE);
    }
    let mut index = 0;
    for &base in codon {
        index = index * 4 + tcag_index(base).ok_or_else(unknown)?;
    }
    Ok(char::from(STANDARD_CODE[index]))
}

/// Translates `sequence` in frame from offset 0 up to the first stop codon.
/// Trailing bases that do not fill a codon are ignored.
pub fn translate(sequence: &str) -> Result<Translation, TisError> {
    let mut protein = String::with_capacity(sequence.len() / 3);
    for codon in sequence.as_bytes().chunks_exact(3) {
        if is_stop_codon(codon) {
            return Ok(Translation {
                protein,
                has_stop: true,
            });
        }
        protein.push(amino_acid(codon)?);
    }
    Ok(Translation {
        protein,
        has_stop: false,
    })
}
