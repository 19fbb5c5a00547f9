use crate::error::TisError;

pub const SYMBOL_A: u8 = 0;
pub const SYMBOL_T: u8 = 1;
pub const SYMBOL_C: u8 = 2;
pub const SYMBOL_G: u8 = 3;
pub const SYMBOL_N: u8 = 4;
/// Leading sentinel added by the framer.
pub const START_SYMBOL: u8 = 5;
/// Trailing sentinel added by the framer.
pub const END_SYMBOL: u8 = 6;
/// Right-padding used when transcripts of different lengths share a batch.
pub const PAD_SYMBOL: u8 = 7;

/// Maps one nucleotide to its symbol code. T and U share a code.
pub const fn symbol_of(base: char) -> Option<u8> {
    match base {
        'A' => Some(SYMBOL_A),
        'T' | 'U' => Some(SYMBOL_T),
        'C' => Some(SYMBOL_C),
        'G' => Some(SYMBOL_G),
        'N' => Some(SYMBOL_N),
        _ => None,
    }
}

/// Encodes an uppercase nucleotide string, failing on the first character
/// outside {A, T, U, C, G, N}.
pub fn encode(sequence: &str) -> Result<Vec<u8>, TisError> {
    sequence
        .chars()
        .enumerate()
        .map(|(position, symbol)| {
            symbol_of(symbol).ok_or(TisError::UnknownSymbol { symbol, position })
        })
        .collect()
}

/// Inverse of [`encode`] for the five nucleotide codes. Code 1 always decodes
/// to `T`, so RNA input does not round-trip.
pub fn decode(symbols: &[u8]) -> Result<String, TisError> {
    symbols
        .iter()
        .enumerate()
        .map(|(position, &code)| match code {
            SYMBOL_A => Ok('A'),
            SYMBOL_T => Ok('T'),
            SYMBOL_C => Ok('C'),
            SYMBOL_G => Ok('G'),
            SYMBOL_N => Ok('N'),
            other => Err(TisError::UnknownSymbol {
                symbol: char::from_digit(u32::from(other), 10).unwrap_or('?'),
                position,
            }),
        })
        .collect()
}
