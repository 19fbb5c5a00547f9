//! Nucleotide handling: symbol encoding, boundary framing, FASTA input and
//! in-frame codon translation.

pub mod alphabet;
pub mod fasta;
pub mod framing;
pub mod translation;

pub use alphabet::{decode, encode};
pub use fasta::{read_fasta, FastaEntry};
pub use framing::{frame, FramedSequence};
pub use translation::{translate, Translation};
