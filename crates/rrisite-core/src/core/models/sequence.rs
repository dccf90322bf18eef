use phf::{Set, phf_set};
use thiserror::Error;

static COMPLEMENTARY_PAIRS: Set<&'static str> = phf_set! {
    "AU", "UA", "GC", "CG", "GU", "UG",
};

/// Nucleotide code for positions of unknown identity.
pub const AMBIGUOUS_NUCLEOTIDE: u8 = b'N';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Sequence '{id}' contains invalid nucleotide '{nucleotide}' at position {position}")]
    InvalidNucleotide {
        id: String,
        nucleotide: char,
        position: usize,
    },

    #[error("Sequence '{0}' is empty")]
    Empty(String),
}

/// An RNA sequence over the alphabet `ACGUN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RnaSequence {
    id: String,
    seq: Vec<u8>,
}

impl RnaSequence {
    /// Creates a sequence, upper-casing the input and reading `T` as `U`.
    pub fn new(id: &str, sequence: &str) -> Result<Self, SequenceError> {
        if sequence.is_empty() {
            return Err(SequenceError::Empty(id.to_string()));
        }
        let seq = sequence
            .chars()
            .enumerate()
            .map(|(position, c)| match c.to_ascii_uppercase() {
                'A' => Ok(b'A'),
                'C' => Ok(b'C'),
                'G' => Ok(b'G'),
                'U' | 'T' => Ok(b'U'),
                'N' => Ok(AMBIGUOUS_NUCLEOTIDE),
                _ => Err(SequenceError::InvalidNucleotide {
                    id: id.to_string(),
                    nucleotide: c,
                    position,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id: id.to_string(),
            seq,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Nucleotide at position `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    #[inline]
    pub fn at(&self, i: usize) -> u8 {
        self.seq[i]
    }

    #[inline]
    pub fn is_ambiguous(&self, i: usize) -> bool {
        self.seq[i] == AMBIGUOUS_NUCLEOTIDE
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.seq
    }

    pub fn as_str(&self) -> &str {
        // only ASCII nucleotide codes are stored
        std::str::from_utf8(&self.seq).unwrap_or_default()
    }

    /// The same sequence read from its 3' to its 5' end.
    pub fn reversed(&self) -> Self {
        Self {
            id: self.id.clone(),
            seq: self.seq.iter().rev().copied().collect(),
        }
    }

    /// Checks whether `s1[i1]` can form a base pair with `s2[i2]`.
    pub fn are_complementary(s1: &RnaSequence, s2: &RnaSequence, i1: usize, i2: usize) -> bool {
        let pair = [s1.at(i1), s2.at(i2)];
        std::str::from_utf8(&pair).is_ok_and(|key| COMPLEMENTARY_PAIRS.contains(key))
    }
}
