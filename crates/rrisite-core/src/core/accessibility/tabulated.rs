use super::constraint::AccessibilityConstraint;
use super::{Accessibility, AccessibilityError};
use crate::core::energy::{E_INF, Energy};
use crate::core::models::sequence::RnaSequence;
use nalgebra::DMatrix;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct EdRecord {
    i: usize,
    j: usize,
    ed: Energy,
}

/// Accessibility provider backed by precomputed energy tables.
///
/// Entry `(i, j)` of the ED table holds the penalty for the region `[i, j]`;
/// only the upper triangle (`i <= j`) is read. Regions overlapping a blocked
/// position are reported as [`E_INF`] regardless of the table content.
#[derive(Debug, Clone)]
pub struct TabulatedAccessibility {
    sequence: RnaSequence,
    constraint: AccessibilityConstraint,
    ed: DMatrix<Energy>,
    es: Option<DMatrix<Energy>>,
}

impl TabulatedAccessibility {
    pub fn new(sequence: RnaSequence, ed: DMatrix<Energy>) -> Result<Self, AccessibilityError> {
        check_shape(&ed, sequence.len())?;
        let constraint = AccessibilityConstraint::new(sequence.len());
        Ok(Self {
            sequence,
            constraint,
            ed,
            es: None,
        })
    }

    /// Reads ED values from CSV records with the header `i,j,ed`. Regions
    /// without a record cannot be made accessible.
    pub fn from_reader<R: Read>(
        sequence: RnaSequence,
        reader: R,
        source: &str,
    ) -> Result<Self, AccessibilityError> {
        let length = sequence.len();
        let mut ed = DMatrix::from_element(length, length, E_INF);
        let mut reader = csv::Reader::from_reader(reader);
        let mut records = 0usize;
        for result in reader.deserialize::<EdRecord>() {
            let record = result.map_err(|e| AccessibilityError::Csv {
                path: source.to_string(),
                source: e,
            })?;
            if record.i > record.j || record.j >= length {
                return Err(AccessibilityError::InvalidRegion {
                    from: record.i,
                    to: record.j,
                    length,
                });
            }
            ed[(record.i, record.j)] = record.ed;
            records += 1;
        }
        debug!(
            "Loaded {} ED values for sequence '{}' from '{}'",
            records,
            sequence.id(),
            source
        );
        Self::new(sequence, ed)
    }

    pub fn load(sequence: RnaSequence, path: &Path) -> Result<Self, AccessibilityError> {
        let file = std::fs::File::open(path).map_err(|e| AccessibilityError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_reader(sequence, file, &path.to_string_lossy())
    }

    pub fn with_es(mut self, es: DMatrix<Energy>) -> Result<Self, AccessibilityError> {
        check_shape(&es, self.sequence.len())?;
        self.es = Some(es);
        Ok(self)
    }

    pub fn with_constraint(
        mut self,
        constraint: AccessibilityConstraint,
    ) -> Result<Self, AccessibilityError> {
        if constraint.length() != self.sequence.len() {
            return Err(AccessibilityError::LengthMismatch {
                constraint: constraint.length(),
                sequence: self.sequence.len(),
            });
        }
        self.constraint = constraint;
        Ok(self)
    }
}

fn check_shape(table: &DMatrix<Energy>, length: usize) -> Result<(), AccessibilityError> {
    let (rows, cols) = table.shape();
    if rows != length || cols != length {
        return Err(AccessibilityError::Shape { rows, cols, length });
    }
    Ok(())
}

impl Accessibility for TabulatedAccessibility {
    fn sequence(&self) -> &RnaSequence {
        &self.sequence
    }

    fn constraint(&self) -> &AccessibilityConstraint {
        &self.constraint
    }

    #[inline]
    fn ed(&self, from: usize, to: usize) -> Energy {
        debug_assert!(from <= to);
        if self.constraint.has_blocked_in(from, to) {
            return E_INF;
        }
        self.ed[(from, to)]
    }

    fn es(&self, from: usize, to: usize) -> Energy {
        self.es.as_ref().map_or(E_INF, |es| es[(from, to)])
    }
}
