use super::constraint::AccessibilityConstraint;
use super::{Accessibility, AccessibilityError};
use crate::core::energy::{E_INF, Energy};
use crate::core::models::sequence::RnaSequence;

/// Accessibility provider that treats every region as accessible at no cost.
/// Regions containing blocked positions cannot be made accessible.
#[derive(Debug, Clone)]
pub struct AccessibilityDisabled {
    sequence: RnaSequence,
    constraint: AccessibilityConstraint,
}

impl AccessibilityDisabled {
    pub fn new(sequence: RnaSequence) -> Self {
        let constraint = AccessibilityConstraint::new(sequence.len());
        Self {
            sequence,
            constraint,
        }
    }

    pub fn with_constraint(
        sequence: RnaSequence,
        constraint: AccessibilityConstraint,
    ) -> Result<Self, AccessibilityError> {
        if constraint.length() != sequence.len() {
            return Err(AccessibilityError::LengthMismatch {
                constraint: constraint.length(),
                sequence: sequence.len(),
            });
        }
        Ok(Self {
            sequence,
            constraint,
        })
    }
}

impl Accessibility for AccessibilityDisabled {
    fn sequence(&self) -> &RnaSequence {
        &self.sequence
    }

    fn constraint(&self) -> &AccessibilityConstraint {
        &self.constraint
    }

    fn ed(&self, from: usize, to: usize) -> Energy {
        debug_assert!(from <= to && to < self.sequence.len());
        if self.constraint.has_blocked_in(from, to) {
            E_INF
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence() -> RnaSequence {
        RnaSequence::new("s", "ACGUACGU").unwrap()
    }

    #[test]
    fn ed_is_zero_without_constraints() {
        let acc = AccessibilityDisabled::new(sequence());
        assert_eq!(acc.ed(0, 7), 0.0);
        assert_eq!(acc.ed(3, 3), 0.0);
        assert_eq!(acc.es(0, 7), E_INF);
    }

    #[test]
    fn ed_is_infinite_for_regions_with_blocked_positions() {
        let constraint = AccessibilityConstraint::from_encoding(8, "4-5", "").unwrap();
        let acc = AccessibilityDisabled::with_constraint(sequence(), constraint).unwrap();
        assert_eq!(acc.ed(0, 3), 0.0);
        assert_eq!(acc.ed(3, 4), E_INF);
        assert_eq!(acc.ed(6, 7), 0.0);
    }

    #[test]
    fn constraint_length_must_match_sequence() {
        let result =
            AccessibilityDisabled::with_constraint(sequence(), AccessibilityConstraint::new(5));
        assert!(matches!(
            result,
            Err(AccessibilityError::LengthMismatch {
                constraint: 5,
                sequence: 8
            })
        ));
    }
}
