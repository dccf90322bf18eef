use super::Energy;

/// The additive terms that make up an overall interaction energy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyContributions {
    /// Energy of all intermolecular loops.
    pub loops: Energy,
    /// Duplex initiation penalty.
    pub init: Energy,
    /// Penalty for making the site accessible in the first sequence.
    pub ed1: Energy,
    /// Penalty for making the site accessible in the second sequence.
    pub ed2: Energy,
    pub dangle_left: Energy,
    pub dangle_right: Energy,
    pub end_left: Energy,
    pub end_right: Energy,
}

impl EnergyContributions {
    #[inline]
    pub fn total(&self) -> Energy {
        self.loops
            + self.init
            + self.ed1
            + self.ed2
            + self.dangle_left
            + self.dangle_right
            + self.end_left
            + self.end_right
    }

    /// Sum of the terms that do not depend on the intermolecular loops.
    #[inline]
    pub fn without_loops(&self) -> Energy {
        self.init
            + self.ed1
            + self.ed2
            + self.dangle_left
            + self.dangle_right
            + self.end_left
            + self.end_right
    }
}
