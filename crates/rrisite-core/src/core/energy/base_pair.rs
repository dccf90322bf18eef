use super::interaction_energy::InteractionEnergy;
use super::{E_INF, Energy};
use crate::core::accessibility::Accessibility;
use crate::core::accessibility::reverse::ReverseAccessibility;

/// Default maximal interior loop size per sequence.
pub const DEFAULT_MAX_INTERNAL_LOOP_SIZE: usize = 16;

/// Energy model that scores an interaction by the negated number of its base
/// pairs. Dangling ends and helix ends do not contribute.
#[derive(Debug, Clone, Copy)]
pub struct InteractionEnergyBasePair<'a> {
    acc1: &'a dyn Accessibility,
    acc2: &'a ReverseAccessibility<'a>,
    max_internal_loop_size1: usize,
    max_internal_loop_size2: usize,
}

impl<'a> InteractionEnergyBasePair<'a> {
    pub fn new(
        acc1: &'a dyn Accessibility,
        acc2: &'a ReverseAccessibility<'a>,
        max_internal_loop_size1: usize,
        max_internal_loop_size2: usize,
    ) -> Self {
        Self {
            acc1,
            acc2,
            max_internal_loop_size1,
            max_internal_loop_size2,
        }
    }

    pub fn with_default_loop_sizes(
        acc1: &'a dyn Accessibility,
        acc2: &'a ReverseAccessibility<'a>,
    ) -> Self {
        Self::new(
            acc1,
            acc2,
            DEFAULT_MAX_INTERNAL_LOOP_SIZE,
            DEFAULT_MAX_INTERNAL_LOOP_SIZE,
        )
    }
}

impl InteractionEnergy for InteractionEnergyBasePair<'_> {
    fn accessibility1(&self) -> &dyn Accessibility {
        self.acc1
    }

    fn accessibility2(&self) -> &ReverseAccessibility<'_> {
        self.acc2
    }

    fn max_internal_loop_size1(&self) -> usize {
        self.max_internal_loop_size1
    }

    fn max_internal_loop_size2(&self) -> usize {
        self.max_internal_loop_size2
    }

    fn e_unpaired(&self, _num_unpaired: usize) -> Energy {
        0.0
    }

    fn e_init(&self) -> Energy {
        -1.0
    }

    /// Closing a valid loop gains exactly one base pair.
    fn e_inter_left(&self, i1: usize, j1: usize, i2: usize, j2: usize) -> Energy {
        if self.is_valid_internal_loop(i1, j1, i2, j2) {
            self.best_e_inter_loop()
        } else {
            E_INF
        }
    }

    fn e_dangling_left(&self, _i1: usize, _i2: usize) -> Energy {
        0.0
    }

    fn e_dangling_right(&self, _j1: usize, _j2: usize) -> Energy {
        0.0
    }

    fn e_end_left(&self, _i1: usize, _i2: usize) -> Energy {
        0.0
    }

    fn e_end_right(&self, _j1: usize, _j2: usize) -> Energy {
        0.0
    }

    fn rt(&self) -> Energy {
        1.0
    }

    fn best_e_inter_loop(&self) -> Energy {
        self.e_init()
    }

    fn best_e_dangling(&self) -> Energy {
        0.0
    }

    fn best_e_end(&self) -> Energy {
        0.0
    }
}
