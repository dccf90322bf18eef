use super::contributions::EnergyContributions;
use super::{E_INF, Energy, e_is_inf, e_is_not_inf};
use crate::core::accessibility::Accessibility;
use crate::core::accessibility::reverse::ReverseAccessibility;
use crate::core::models::interaction::{BasePair, Interaction};
use crate::core::models::sequence::RnaSequence;
use thiserror::Error;
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Number of candidates evaluated together by [`InteractionEnergy::total_energy_x4`].
pub const LANES: usize = 4;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EnergyError {
    #[error("Region {from}-{to} is not a valid region of sequence {sequence} (length {length})")]
    InvalidRegion {
        sequence: u8,
        from: usize,
        to: usize,
        length: usize,
    },
}

/// Interaction boundaries and hybridization energies of four candidates,
/// stored lane-wise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyLanes {
    pub i1: [usize; LANES],
    pub j1: [usize; LANES],
    pub i2: [usize; LANES],
    pub j2: [usize; LANES],
    pub hybrid_e: [Energy; LANES],
}

impl EnergyLanes {
    /// Builds the lanes from `(i1, j1, i2, j2, hybrid_e)` tuples.
    pub fn from_candidates(candidates: [(usize, usize, usize, usize, Energy); LANES]) -> Self {
        Self {
            i1: candidates.map(|c| c.0),
            j1: candidates.map(|c| c.1),
            i2: candidates.map(|c| c.2),
            j2: candidates.map(|c| c.3),
            hybrid_e: candidates.map(|c| c.4),
        }
    }
}

/// Energy evaluation of interactions between two RNAs.
///
/// The first sequence is indexed 5'->3', the second one is indexed 3'->5'
/// through a [`ReverseAccessibility`], so an interaction site is given by the
/// regions `[i1, j1]` and `[i2, j2]` with `(i1, i2)` and `(j1, j2)` being the
/// outermost intermolecular base pairs.
///
/// Implementors provide the accessibility data and the model-specific energy
/// terms. The composition of those terms into overall interaction energies is
/// shared by all models and must not be overridden.
pub trait InteractionEnergy: Sync {
    fn accessibility1(&self) -> &dyn Accessibility;

    fn accessibility2(&self) -> &ReverseAccessibility<'_>;

    /// Maximal number of unpaired positions in sequence 1 enclosed by two
    /// consecutive intermolecular base pairs.
    fn max_internal_loop_size1(&self) -> usize;

    /// Maximal number of unpaired positions in sequence 2 enclosed by two
    /// consecutive intermolecular base pairs.
    fn max_internal_loop_size2(&self) -> usize;

    /// Energy contribution of `num_unpaired` unpaired bases within an
    /// intramolecular multiloop.
    fn e_unpaired(&self, num_unpaired: usize) -> Energy;

    /// Duplex initiation energy.
    fn e_init(&self) -> Energy;

    /// Energy of the interior loop closed by `(i1, i2)` and enclosing
    /// `(j1, j2)`, excluding the right base pair itself, or [`E_INF`] if the
    /// loop is not valid.
    fn e_inter_left(&self, i1: usize, j1: usize, i2: usize, j2: usize) -> Energy;

    /// Dangling end energy on the left of the interaction closed by `(i1, i2)`.
    fn e_dangling_left(&self, i1: usize, i2: usize) -> Energy;

    /// Dangling end energy on the right of the interaction closed by `(j1, j2)`.
    fn e_dangling_right(&self, j1: usize, j2: usize) -> Energy;

    /// Penalty for closing the interaction with `(i1, i2)` on its left end.
    fn e_end_left(&self, i1: usize, i2: usize) -> Energy;

    /// Penalty for closing the interaction with `(j1, j2)` on its right end.
    fn e_end_right(&self, j1: usize, j2: usize) -> Energy;

    /// Gas constant times temperature, in kcal/mol.
    fn rt(&self) -> Energy;

    /// Lower bound of any interior loop energy of this model.
    fn best_e_inter_loop(&self) -> Energy;

    /// Lower bound of any dangling end energy of this model.
    fn best_e_dangling(&self) -> Energy;

    /// Lower bound of any helix end penalty of this model.
    fn best_e_end(&self) -> Energy;

    fn size1(&self) -> usize {
        self.accessibility1().sequence().len()
    }

    fn size2(&self) -> usize {
        self.accessibility2().sequence().len()
    }

    /// Whether position `i` of sequence 1 is a known nucleotide that is not
    /// blocked from interacting.
    fn is_accessible1(&self, i: usize) -> bool {
        let acc = self.accessibility1();
        !acc.sequence().is_ambiguous(i) && acc.constraint().is_accessible(i)
    }

    /// Whether position `i` of sequence 2 (reversed index) is a known
    /// nucleotide that is not blocked from interacting.
    fn is_accessible2(&self, i: usize) -> bool {
        let acc = self.accessibility2();
        !acc.sequence().is_ambiguous(i) && acc.constraint().is_accessible(i)
    }

    /// Whether `seq1[i1]` can pair with `seq2[i2]` (reversed index).
    fn are_complementary(&self, i1: usize, i2: usize) -> bool {
        RnaSequence::are_complementary(
            self.accessibility1().sequence(),
            self.accessibility2().sequence(),
            i1,
            i2,
        )
    }

    #[inline]
    fn ed1(&self, i1: usize, j1: usize) -> Energy {
        self.accessibility1().ed(i1, j1)
    }

    #[inline]
    fn ed2(&self, i2: usize, j2: usize) -> Energy {
        self.accessibility2().ed(i2, j2)
    }

    /// Ensemble energy of the intramolecular structures within `[i1, j1]` of
    /// sequence 1.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidRegion`] unless `i1 <= j1 < size1()`.
    fn es1(&self, i1: usize, j1: usize) -> Result<Energy, EnergyError> {
        check_region(1, i1, j1, self.size1())?;
        Ok(self.accessibility1().es(i1, j1))
    }

    /// Ensemble energy of the intramolecular structures within `[i2, j2]` of
    /// sequence 2 (reversed indices).
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidRegion`] unless `i2 <= j2 < size2()`.
    fn es2(&self, i2: usize, j2: usize) -> Result<Energy, EnergyError> {
        check_region(2, i2, j2, self.size2())?;
        Ok(self.accessibility2().es(i2, j2))
    }

    /// Overall energy of the interaction site `[i1, j1]` x `[i2, j2]` given
    /// its hybridization energy: accessibility penalties, dangling ends
    /// weighted by the probability that the neighboring positions are unpaired,
    /// and helix end penalties are added. An infinite `hybrid_e` yields
    /// [`E_INF`].
    #[inline]
    fn total_energy(&self, i1: usize, j1: usize, i2: usize, j2: usize, hybrid_e: Energy) -> Energy {
        if e_is_inf(hybrid_e) {
            return E_INF;
        }
        hybrid_e
            + self.ed1(i1, j1)
            + self.ed2(i2, j2)
            + self.e_dangling_left(i1, i2) * self.pr_dangling_left(i1, j1, i2, j2)
            + self.e_dangling_right(j1, j2) * self.pr_dangling_right(i1, j1, i2, j2)
            + self.e_end_left(i1, i2)
            + self.e_end_right(j1, j2)
    }

    /// [`total_energy`](Self::total_energy) for four candidates at once.
    ///
    /// Each lane yields exactly the value of the scalar evaluation. Terms of
    /// lanes with infinite hybridization energy are not evaluated.
    fn total_energy_x4(&self, lanes: &EnergyLanes) -> [Energy; LANES] {
        let active: [bool; LANES] = lanes.hybrid_e.map(e_is_not_inf);
        let term = |f: &dyn Fn(usize) -> Energy| -> [Energy; LANES] {
            std::array::from_fn(|k| if active[k] { f(k) } else { 0.0 })
        };
        let (i1, j1, i2, j2) = (&lanes.i1, &lanes.j1, &lanes.i2, &lanes.j2);

        let ed1 = term(&|k: usize| self.ed1(i1[k], j1[k]));
        let ed2 = term(&|k: usize| self.ed2(i2[k], j2[k]));
        let dangle_left = term(&|k: usize| self.e_dangling_left(i1[k], i2[k]));
        let pr_left = term(&|k: usize| self.pr_dangling_left(i1[k], j1[k], i2[k], j2[k]));
        let dangle_right = term(&|k: usize| self.e_dangling_right(j1[k], j2[k]));
        let pr_right = term(&|k: usize| self.pr_dangling_right(i1[k], j1[k], i2[k], j2[k]));
        let end_left = term(&|k: usize| self.e_end_left(i1[k], i2[k]));
        let end_right = term(&|k: usize| self.e_end_right(j1[k], j2[k]));

        std::array::from_fn(|k| {
            if !active[k] {
                return E_INF;
            }
            lanes.hybrid_e[k]
                + ed1[k]
                + ed2[k]
                + dangle_left[k] * pr_left[k]
                + dangle_right[k] * pr_right[k]
                + end_left[k]
                + end_right[k]
        })
    }

    /// Evaluates many candidate batches, in parallel when the `parallel`
    /// feature is enabled.
    #[instrument(skip_all, name = "total_energy_batch", fields(batches = lanes.len()))]
    fn total_energy_batch(&self, lanes: &[EnergyLanes]) -> Vec<[Energy; LANES]> {
        #[cfg(not(feature = "parallel"))]
        let iterator = lanes.iter();

        #[cfg(feature = "parallel")]
        let iterator = lanes.par_iter();

        iterator.map(|batch| self.total_energy_x4(batch)).collect()
    }

    /// Probability that the left neighbors `i1-1` and `i2-1` are unpaired
    /// given that `[i1, j1]` and `[i2, j2]` are unpaired. Missing neighbors
    /// contribute a factor of 1.
    fn pr_dangling_left(&self, i1: usize, j1: usize, i2: usize, j2: usize) -> Energy {
        let pr1 = if i1 > 0 {
            clamp_probability(self.boltzmann_weight(self.ed1(i1 - 1, j1) - self.ed1(i1, j1)))
        } else {
            1.0
        };
        let pr2 = if i2 > 0 {
            clamp_probability(self.boltzmann_weight(self.ed2(i2 - 1, j2) - self.ed2(i2, j2)))
        } else {
            1.0
        };
        pr1 * pr2
    }

    /// Probability that the right neighbors `j1+1` and `j2+1` are unpaired
    /// given that `[i1, j1]` and `[i2, j2]` are unpaired. Missing neighbors
    /// contribute a factor of 1.
    fn pr_dangling_right(&self, i1: usize, j1: usize, i2: usize, j2: usize) -> Energy {
        let pr1 = if j1 + 1 < self.size1() {
            clamp_probability(self.boltzmann_weight(self.ed1(i1, j1 + 1) - self.ed1(i1, j1)))
        } else {
            1.0
        };
        let pr2 = if j2 + 1 < self.size2() {
            clamp_probability(self.boltzmann_weight(self.ed2(i2, j2 + 1) - self.ed2(i2, j2)))
        } else {
            1.0
        };
        pr1 * pr2
    }

    #[inline]
    fn boltzmann_weight(&self, energy: Energy) -> Energy {
        (-energy / self.rt()).exp()
    }

    /// Checks whether `(i1, i2)` and `(j1, j2)` can close an intermolecular
    /// interior loop: both spans are non-empty, within bounds, free of
    /// ambiguous ends, no larger than the maximal loop sizes allow, and both
    /// boundary pairs are complementary.
    fn is_valid_internal_loop(&self, i1: usize, j1: usize, i2: usize, j2: usize) -> bool {
        j1 > i1
            && j2 > i2
            && is_allowed_loop_region(
                self.accessibility1().sequence(),
                i1,
                j1,
                self.max_internal_loop_size1(),
            )
            && is_allowed_loop_region(
                self.accessibility2().sequence(),
                i2,
                j2,
                self.max_internal_loop_size2(),
            )
            && self.are_complementary(i1, i2)
            && self.are_complementary(j1, j2)
    }

    /// Base pair of `seq1[i1]` and `seq2[i2]` (reversed index), with the
    /// second index converted to the original orientation.
    fn base_pair(&self, i1: usize, i2: usize) -> BasePair {
        BasePair::new(i1, self.accessibility2().reversed_index(i2))
    }

    fn index1(&self, bp: &BasePair) -> usize {
        bp.first
    }

    /// Index of the base pair within the reversed second sequence.
    fn index2(&self, bp: &BasePair) -> usize {
        self.accessibility2().reversed_index(bp.second)
    }

    /// Breaks the energy of an interaction down into its terms. The loop term
    /// is whatever remains of the interaction energy after all other terms.
    fn contributions(&self, interaction: &Interaction) -> EnergyContributions {
        let (Some(left), Some(right)) = (
            interaction.base_pairs.first(),
            interaction.base_pairs.last(),
        ) else {
            return EnergyContributions::default();
        };
        let (i1, j1) = (self.index1(left), self.index1(right));
        let (i2, j2) = (self.index2(left), self.index2(right));

        let mut contributions = EnergyContributions {
            loops: 0.0,
            init: self.e_init(),
            ed1: self.ed1(i1, j1),
            ed2: self.ed2(i2, j2),
            dangle_left: self.e_dangling_left(i1, i2) * self.pr_dangling_left(i1, j1, i2, j2),
            dangle_right: self.e_dangling_right(j1, j2) * self.pr_dangling_right(i1, j1, i2, j2),
            end_left: self.e_end_left(i1, i2),
            end_right: self.e_end_right(j1, j2),
        };
        contributions.loops = interaction.energy - contributions.without_loops();
        contributions
    }
}

/// Clamps to `[0, 1]`; NaN is mapped to 1.
#[inline]
fn clamp_probability(p: Energy) -> Energy {
    p.min(1.0).max(0.0)
}

fn is_allowed_loop_region(seq: &RnaSequence, i: usize, j: usize, max_loop_size: usize) -> bool {
    i < seq.len()
        && j < seq.len()
        && !seq.is_ambiguous(i)
        && !seq.is_ambiguous(j)
        && i <= j
        && (j - i) <= 1 + max_loop_size
}

fn check_region(sequence: u8, from: usize, to: usize, length: usize) -> Result<(), EnergyError> {
    if from > to || to >= length {
        return Err(EnergyError::InvalidRegion {
            sequence,
            from,
            to,
            length,
        });
    }
    Ok(())
}
