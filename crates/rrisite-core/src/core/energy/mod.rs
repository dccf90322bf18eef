//! # Energy Module
//!
//! Free-energy evaluation of RNA-RNA interaction sites.
//!
//! The [`interaction_energy::InteractionEnergy`] trait composes the accessibility
//! penalties (ED) of both sequences with the loop, dangling end and helix end
//! terms of a concrete energy model into the overall interaction energy. A
//! concrete model only supplies those terms; everything else is provided.
//!
//! - [`interaction_energy`] - the shared scoring formulas and the 4-lane batch variant
//! - [`base_pair`] - a minimal model that scores interactions by counted base pairs
//! - [`contributions`] - the breakdown of a total energy into its terms
//!
//! Energies are given in kcal/mol. [`E_INF`] marks energies of structures that
//! cannot form; it propagates through every sum instead of raising an error.

pub mod base_pair;
pub mod contributions;
pub mod interaction_energy;

/// Free energy value type.
pub type Energy = f64;

/// Energy of non-formable structures.
pub const E_INF: Energy = Energy::INFINITY;

#[inline]
pub fn e_is_inf(e: Energy) -> bool {
    e == E_INF
}

#[inline]
pub fn e_is_not_inf(e: Energy) -> bool {
    e != E_INF
}
