//! # Core Module
//!
//! Stateless models and formulas shared by every prediction.
//!
//! - **Index Bookkeeping** ([`range`]) - inclusive index ranges, sorted range lists, windows
//! - **Molecular Representation** ([`models`]) - RNA sequences, base pairs and interactions
//! - **Accessibility Data** ([`accessibility`]) - ED/ES providers and positional constraints
//! - **Energy Evaluation** ([`energy`]) - the interaction energy model and its terms
//!
//! Energies are given in kcal/mol. An energy of [`energy::E_INF`] marks an impossible
//! configuration and propagates through every sum.

pub mod accessibility;
pub mod energy;
pub mod models;
pub mod range;
