//! # rrisite
//!
//! Building blocks for RNA-RNA interaction prediction: index range bookkeeping, the
//! interaction energy model, and a concurrent store for the best predicted interactions.
//!
//! ## Architecture
//!
//! The library follows a two-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (index ranges, sequences,
//!   interactions), read-only accessibility providers, and the energy model whose shared
//!   formulas compose model-specific terms into overall interaction energies.
//!
//! - **[`engine`]: The Prediction Services.** Stateful components used while a prediction
//!   runs: the prediction configuration, window planning over the sequences, and the
//!   output handlers collecting the best interactions from concurrent producers.
//!
//! The search itself (seed detection, dynamic programming) is not part of this crate; it
//! consumes the energy model and reports into an output handler.

pub mod core;
pub mod engine;
