//! Receivers of predicted interactions.
//!
//! Prediction workers report every interaction they find to an [`OutputHandler`];
//! handlers are shared between workers and must tolerate concurrent calls.

pub mod interaction_list;

use crate::core::models::interaction::{Interaction, InteractionRange};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum OutputError {
    #[error("Operation not supported: {0}")]
    NotImplemented(&'static str),
}

pub trait OutputHandler: Send + Sync {
    /// Reports an interaction. Empty interactions are counted but not kept.
    fn add(&self, interaction: &Interaction);

    /// Reports the boundaries of an interaction without its base pairs.
    fn add_range(&self, range: &InteractionRange) -> Result<(), OutputError>;

    /// Number of interactions reported so far, including discarded ones.
    fn reported(&self) -> usize;
}
