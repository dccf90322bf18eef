//! Collaborator models consumed and produced by the energy engine and the
//! output handlers: RNA sequences, base pairs and interactions.

pub mod interaction;
pub mod sequence;
