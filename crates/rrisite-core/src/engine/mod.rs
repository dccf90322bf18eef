//! # Engine Module
//!
//! Stateful services used while a prediction runs.
//!
//! - **Configuration** ([`config`]) - energy model, output and window settings, TOML loading
//! - **Window Planning** ([`windows`]) - splitting long sequences into overlapping window pairs
//! - **Result Collection** ([`output`]) - thread-safe handlers receiving predicted interactions

pub mod config;
pub mod output;
pub mod windows;
