//! compounder: compound-interest projections and stock price comparison.
//!
//! Hexagonal architecture: pure computations in [`domain`], collaborator
//! traits in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod dashboard;
pub mod cli;
