//! Core domain types and logic.

pub mod alignment;
pub mod comparison;
pub mod config_validation;
pub mod error;
pub mod frequency;
pub mod identity;
pub mod price_series;
pub mod projection;
