//! Port traits for the collaborators the core depends on.

pub mod config_port;
pub mod export_port;
pub mod identity_port;
pub mod market_data_port;
