//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod csv_export_adapter;
pub mod file_config_adapter;
pub mod memory_identity_adapter;
#[cfg(feature = "http")]
pub mod twelve_data_adapter;
