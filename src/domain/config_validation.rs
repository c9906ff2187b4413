//! Configuration validation.
//!
//! Validates the `[projection]` and `[market_data]` sections before they are
//! turned into parameters or adapters.

use crate::domain::error::CompounderError;
use crate::domain::frequency::Frequency;
use crate::ports::config_port::ConfigPort;

pub const PROVIDER_TWELVE_DATA: &str = "twelve_data";
pub const PROVIDER_CSV: &str = "csv";

pub fn validate_projection_config(config: &dyn ConfigPort) -> Result<(), CompounderError> {
    validate_non_negative(config, "initial_deposit")?;
    validate_non_negative(config, "contribution_amount")?;
    validate_years(config)?;
    validate_frequency(config, "compound_frequency")?;
    validate_frequency(config, "contribution_frequency")?;
    Ok(())
}

pub fn validate_market_data_config(config: &dyn ConfigPort) -> Result<(), CompounderError> {
    validate_provider(config)?;
    validate_output_size(config)?;
    validate_timeout(config)?;
    Ok(())
}

fn validate_non_negative(config: &dyn ConfigPort, key: &str) -> Result<(), CompounderError> {
    let value = config.get_double("projection", key, 0.0);
    if value < 0.0 || !value.is_finite() {
        return Err(CompounderError::ConfigInvalid {
            section: "projection".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be non-negative"),
        });
    }
    Ok(())
}

fn validate_years(config: &dyn ConfigPort) -> Result<(), CompounderError> {
    let value = config.get_int("projection", "years", 0);
    if value < 0 || value > u32::MAX as i64 {
        return Err(CompounderError::ConfigInvalid {
            section: "projection".to_string(),
            key: "years".to_string(),
            reason: "years must be a non-negative whole number".to_string(),
        });
    }
    Ok(())
}

fn validate_frequency(config: &dyn ConfigPort, key: &str) -> Result<(), CompounderError> {
    match config.get_string("projection", key) {
        None => Ok(()),
        Some(s) => s
            .parse::<Frequency>()
            .map(|_| ())
            .map_err(|_| CompounderError::ConfigInvalid {
                section: "projection".to_string(),
                key: key.to_string(),
                reason: format!("'{s}' is not Monthly or Annually"),
            }),
    }
}

fn validate_provider(config: &dyn ConfigPort) -> Result<(), CompounderError> {
    let provider = config
        .get_string("market_data", "provider")
        .unwrap_or_else(|| PROVIDER_TWELVE_DATA.to_string());
    match provider.trim() {
        PROVIDER_TWELVE_DATA => Ok(()),
        PROVIDER_CSV => match config.get_string("market_data", "data_dir") {
            Some(d) if !d.trim().is_empty() => Ok(()),
            _ => Err(CompounderError::ConfigMissing {
                section: "market_data".to_string(),
                key: "data_dir".to_string(),
            }),
        },
        other => Err(CompounderError::ConfigInvalid {
            section: "market_data".to_string(),
            key: "provider".to_string(),
            reason: format!("unknown provider '{other}'"),
        }),
    }
}

fn validate_output_size(config: &dyn ConfigPort) -> Result<(), CompounderError> {
    let value = config.get_int("market_data", "output_size", 1300);
    if value < 1 {
        return Err(CompounderError::ConfigInvalid {
            section: "market_data".to_string(),
            key: "output_size".to_string(),
            reason: "output_size must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), CompounderError> {
    let value = config.get_int("market_data", "timeout_secs", 10);
    if value < 1 {
        return Err(CompounderError::ConfigInvalid {
            section: "market_data".to_string(),
            key: "timeout_secs".to_string(),
            reason: "timeout_secs must be at least 1".to_string(),
        });
    }
    Ok(())
}
