//! INI file configuration adapter.

use crate::domain::error::CompounderError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CompounderError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| CompounderError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, CompounderError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| CompounderError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// An adapter with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn reads_projection_section() {
        let content = r#"
[projection]
initial_deposit = 2500.5
years = 20
compound_frequency = Annually
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_double("projection", "initial_deposit", 0.0), 2500.5);
        assert_eq!(adapter.get_int("projection", "years", 0), 20);
        assert_eq!(
            adapter.get_string("projection", "compound_frequency"),
            Some("Annually".to_string())
        );
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let adapter = FileConfigAdapter::from_string("[market_data]\n").unwrap();
        assert_eq!(adapter.get_string("market_data", "api_key"), None);
        assert_eq!(adapter.get_int("market_data", "output_size", 1300), 1300);
        assert_eq!(adapter.get_double("projection", "rate_of_return", 10.0), 10.0);
    }

    #[test]
    fn non_numeric_values_fall_back_to_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[projection]\nyears = ten\nrate_of_return = high\n")
                .unwrap();
        assert_eq!(adapter.get_int("projection", "years", 10), 10);
        assert_eq!(adapter.get_double("projection", "rate_of_return", 7.0), 7.0);
    }

    #[test]
    fn get_string_or_skips_blank_values() {
        let adapter =
            FileConfigAdapter::from_string("[market_data]\nprovider =   \nbase_url = http://x \n")
                .unwrap();
        assert_eq!(
            adapter.get_string_or("market_data", "provider", "twelve_data"),
            "twelve_data"
        );
        assert_eq!(adapter.get_string_or("market_data", "base_url", ""), "http://x");
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[market_data]\ndata_dir = /tmp/prices\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("market_data", "data_dir"),
            Some("/tmp/prices".to_string())
        );
    }

    #[test]
    fn from_file_reports_missing_file() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/compounder.ini").unwrap_err();
        assert!(matches!(err, CompounderError::ConfigParse { file, .. } if file.contains("compounder.ini")));
    }

    #[test]
    fn empty_adapter_has_no_values() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("projection", "years"), None);
    }
}
