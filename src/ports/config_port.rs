//! Configuration access port trait.
//!
//! Sections are `[projection]` and `[market_data]`; lookups never fail; a
//! missing or unparsable value yields `None` or the supplied default.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// Trimmed string value, or `default` when missing or blank.
    fn get_string_or(&self, section: &str, key: &str, default: &str) -> String {
        self.get_string(section, key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}
