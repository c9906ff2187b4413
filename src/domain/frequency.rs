//! Compounding and contribution frequency.

use crate::domain::error::CompounderError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Frequency {
    Monthly,
    Annually,
}

impl Frequency {
    /// Number of periods in one year.
    pub fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Monthly => 12,
            Frequency::Annually => 1,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Monthly => write!(f, "Monthly"),
            Frequency::Annually => write!(f, "Annually"),
        }
    }
}

impl FromStr for Frequency {
    type Err = CompounderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(Frequency::Monthly),
            "annually" | "annual" => Ok(Frequency::Annually),
            other => Err(CompounderError::invalid_input(
                "frequency",
                format!("unrecognised frequency '{other}' (expected Monthly or Annually)"),
            )),
        }
    }
}
