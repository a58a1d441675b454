use super::traits::ConfigSection;
use crate::error::SerenityError;
use serde::{Deserialize, Serialize};

/// Smallest accepted tolerance. Below this the L1 change of a large graph
/// is dominated by rounding noise.
pub const MIN_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Blend lineage importance into the rank. When off, rank is fitness.
    pub enabled: bool,
    pub damping: f64,
    /// L1 change of the score vector below which power iteration stops.
    pub tolerance: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            damping: 0.85,
            tolerance: 1e-6,
        }
    }
}

impl ConfigSection for RankingConfig {
    fn section_name() -> &'static str {
        "ranking"
    }

    fn validate(&self) -> Result<(), SerenityError> {
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(SerenityError::Configuration(
                "Damping must be strictly between 0 and 1".to_string(),
            ));
        }
        if !(self.tolerance >= MIN_TOLERANCE && self.tolerance.is_finite()) {
            return Err(SerenityError::Configuration(format!(
                "Tolerance must be a finite number of at least {:e}",
                MIN_TOLERANCE
            )));
        }
        Ok(())
    }
}
