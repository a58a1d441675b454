use super::traits::ConfigSection;
use crate::error::SerenityError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Maximum number of tape cells a run may address.
    pub tape_size: usize,
    /// Maximum number of instructions a run may execute.
    pub cycle_limit: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            tape_size: 1024 * 1024,
            cycle_limit: 1024 * 1024,
        }
    }
}

impl ConfigSection for MachineConfig {
    fn section_name() -> &'static str {
        "machine"
    }

    fn validate(&self) -> Result<(), SerenityError> {
        if self.tape_size == 0 {
            return Err(SerenityError::Configuration(
                "Tape size must be at least 1".to_string(),
            ));
        }
        if self.cycle_limit == 0 {
            return Err(SerenityError::Configuration(
                "Cycle limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
