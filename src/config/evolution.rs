use super::traits::ConfigSection;
use crate::error::SerenityError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// String the evolved program must print.
    pub target: String,
    pub population_size: usize,
    pub max_generations: usize,
    /// Crossover pairs bred per generation.
    pub crossover_pairs: usize,
    /// Parents for crossover are drawn from this many top-ranked genomes.
    pub crossover_pool: usize,
    /// Nesting limit for `[...]` blocks in randomly generated programs.
    pub max_block_depth: usize,
    pub seed: u64,
    /// Score children on the rayon pool. Results are identical either way.
    pub parallel_evaluation: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            target: "abcd".to_string(),
            population_size: 64,
            max_generations: 1024,
            crossover_pairs: 10,
            crossover_pool: 10,
            max_block_depth: 4,
            seed: 1,
            parallel_evaluation: true,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), SerenityError> {
        if self.target.is_empty() {
            return Err(SerenityError::Configuration(
                "Target must not be empty".to_string(),
            ));
        }
        if self.population_size == 0 {
            return Err(SerenityError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        if self.crossover_pairs > 0 && self.crossover_pool == 0 {
            return Err(SerenityError::Configuration(
                "Crossover pool must be at least 1 when crossover is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
