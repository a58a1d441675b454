/// Identifier of a genome, unique for the lifetime of a run.
pub type GenomeId = u64;

/// Virtual ancestor of every randomly generated genome. Real genomes are
/// numbered from 1.
pub const ROOT_ID: GenomeId = 0;

/// Edit distance between a genome's output and the target. 0 is a match.
pub type Fitness = usize;
