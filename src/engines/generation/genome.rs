use crate::engines::evaluation::Evaluation;
use crate::engines::execution::Program;
use crate::types::{Fitness, GenomeId, ROOT_ID};
use serde::{Deserialize, Serialize};

/// Genome: the unit of selection.
///
/// A genome owns a candidate `Program` together with everything the search
/// learned about it when it was born:
/// - the output it printed (run once, never recomputed)
/// - its fitness, the edit distance from that output to the target
/// - its ancestry, as parent ids plus each parent's fitness *at breeding time*
///
/// # Why snapshot parent fitness?
///
/// Parents are routinely truncated out of the population while their children
/// survive. The lineage graph still needs the parent's fitness to weight the
/// child → parent edge, so it is copied into the child instead of looked up.
///
/// Only `rank` changes after creation; it is recomputed every generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    id: GenomeId,
    program: Program,
    output: String,
    fitness: Fitness,
    rank: f64,
    parents: Vec<GenomeId>,
    parent_fitness: Vec<Fitness>,
}

impl Genome {
    /// A randomly generated genome. Its only ancestor is the virtual root,
    /// recorded with the fitness of an empty output.
    pub fn seed(id: GenomeId, program: Program, evaluation: Evaluation, target_len: usize) -> Self {
        Self::with_lineage(id, program, evaluation, vec![ROOT_ID], vec![target_len])
    }

    /// A genome bred from `parents`, snapshotting their current fitness.
    pub fn offspring(
        id: GenomeId,
        program: Program,
        evaluation: Evaluation,
        parents: &[&Genome],
    ) -> Self {
        Self::with_lineage(
            id,
            program,
            evaluation,
            parents.iter().map(|p| p.id).collect(),
            parents.iter().map(|p| p.fitness).collect(),
        )
    }

    fn with_lineage(
        id: GenomeId,
        program: Program,
        evaluation: Evaluation,
        parents: Vec<GenomeId>,
        parent_fitness: Vec<Fitness>,
    ) -> Self {
        debug_assert_eq!(parents.len(), parent_fitness.len());
        Self {
            id,
            program,
            output: evaluation.output,
            fitness: evaluation.fitness,
            rank: evaluation.fitness as f64,
            parents,
            parent_fitness,
        }
    }

    pub fn id(&self) -> GenomeId {
        self.id
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    pub fn rank(&self) -> f64 {
        self.rank
    }

    pub(crate) fn set_rank(&mut self, rank: f64) {
        self.rank = rank;
    }

    pub fn parents(&self) -> &[GenomeId] {
        &self.parents
    }

    pub fn parent_fitness(&self) -> &[Fitness] {
        &self.parent_fitness
    }

    /// `(parent id, parent fitness at breeding time)` pairs.
    pub fn lineage(&self) -> impl Iterator<Item = (GenomeId, Fitness)> + '_ {
        self.parents
            .iter()
            .copied()
            .zip(self.parent_fitness.iter().copied())
    }

    pub fn is_seed(&self) -> bool {
        self.parents == [ROOT_ID]
    }

    pub fn is_solution(&self) -> bool {
        self.fitness == 0
    }
}
