use crate::config::{AppConfig, EvolutionConfig, RankingConfig};
use crate::engines::evaluation::{Evaluation, Evaluator};
use crate::engines::execution::{Op, Program};
use crate::engines::generation::{
    genome::Genome,
    lineage::rank_population,
    operators::{breed, delete_gene, insert_gene, random_program, update_gene, Crossover},
};
use crate::error::{Result, SerenityError};
use crate::types::{Fitness, GenomeId};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_rank: f64, best_fitness: Fitness);
    fn on_genomes_evaluated(&mut self, evaluated: usize, population: usize);
}

impl<T: ProgressCallback + ?Sized> ProgressCallback for &mut T {
    fn on_generation_start(&mut self, generation: usize) {
        (**self).on_generation_start(generation);
    }

    fn on_generation_complete(&mut self, generation: usize, best_rank: f64, best_fitness: Fitness) {
        (**self).on_generation_complete(generation, best_rank, best_fitness);
    }

    fn on_genomes_evaluated(&mut self, evaluated: usize, population: usize) {
        (**self).on_genomes_evaluated(evaluated, population);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// A genome printed the target exactly.
    Solved,
    /// The generation budget ran out first.
    Exhausted,
}

/// Best genome of one generation, taken after ranking and before truncation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub best_id: GenomeId,
    pub best_rank: f64,
    pub best_fitness: Fitness,
    pub population: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    /// Generations run; 0 when the initial population already contained a match.
    pub generations: usize,
    /// The winner when solved, otherwise the best-ranked genome.
    pub best: Genome,
    pub history: Vec<GenerationSummary>,
}

impl RunReport {
    pub fn is_solved(&self) -> bool {
        self.status == RunStatus::Solved
    }
}

/// Child programs of one expansion step together with the population
/// indices of their parents.
#[derive(Default)]
struct Brood {
    programs: Vec<Program>,
    parents: Vec<Vec<usize>>,
}

impl Brood {
    fn push(&mut self, program: Program, parents: Vec<usize>) {
        self.programs.push(program);
        self.parents.push(parents);
    }
}

/// Drives the search: expand, score, rank, select, until a genome prints the
/// target or the generation budget is spent.
///
/// All random draws come from one seeded `StdRng` and happen on the calling
/// thread, so a seed fixes the whole run. Scoring may run on the rayon pool;
/// it is a pure function of the program and results are collected in order.
pub struct EvolutionEngine {
    evolution: EvolutionConfig,
    ranking: RankingConfig,
    evaluator: Evaluator,
    population: Vec<Genome>,
    rng: StdRng,
    next_id: GenomeId,
}

impl EvolutionEngine {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let AppConfig {
            evolution,
            machine,
            ranking,
        } = config;

        Ok(Self {
            evaluator: Evaluator::new(&evolution.target, machine),
            rng: StdRng::seed_from_u64(evolution.seed),
            population: Vec::with_capacity(evolution.population_size),
            next_id: 1,
            evolution,
            ranking,
        })
    }

    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<RunReport> {
        info!(
            "Initializing population of size {} for target {:?} (seed {})",
            self.evolution.population_size, self.evolution.target, self.evolution.seed
        );

        let mut history = Vec::new();

        callback.on_generation_start(0);
        self.initialize_population()?;
        self.rank_and_sort();
        let summary = self.summarize(0)?;
        callback.on_generation_complete(0, summary.best_rank, summary.best_fitness);
        history.push(summary);
        if let Some(winner) = self.find_solution() {
            return Ok(self.finish(RunStatus::Solved, 0, winner, history));
        }
        self.population.truncate(self.evolution.population_size);

        for generation in 1..=self.evolution.max_generations {
            callback.on_generation_start(generation);

            let members = self.population.len();
            let children = self.expand()?;
            callback.on_genomes_evaluated(children.len(), members);
            self.population.extend(children);

            self.rank_and_sort();
            let summary = self.summarize(generation)?;
            callback.on_generation_complete(generation, summary.best_rank, summary.best_fitness);
            history.push(summary);

            if let Some(winner) = self.find_solution() {
                return Ok(self.finish(RunStatus::Solved, generation, winner, history));
            }

            self.population.truncate(self.evolution.population_size);
        }

        warn!(
            "No exact match after {} generations",
            self.evolution.max_generations
        );
        let best = self.best()?.clone();
        Ok(self.finish(
            RunStatus::Exhausted,
            self.evolution.max_generations,
            best,
            history,
        ))
    }

    /// Fill the population with random programs. Seeds descend from the
    /// virtual root only.
    pub fn initialize_population(&mut self) -> Result<()> {
        let programs: Vec<Program> = (0..self.evolution.population_size)
            .map(|_| random_program(&mut self.rng, self.evolution.max_block_depth))
            .collect();
        let evaluations = self.evaluate_all(&programs)?;
        let target_len = self.evaluator.target_len();

        let mut seeds = Vec::with_capacity(programs.len());
        for (program, evaluation) in programs.into_iter().zip(evaluations) {
            let id = self.allocate_id();
            seeds.push(Genome::seed(id, program, evaluation, target_len));
        }
        self.population = seeds;
        Ok(())
    }

    /// Breeds one generation of children from the current population.
    ///
    /// Every member is expanded through insert and update (one child per
    /// gene each) and delete; then `crossover_pairs` pairs drawn from the
    /// `crossover_pool` best-ranked members are bred. The population itself
    /// is left untouched.
    pub fn expand(&mut self) -> Result<Vec<Genome>> {
        let mut brood = Brood::default();
        let population = &self.population;
        let rng = &mut self.rng;

        for (j, genome) in population.iter().enumerate() {
            let parent = genome.program();
            for gene in Op::GENES {
                brood.push(insert_gene(parent, gene.symbol(), rng), vec![j]);
            }
            for gene in Op::GENES {
                if let Some(child) = update_gene(parent, gene.symbol(), rng) {
                    brood.push(child, vec![j]);
                }
            }
            if let Some(child) = delete_gene(parent, rng) {
                brood.push(child, vec![j]);
            }
        }

        let pool = self.evolution.crossover_pool.min(population.len());
        if pool > 0 {
            for _ in 0..self.evolution.crossover_pairs {
                let a = rng.gen_range(0..pool);
                let b = rng.gen_range(0..pool);
                let Crossover { x, y, .. } =
                    breed(population[a].program(), population[b].program(), rng);
                brood.push(x, vec![a, b]);
                brood.push(y, vec![a, b]);
            }
        }

        let evaluations = self.evaluate_all(&brood.programs)?;
        debug!(
            "Expanded {} members into {} children",
            self.population.len(),
            evaluations.len()
        );

        let mut children = Vec::with_capacity(evaluations.len());
        for ((program, parents), evaluation) in brood
            .programs
            .into_iter()
            .zip(brood.parents)
            .zip(evaluations)
        {
            let parents: Vec<&Genome> = parents.iter().map(|&i| &self.population[i]).collect();
            let id = self.next_id;
            self.next_id += 1;
            children.push(Genome::offspring(id, program, evaluation, &parents));
        }
        Ok(children)
    }

    fn evaluate_all(&self, programs: &[Program]) -> Result<Vec<Evaluation>> {
        let evaluator = &self.evaluator;
        if self.evolution.parallel_evaluation {
            programs
                .par_iter()
                .map_init(
                    || evaluator.new_machine(),
                    |vm, program| evaluator.evaluate_with(vm, program),
                )
                .collect()
        } else {
            let mut vm = evaluator.new_machine();
            programs
                .iter()
                .map(|program| evaluator.evaluate_with(&mut vm, program))
                .collect()
        }
    }

    /// Recompute ranks from a fresh lineage graph and stable-sort ascending.
    fn rank_and_sort(&mut self) {
        rank_population(&mut self.population, &self.ranking);
        self.population
            .sort_by(|a, b| a.rank().total_cmp(&b.rank()));
    }

    fn find_solution(&self) -> Option<Genome> {
        self.population.iter().find(|g| g.is_solution()).cloned()
    }

    fn best(&self) -> Result<&Genome> {
        self.population.first().ok_or_else(|| {
            SerenityError::Configuration("population is empty".to_string())
        })
    }

    fn summarize(&self, generation: usize) -> Result<GenerationSummary> {
        let best = self.best()?;
        Ok(GenerationSummary {
            generation,
            best_id: best.id(),
            best_rank: best.rank(),
            best_fitness: best.fitness(),
            population: self.population.len(),
        })
    }

    fn allocate_id(&mut self) -> GenomeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn finish(
        &self,
        status: RunStatus,
        generations: usize,
        best: Genome,
        history: Vec<GenerationSummary>,
    ) -> RunReport {
        match status {
            RunStatus::Solved => info!(
                "Solved in {} generations: genome {} (rank {:.6}) printed {:?}",
                generations,
                best.id(),
                best.rank(),
                best.output()
            ),
            RunStatus::Exhausted => info!(
                "Best after {} generations: genome {} with fitness {}",
                generations,
                best.id(),
                best.fitness()
            ),
        }
        RunReport {
            status,
            generations,
            best,
            history,
        }
    }
}
