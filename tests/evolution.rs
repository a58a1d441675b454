use serenity::config::{AppConfig, EvolutionConfig, MachineConfig, RankingConfig};
use serenity::engines::evaluation::{edit_distance_str, Evaluator};
use serenity::engines::execution::Program;
use serenity::engines::generation::{
    ChannelProgressCallback, EvolutionEngine, ProgressCallback, ProgressMessage, RunStatus,
};
use std::collections::HashSet;
use std::sync::mpsc::channel;

/// Records the best fitness of every generation.
struct TestProgressCallback {
    best_fitness: Vec<usize>,
}

impl ProgressCallback for TestProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, generation: usize, best_rank: f64, best_fitness: usize) {
        println!(
            "Generation {}: best rank = {:.6}, best fitness = {}",
            generation, best_rank, best_fitness
        );
        self.best_fitness.push(best_fitness);
    }

    fn on_genomes_evaluated(&mut self, _evaluated: usize, _population: usize) {}
}

fn callback() -> TestProgressCallback {
    TestProgressCallback {
        best_fitness: Vec::new(),
    }
}

/// Small budgets keep looping candidates cheap.
fn create_test_config(target: &str, population_size: usize, max_generations: usize) -> AppConfig {
    AppConfig {
        evolution: EvolutionConfig {
            target: target.to_string(),
            population_size,
            max_generations,
            seed: 1,
            ..EvolutionConfig::default()
        },
        machine: MachineConfig {
            tape_size: 4096,
            cycle_limit: 16 * 1024,
        },
        ranking: RankingConfig::default(),
    }
}

#[test]
fn test_empty_program_fitness_is_target_length() {
    for target in ["a", "ab", "abcd", "Hello World!"] {
        let evaluator = Evaluator::new(target, MachineConfig::default());
        let evaluation = evaluator.evaluate(&Program::default()).unwrap();
        assert_eq!(evaluation.output, "");
        assert_eq!(evaluation.fitness, target.chars().count());
    }
}

#[test]
fn test_evolution_finds_ab() {
    let config = AppConfig {
        evolution: EvolutionConfig {
            target: "ab".to_string(),
            population_size: 64,
            max_generations: 128,
            seed: 1,
            ..EvolutionConfig::default()
        },
        ..AppConfig::default()
    };
    let mut engine = EvolutionEngine::new(config).unwrap();
    let report = engine.run(callback()).unwrap();

    println!(
        "Solved in {} generations: {} -> {:?}",
        report.generations,
        report.best.program(),
        report.best.output()
    );
    assert_eq!(report.status, RunStatus::Solved);
    assert!(report.generations <= 128);
    assert_eq!(report.best.fitness(), 0);
    assert_eq!(report.best.output(), "ab");

    // The winner reproduces its output when run again.
    let evaluation = engine.evaluator().evaluate(report.best.program()).unwrap();
    assert_eq!(evaluation.output, "ab");
    assert_eq!(evaluation.fitness, 0);
}

#[test]
fn test_same_seed_same_run() {
    let config = create_test_config("ab", 32, 30);
    let first = EvolutionEngine::new(config.clone())
        .unwrap()
        .run(callback())
        .unwrap();
    let second = EvolutionEngine::new(config).unwrap().run(callback()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parallel_scoring_matches_sequential() {
    let mut config = create_test_config("ab", 32, 15);
    config.evolution.parallel_evaluation = true;
    let parallel = EvolutionEngine::new(config.clone())
        .unwrap()
        .run(callback())
        .unwrap();

    config.evolution.parallel_evaluation = false;
    let sequential = EvolutionEngine::new(config).unwrap().run(callback()).unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_exhaustion_reports_best_found() {
    let config = create_test_config("Hello, evolution!", 16, 3);
    let mut engine = EvolutionEngine::new(config).unwrap();
    let mut progress = callback();
    let report = engine.run(&mut progress).unwrap();

    assert_eq!(report.status, RunStatus::Exhausted);
    assert_eq!(report.generations, 3);
    assert_eq!(report.history.len(), 4);
    assert_eq!(progress.best_fitness.len(), 4);
    assert_eq!(report.best.id(), engine.population()[0].id());
    assert_eq!(engine.population().len(), 16);
}

#[test]
fn test_population_invariants_hold() {
    let config = create_test_config("abc", 24, 10);
    let target = config.evolution.target.clone();
    let mut engine = EvolutionEngine::new(config).unwrap();
    engine.run(callback()).unwrap();

    let mut ids = HashSet::new();
    for genome in engine.population() {
        assert!(ids.insert(genome.id()), "duplicate id {}", genome.id());
        assert_eq!(genome.parents().len(), genome.parent_fitness().len());
        assert!(genome.output().chars().count() <= target.chars().count());
        assert_eq!(genome.fitness(), edit_distance_str(genome.output(), &target));
    }

    let ranks: Vec<f64> = engine.population().iter().map(|g| g.rank()).collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_expand_breeds_every_member() {
    let config = create_test_config("ab", 8, 1);
    let mut engine = EvolutionEngine::new(config).unwrap();
    engine.initialize_population().unwrap();
    let max_id = engine.population().iter().map(|g| g.id()).max().unwrap();
    let members: HashSet<u64> = engine.population().iter().map(|g| g.id()).collect();

    let children = engine.expand().unwrap();
    let single_parent = children.iter().filter(|c| c.parents().len() == 1).count();
    let two_parents = children.iter().filter(|c| c.parents().len() == 2).count();

    // 7 inserts always, up to 7 updates and 1 delete per member
    assert!(single_parent >= 8 * 7 && single_parent <= 8 * 15);
    assert_eq!(two_parents, 2 * 10);
    for child in &children {
        assert!(child.id() > max_id);
        assert!(child.parents().iter().all(|p| members.contains(p)));
    }
    assert_eq!(engine.population().len(), 8);
}

#[test]
fn test_ranking_disabled_selects_on_fitness() {
    let mut config = create_test_config("ab", 16, 5);
    config.ranking.enabled = false;
    let mut engine = EvolutionEngine::new(config).unwrap();
    engine.run(callback()).unwrap();
    for genome in engine.population() {
        assert_eq!(genome.rank(), genome.fitness() as f64);
    }
}

#[test]
fn test_channel_progress() {
    let (sender, receiver) = channel();
    let config = create_test_config("Hello!", 8, 2);
    let mut engine = EvolutionEngine::new(config).unwrap();
    let report = engine.run(ChannelProgressCallback::new(sender)).unwrap();

    let messages: Vec<ProgressMessage> = receiver.try_iter().collect();
    assert_eq!(messages.first(), Some(&ProgressMessage::GenerationStart(0)));
    let completed = messages
        .iter()
        .filter(|m| matches!(m, ProgressMessage::GenerationComplete { .. }))
        .count();
    assert_eq!(completed, report.history.len());
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = create_test_config("", 8, 1);
    assert!(EvolutionEngine::new(config.clone()).is_err());
    config.evolution.target = "ab".to_string();
    config.ranking.damping = 1.5;
    assert!(EvolutionEngine::new(config).is_err());
}
