use serenity::config::{MachineConfig, RankingConfig};
use serenity::engines::evaluation::Evaluator;
use serenity::engines::execution::Program;
use serenity::engines::generation::{rank_population, Genome, LineageGraph};
use serenity::types::ROOT_ID;

fn evaluator() -> Evaluator {
    Evaluator::new("ab", MachineConfig::default())
}

/// A small family: two seeds, a mutant of the first and a cross of both.
fn family() -> Vec<Genome> {
    let evaluator = evaluator();
    let seed = |id, text: &str| {
        let program = Program::from(text);
        let evaluation = evaluator.evaluate(&program).unwrap();
        Genome::seed(id, program, evaluation, evaluator.target_len())
    };
    let first = seed(1, &("+".repeat(97) + "."));
    let second = seed(2, "+++.");

    let program = Program::from("+".repeat(97) + ".+.");
    let mutant = Genome::offspring(3, program.clone(), evaluator.evaluate(&program).unwrap(), &[&first]);

    let program = Program::from("+++.+.");
    let cross = Genome::offspring(
        4,
        program.clone(),
        evaluator.evaluate(&program).unwrap(),
        &[&first, &second],
    );
    vec![first, second, mutant, cross]
}

#[test]
fn test_fitness_and_snapshots() {
    let genomes = family();
    assert_eq!(genomes[0].fitness(), 1);
    assert_eq!(genomes[1].fitness(), 2);
    assert_eq!(genomes[2].fitness(), 0);
    assert_eq!(genomes[2].output(), "ab");

    assert!(genomes[0].is_seed());
    assert_eq!(genomes[0].parent_fitness(), &[2]);
    assert_eq!(genomes[3].parents(), &[1, 2]);
    assert_eq!(genomes[3].parent_fitness(), &[1, 2]);
    for genome in &genomes {
        assert_eq!(genome.parents().len(), genome.parent_fitness().len());
    }
}

#[test]
fn test_edge_weights_follow_fitness() {
    let genomes = family();
    let graph = LineageGraph::from_population(&genomes);

    // child -> parent uses the parent's snapshot, parent -> child the child's fitness
    assert_eq!(graph.weight(3, 1), Some(1.0 / 2.0));
    assert_eq!(graph.weight(1, 3), Some(1.0 / 1.0));
    assert_eq!(graph.weight(4, 2), Some(1.0 / 3.0));
    assert_eq!(graph.weight(1, ROOT_ID), Some(1.0 / 3.0));
    assert_eq!(graph.node_count(), 5);
}

#[test]
fn test_pruned_parents_remain_in_graph() {
    let genomes = family();
    let survivors = vec![genomes[3].clone()];
    let graph = LineageGraph::from_population(&survivors);
    assert!(graph.contains(1));
    assert!(graph.contains(2));
    assert_eq!(graph.weight(4, 1), Some(1.0 / 2.0));
}

#[test]
fn test_power_iteration_converges() {
    let graph = LineageGraph::from_population(&family());
    let pagerank = graph.rank(0.85, 1e-6);
    assert!(pagerank.delta <= 1e-6);
    assert!(pagerank.iterations > 0 && pagerank.iterations < 1000);
    assert!((pagerank.total() - 1.0).abs() < 1e-9);
    assert_eq!(pagerank.len(), graph.node_count());
}

#[test]
fn test_power_iteration_stops_at_rounding_noise() {
    // A wide family tree: every node links to a parent and back.
    let mut graph = LineageGraph::new();
    for id in 1..=1200u64 {
        let parent = id / 3;
        graph.link(id, parent, 1.0 / (id % 7 + 1) as f64);
        graph.link(parent, id, 1.0 / (id % 5 + 1) as f64);
    }

    for tolerance in [1e-15, 1e-300, 0.0] {
        let pagerank = graph.rank(0.85, tolerance);
        assert!(pagerank.iterations > 0 && pagerank.iterations < 10_000);
        assert!(pagerank.delta < 1e-9);
        assert!((pagerank.total() - 1.0).abs() < 1e-9);
    }

    let small = LineageGraph::from_population(&family()).rank(0.85, 0.0);
    assert!((small.total() - 1.0).abs() < 1e-9);
}

#[test]
fn test_power_iteration_is_repeatable() {
    let graph = LineageGraph::from_population(&family());
    let first = graph.rank(0.85, 1e-6);
    let second = graph.rank(0.85, 1e-6);
    assert_eq!(first, second);

    let rebuilt = LineageGraph::from_population(&family()).rank(0.85, 1e-6);
    assert_eq!(first, rebuilt);
}

#[test]
fn test_rank_is_fitness_minus_importance() {
    let mut genomes = family();
    let pagerank = rank_population(&mut genomes, &RankingConfig::default()).unwrap();
    for genome in &genomes {
        let expected = genome.fitness() as f64 - pagerank.score(genome.id()).unwrap();
        assert_eq!(genome.rank(), expected);
    }
    // Scores are below 1, so the exact match ranks ahead of everything.
    let best = genomes
        .iter()
        .min_by(|a, b| a.rank().total_cmp(&b.rank()))
        .unwrap();
    assert_eq!(best.id(), 3);
}

#[test]
fn test_rank_without_lineage_is_fitness() {
    let mut genomes = family();
    let config = RankingConfig {
        enabled: false,
        ..RankingConfig::default()
    };
    assert!(rank_population(&mut genomes, &config).is_none());
    for genome in &genomes {
        assert_eq!(genome.rank(), genome.fitness() as f64);
    }
}
