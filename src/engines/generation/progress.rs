use super::evolution_engine::ProgressCallback;
use std::sync::mpsc::Sender;

/// Logs one line per generation.
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting...", generation);
    }

    fn on_generation_complete(&mut self, generation: usize, best_rank: f64, best_fitness: usize) {
        log::info!(
            "Generation {} complete. Best rank: {:.6}, best fitness: {}",
            generation, best_rank, best_fitness
        );
    }

    fn on_genomes_evaluated(&mut self, evaluated: usize, population: usize) {
        log::debug!("  Evaluated {} children from {} members", evaluated, population);
    }
}

/// Discards all progress.
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _generation: usize, _best_rank: f64, _best_fitness: usize) {}
    fn on_genomes_evaluated(&mut self, _evaluated: usize, _population: usize) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete { generation: usize, best_rank: f64, best_fitness: usize },
    GenomesEvaluated { evaluated: usize, population: usize },
}

/// Forwards progress to another thread, e.g. a run started with
/// `std::thread::spawn`.
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, generation: usize, best_rank: f64, best_fitness: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation,
            best_rank,
            best_fitness,
        });
    }

    fn on_genomes_evaluated(&mut self, evaluated: usize, population: usize) {
        let _ = self.sender.send(ProgressMessage::GenomesEvaluated {
            evaluated,
            population,
        });
    }
}
