pub mod evolution_engine;
pub mod genome;
pub mod lineage;
pub mod operators;
pub mod progress;

pub use evolution_engine::{
    EvolutionEngine, GenerationSummary, ProgressCallback, RunReport, RunStatus,
};
pub use genome::Genome;
pub use lineage::{rank_population, LineageGraph, PageRank};
pub use progress::{
    ChannelProgressCallback, ConsoleProgressCallback, ProgressMessage, SilentProgressCallback,
};
