pub mod evolution;
pub mod machine;
pub mod manager;
pub mod ranking;
pub mod traits;

pub use evolution::EvolutionConfig;
pub use machine::MachineConfig;
pub use manager::{AppConfig, ConfigManager};
pub use ranking::RankingConfig;
pub use traits::ConfigSection;
