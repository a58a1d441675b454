use super::{
    evolution::EvolutionConfig, machine::MachineConfig, ranking::RankingConfig,
    traits::ConfigSection,
};
use crate::error::SerenityError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix of environment overrides, e.g. `SERENITY_EVOLUTION__SEED=7`.
pub const ENV_PREFIX: &str = "SERENITY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub machine: MachineConfig,
    pub ranking: RankingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), SerenityError> {
        self.evolution.validate()?;
        self.machine.validate()?;
        self.ranking.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SerenityError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SerenityError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| SerenityError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    /// Loads defaults, then the optional file, then `SERENITY_*` environment
    /// overrides, in increasing priority.
    pub fn load_layered(&self, path: Option<&Path>) -> Result<(), SerenityError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }
        let layered = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = layered.try_deserialize()?;
        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SerenityError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| SerenityError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| SerenityError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `f` to a copy and only stores it if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), SerenityError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), SerenityError> {
        config.validate()?;
        log::debug!("Configuration accepted: {:?}", config);
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }
}
