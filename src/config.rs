use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::network::topology::validate_topology;

pub const DEFAULT_TOPOLOGY: [usize; 3] = [2, 3, 1];
pub const DEFAULT_LEARNING_RATE: f64 = 0.5;
pub const DEFAULT_EPOCHS: usize = 5000;
pub const DEFAULT_LOG_EVERY: usize = 500;

/// Run configuration read from a JSON file. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Neuron count per layer, bias excluded.
    pub topology: Option<Vec<usize>>,
    pub learning_rate: Option<f64>,
    pub momentum: Option<f64>,
    pub epochs: Option<usize>,
    /// Seeds weight initialization and per-epoch shuffling.
    pub seed: Option<u64>,
    pub log_every: Option<usize>,
}

/// A `RunConfig` with defaults filled in and values checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub topology: Vec<usize>,
    pub learning_rate: f64,
    pub momentum: f64,
    pub epochs: usize,
    pub seed: Option<u64>,
    pub log_every: usize,
}

impl RunConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<RunConfig, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    // merge configs where the second overwrites the first
    pub fn merge(self, other: Self) -> Self {
        Self {
            topology: other.topology.or(self.topology),
            learning_rate: other.learning_rate.or(self.learning_rate),
            momentum: other.momentum.or(self.momentum),
            epochs: other.epochs.or(self.epochs),
            seed: other.seed.or(self.seed),
            log_every: other.log_every.or(self.log_every),
        }
    }

    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        let topology = self.topology.unwrap_or_else(|| DEFAULT_TOPOLOGY.to_vec());
        validate_topology(&topology).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let learning_rate = self.learning_rate.unwrap_or(DEFAULT_LEARNING_RATE);
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "learning_rate must be positive, got {learning_rate}"
            )));
        }
        let momentum = self.momentum.unwrap_or(0.0);
        if !(0.0..1.0).contains(&momentum) {
            return Err(ConfigError::Invalid(format!("momentum must be in [0, 1), got {momentum}")));
        }

        Ok(ResolvedConfig {
            topology,
            learning_rate,
            momentum,
            epochs: self.epochs.unwrap_or(DEFAULT_EPOCHS),
            seed: self.seed,
            log_every: self.log_every.unwrap_or(DEFAULT_LOG_EVERY),
        })
    }
}
