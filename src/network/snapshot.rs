use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{NetworkError, SnapshotError};
use crate::network::metadata::ModelMetadata;
use crate::network::network::Network;

/// Everything needed to restore a trained network exactly.
///
/// `dimension` is stored bias-augmented, the same way the network holds it;
/// the flat-index tables are derived from it on restore and are not saved.
/// Forward/backward caches and momentum velocity are transient and dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub dimension: Vec<usize>,
    pub weights: Vec<Vec<f64>>,
    pub learning_rate: f64,
    #[serde(default)]
    pub momentum: f64,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl NetworkSnapshot {
    /// Serializes the snapshot to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a snapshot from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<NetworkSnapshot, SnapshotError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Network {
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            dimension: self.dimension().to_vec(),
            weights: self.weights().to_vec(),
            learning_rate: self.learning_rate,
            momentum: self.momentum,
            metadata: self.metadata.clone(),
        }
    }

    /// Rebuilds a network from a snapshot, validating its shapes.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Network, NetworkError> {
        let mut network = Network::default();
        network.learning_rate = snapshot.learning_rate;
        network.momentum = snapshot.momentum;
        network.metadata = snapshot.metadata;
        network.set_parameters(snapshot.dimension, snapshot.weights)?;
        Ok(network)
    }

    /// Writes the network's snapshot as pretty-printed JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        self.snapshot().save_json(path)?;
        info!(path = %path.display(), weights = self.weight_count(), "saved network");
        Ok(())
    }

    /// Restores a network previously written by [`Network::save_json`].
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network, SnapshotError> {
        let path = path.as_ref();
        let network = Network::from_snapshot(NetworkSnapshot::load_json(path)?)?;
        info!(path = %path.display(), dimension = ?network.dimension(), "loaded network");
        Ok(network)
    }
}
