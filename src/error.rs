use thiserror::Error;

/// Failures raised by the network engine itself.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("invalid number of inputs: got {actual}, expected {expected} (bias slot excluded)")]
    InvalidInputs { expected: usize, actual: usize },

    #[error("invalid number of outputs given in answer: got {actual}, expected {expected}")]
    InvalidAnswer { expected: usize, actual: usize },

    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("back_prop called without a forward pass for the current topology")]
    MissingForwardPass,
}

impl NetworkError {
    /// True for the two vector-length mismatches raised by `predict` and `back_prop`.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            NetworkError::InvalidInputs { .. } | NetworkError::InvalidAnswer { .. }
        )
    }
}

/// Failures while writing or restoring a network snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Failures raised by the training drivers before or during an epoch.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("training set is empty")]
    EmptyDataset,

    #[error("{inputs} input samples but {targets} targets")]
    LengthMismatch { inputs: usize, targets: usize },

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Failures while reading a training-set file.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while loading or validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
