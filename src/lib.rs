pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod config;
pub mod error;
pub mod logging;

// Convenience re-exports
pub use activation::activation::{sigmoid, sigmoid_prime};
pub use config::{ResolvedConfig, RunConfig};
pub use error::{ConfigError, DatasetError, NetworkError, SnapshotError, TrainError};
pub use math::vector::{argmax, one_hot};
pub use network::network::{Classification, Network};
pub use network::snapshot::NetworkSnapshot;
pub use network::metadata::ModelMetadata;
pub use loss::mse::MseLoss;
pub use optim::sgd::Sgd;
pub use train::{train_loop, train_network, Dataset, EpochStats, TrainConfig};
