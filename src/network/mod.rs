pub mod metadata;
pub mod network;
pub mod snapshot;
pub mod topology;

pub use metadata::ModelMetadata;
pub use network::{Classification, Network};
pub use snapshot::NetworkSnapshot;
