pub mod activation;

pub use activation::{activate_layer, sigmoid, sigmoid_prime};
