pub mod matrix;
pub mod vector;

pub use matrix::{random_weights, MatrixView};
pub use vector::{argmax, one_hot};
