//! Core compute primitives (Vector, Matrix).
//!
//! These types carry feature matrices, targets, predictions and
//! class-probability matrices through the scoring engine.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
