//! Linear algebra: matrix product (`mul`) and scalar product (`dot`).

pub mod dot;
pub mod matmul;

pub use dot::{dot_backward, dot_op};
pub use matmul::{mul_backward, mul_op};

#[cfg(test)]
#[path = "linalg_test.rs"]
mod tests;
