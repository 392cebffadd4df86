//! Element-wise arithmetic between two matrices of identical shape.

pub mod add;
pub mod eltmul;

pub use add::{add_backward, add_op};
pub use eltmul::{eltmul_backward, eltmul_op};

#[cfg(test)]
#[path = "arithmetic_test.rs"]
mod tests;
