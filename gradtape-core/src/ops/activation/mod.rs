//! # Activation Functions
//!
//! Element-wise non-linearities. Each backward rule is written in terms of the produced
//! output `y` where that is cheaper than recomputing from the input.
//!
//! ## Currently Implemented:
//! - [`tanh`](tanh/fn.tanh_op.html): hyperbolic tangent.
//! - [`sig`](sigmoid/fn.sig_op.html): logistic sigmoid.
//! - [`relu`](relu/fn.relu_op.html): Rectified Linear Unit.

pub mod relu;
pub mod sigmoid;
pub mod tanh;

pub use relu::{relu_backward, relu_op};
pub use sigmoid::{sig_backward, sig_op};
pub use tanh::{tanh_backward, tanh_op};

#[cfg(test)]
#[path = "activation_test.rs"]
mod tests;
