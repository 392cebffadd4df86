//! Tape-based reverse-mode differentiation.
//!
//! - [`graph`]: the [`Graph`] recorder/replayer.
//! - [`backward_op`]: the tagged [`BackwardOp`] records kept on the tape and their
//!   central replay dispatcher.
//! - [`grad_check`]: finite-difference verification of backward rules.

pub mod backward_op;
pub mod grad_check;
pub mod graph;

pub use backward_op::BackwardOp;
pub use graph::Graph;
