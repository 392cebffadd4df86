//! A small reverse-mode automatic differentiation engine over dense `f64` matrices.
//!
//! Forward operations issued through a [`Graph`] compute their result into an [`Arena`]
//! and, while recording is on, push a [`BackwardOp`] onto the tape. Replaying the tape in
//! reverse accumulates gradients into every operand's `dw` buffer, after which an
//! [`RmsPropSolver`] (or plain [`Module::update`]) consumes them.

pub mod arena;
pub mod autograd;
pub mod error;
pub mod matrix;
pub mod nn;
pub mod ops;
pub mod optim;
pub mod rng;

pub use arena::{Arena, Checkpoint, MatrixId};
pub use autograd::{BackwardOp, Graph};
pub use error::TapeError;
pub use matrix::{Matrix, MatrixRecord};
pub use nn::Module;
pub use optim::{RmsPropSolver, SolverConfig, SolverStats};
pub use rng::NormalSampler;
