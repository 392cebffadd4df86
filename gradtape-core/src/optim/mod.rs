//! Parameter update rules.
//!
//! [`RmsPropSolver`] is the training-time solver: RMSprop with per-name squared-gradient
//! caches, element-wise gradient clipping and L2 decay. Plain gradient descent is
//! available without a solver through [`crate::nn::Module::update`].

pub mod grad_clipping;
pub mod rmsprop;

pub use grad_clipping::clip_grad_value;
pub use rmsprop::{RmsPropSolver, SolverConfig, SolverStats};
