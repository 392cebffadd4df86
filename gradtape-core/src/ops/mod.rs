//! # Matrix Operations Module (`ops`)
//!
//! Stateless primitive operations over [`Matrix`] values. Nothing in here touches a tape;
//! [`Graph`](crate::Graph) wraps these functions and records what it needs to replay them.
//!
//! ## Structure:
//!
//! - **`_op` functions** compute the forward result as a new `Matrix`. Inputs are never
//!   modified.
//! - **`_backward` functions** compute the adjoint contribution of one recorded operation
//!   for each operand, from the operands and the produced output (whose `dw` holds the
//!   upstream gradient). They return the contribution instead of writing it so that the
//!   caller can add it into operands that may alias each other (`eltmul(a, a)`).
//! - Dual-operand operations check shapes first and fail with
//!   [`TapeError::ShapeMismatch`] tagged with the operation name.
//!
//! ## Submodules:
//!
//! - [`activation`]: `tanh`, `sig`, `relu`.
//! - [`arithmetic`]: element-wise `add`, `eltmul`.
//! - [`linalg`]: matrix product `mul`, scalar product `dot`.
//! - [`indexing`]: `row_pluck`.
//! - [`noise`]: `gauss` (not differentiable).

use crate::error::TapeError;
use crate::matrix::Matrix;

pub mod activation;
pub mod arithmetic;
pub mod indexing;
pub mod linalg;
pub mod noise;

pub use activation::{relu_backward, relu_op, sig_backward, sig_op, tanh_backward, tanh_op};
pub use arithmetic::{add_backward, add_op, eltmul_backward, eltmul_op};
pub use indexing::{row_pluck_backward, row_pluck_op};
pub use linalg::{dot_backward, dot_op, mul_backward, mul_op};
pub use noise::gauss_op;

/// Fails unless `a` and `b` have identical shapes.
pub(crate) fn check_same_shape(operation: &str, a: &Matrix, b: &Matrix) -> Result<(), TapeError> {
    if a.shape() != b.shape() {
        return Err(TapeError::ShapeMismatch {
            operation: operation.to_string(),
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(())
}

/// Builds a matrix of `m`'s shape by applying `f` to every value.
pub(crate) fn map_elements(m: &Matrix, f: impl Fn(f64) -> f64) -> Matrix {
    let mut out = Matrix::zeros(m.rows(), m.cols());
    for (o, &x) in out.w_mut().iter_mut().zip(m.w()) {
        *o = f(x);
    }
    out
}
