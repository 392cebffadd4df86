use crate::arena::{Arena, MatrixId};
use crate::error::TapeError;
use crate::ops;

/// One recorded operation on the tape.
///
/// A record holds the operation kind plus the handles of its operands and of the
/// output it produced. Nothing else is captured: the forward values and the upstream
/// gradient are read from the arena when the record is replayed.
///
/// `gauss` has no variant because noise injection is never differentiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackwardOp {
    RowPluck { m: MatrixId, row: usize, out: MatrixId },
    Tanh { m: MatrixId, out: MatrixId },
    Sig { m: MatrixId, out: MatrixId },
    Relu { m: MatrixId, out: MatrixId },
    Add { a: MatrixId, b: MatrixId, out: MatrixId },
    Mul { a: MatrixId, b: MatrixId, out: MatrixId },
    Dot { a: MatrixId, b: MatrixId, out: MatrixId },
    Eltmul { a: MatrixId, b: MatrixId, out: MatrixId },
}

impl BackwardOp {
    /// Name of the forward operation that produced this record.
    pub fn name(&self) -> &'static str {
        match self {
            BackwardOp::RowPluck { .. } => "row_pluck",
            BackwardOp::Tanh { .. } => "tanh",
            BackwardOp::Sig { .. } => "sig",
            BackwardOp::Relu { .. } => "relu",
            BackwardOp::Add { .. } => "add",
            BackwardOp::Mul { .. } => "mul",
            BackwardOp::Dot { .. } => "dot",
            BackwardOp::Eltmul { .. } => "eltmul",
        }
    }

    /// Handle of the matrix this operation produced.
    pub fn output(&self) -> MatrixId {
        match *self {
            BackwardOp::RowPluck { out, .. }
            | BackwardOp::Tanh { out, .. }
            | BackwardOp::Sig { out, .. }
            | BackwardOp::Relu { out, .. }
            | BackwardOp::Add { out, .. }
            | BackwardOp::Mul { out, .. }
            | BackwardOp::Dot { out, .. }
            | BackwardOp::Eltmul { out, .. } => out,
        }
    }

    /// Handles of the operands, in forward argument order.
    pub fn inputs(&self) -> Vec<MatrixId> {
        match *self {
            BackwardOp::RowPluck { m, .. }
            | BackwardOp::Tanh { m, .. }
            | BackwardOp::Sig { m, .. }
            | BackwardOp::Relu { m, .. } => vec![m],
            BackwardOp::Add { a, b, .. }
            | BackwardOp::Mul { a, b, .. }
            | BackwardOp::Dot { a, b, .. }
            | BackwardOp::Eltmul { a, b, .. } => vec![a, b],
        }
    }

    /// Adds this operation's adjoint contributions into the gradients of its operands.
    ///
    /// All contributions are computed from the arena before any gradient is written,
    /// so operands that alias each other (`eltmul(a, a)`) receive the sum of both
    /// positions' contributions.
    ///
    /// # Errors
    /// `InvalidHandle` if a handle no longer refers to a live matrix (the arena was
    /// rewound while the tape still held the record).
    pub fn apply(&self, arena: &mut Arena) -> Result<(), TapeError> {
        match *self {
            BackwardOp::RowPluck { m, row, out } => {
                let (offset, dm) = ops::row_pluck_backward(arena.get(m)?, row, arena.get(out)?);
                arena.get_mut(m)?.accumulate_grad(offset, &dm);
            }
            BackwardOp::Tanh { m, out } => {
                let dm = ops::tanh_backward(arena.get(m)?, arena.get(out)?);
                arena.get_mut(m)?.accumulate_grad(0, &dm);
            }
            BackwardOp::Sig { m, out } => {
                let dm = ops::sig_backward(arena.get(m)?, arena.get(out)?);
                arena.get_mut(m)?.accumulate_grad(0, &dm);
            }
            BackwardOp::Relu { m, out } => {
                let dm = ops::relu_backward(arena.get(m)?, arena.get(out)?);
                arena.get_mut(m)?.accumulate_grad(0, &dm);
            }
            BackwardOp::Add { a, b, out } => {
                let grads = ops::add_backward(arena.get(a)?, arena.get(b)?, arena.get(out)?);
                accumulate_pair(arena, a, b, grads)?;
            }
            BackwardOp::Mul { a, b, out } => {
                let grads = ops::mul_backward(arena.get(a)?, arena.get(b)?, arena.get(out)?);
                accumulate_pair(arena, a, b, grads)?;
            }
            BackwardOp::Dot { a, b, out } => {
                let grads = ops::dot_backward(arena.get(a)?, arena.get(b)?, arena.get(out)?);
                accumulate_pair(arena, a, b, grads)?;
            }
            BackwardOp::Eltmul { a, b, out } => {
                let grads = ops::eltmul_backward(arena.get(a)?, arena.get(b)?, arena.get(out)?);
                accumulate_pair(arena, a, b, grads)?;
            }
        }
        Ok(())
    }
}

fn accumulate_pair(
    arena: &mut Arena,
    a: MatrixId,
    b: MatrixId,
    (da, db): (Vec<f64>, Vec<f64>),
) -> Result<(), TapeError> {
    arena.get_mut(a)?.accumulate_grad(0, &da);
    arena.get_mut(b)?.accumulate_grad(0, &db);
    Ok(())
}
