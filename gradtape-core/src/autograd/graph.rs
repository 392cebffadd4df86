use crate::arena::{Arena, MatrixId};
use crate::autograd::backward_op::BackwardOp;
use crate::error::TapeError;
use crate::ops;
use crate::rng::NormalSampler;
use log::{debug, trace, warn};

/// Records forward matrix operations and replays their gradient contributions in
/// reverse.
///
/// Every operation computes its forward value with the matching [`ops`] function,
/// stores the result in the arena and returns its handle. While recording is enabled
/// (see [`Graph::memorize_operation_sequence`]) it also pushes a [`BackwardOp`] onto
/// the tape. [`Graph::backward`] walks the tape from the last record to the first,
/// which is the order that makes chain-rule accumulation correct for any DAG of
/// operations, not only a chain.
///
/// Typical cycle:
///
/// ```text
/// memorize_operation_sequence(true)
/// forward ops ...                  // tape grows
/// inject loss into output dw
/// backward(&mut arena)             // gradients accumulate
/// forget_current_sequence()        // tape cleared, ready for the next pass
/// ```
#[derive(Debug, Default)]
pub struct Graph {
    tape: Vec<BackwardOp>,
    recording: bool,
    replayed: bool,
}

impl Graph {
    /// Creates a graph with recording disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph that records from the first operation on.
    pub fn recording() -> Self {
        Graph {
            recording: true,
            ..Self::default()
        }
    }

    /// Enables or disables recording. Only operations issued after the call are
    /// affected; records already on the tape stay.
    pub fn memorize_operation_sequence(&mut self, enable: bool) {
        self.recording = enable;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Clears the tape, keeping its allocation for the next pass.
    pub fn forget_current_sequence(&mut self) {
        self.tape.clear();
        self.replayed = false;
    }

    pub fn len(&self) -> usize {
        self.tape.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tape.is_empty()
    }

    /// The recorded operations, in forward order.
    pub fn tape(&self) -> &[BackwardOp] {
        &self.tape
    }

    fn record(&mut self, op: BackwardOp) {
        if self.recording {
            self.tape.push(op);
        }
    }

    /// Replays the tape in reverse, accumulating every recorded contribution into
    /// the operands' gradients.
    ///
    /// The tape is not cleared. Calling `backward` again before
    /// [`Graph::forget_current_sequence`] would add every contribution a second time,
    /// so it is rejected.
    ///
    /// # Errors
    /// * `TapeAlreadyReplayed` on a second call without an intervening forget.
    /// * `InvalidHandle` if the arena was rewound past a recorded matrix. Every
    ///   handle on the tape is checked before the first record is applied, so no
    ///   gradient is touched in that case.
    pub fn backward(&mut self, arena: &mut Arena) -> Result<(), TapeError> {
        self.backward_with(arena, |_, _| {})
    }

    /// Same as [`Graph::backward`], calling `inspect(position, record)` right before
    /// each record is applied. `position` is the record's index in forward order.
    pub fn backward_with<F>(&mut self, arena: &mut Arena, mut inspect: F) -> Result<(), TapeError>
    where
        F: FnMut(usize, &BackwardOp),
    {
        if self.replayed {
            return Err(TapeError::TapeAlreadyReplayed {
                entries: self.tape.len(),
            });
        }
        if self.tape.is_empty() && !self.recording {
            warn!("Graph::backward called on an empty tape with recording disabled; no gradients will flow");
        }
        for op in &self.tape {
            arena.get(op.output())?;
            for id in op.inputs() {
                arena.get(id)?;
            }
        }
        debug!("Graph: replaying {} recorded operations", self.tape.len());
        for (position, op) in self.tape.iter().enumerate().rev() {
            trace!("Graph: backward #{} {}", position, op.name());
            inspect(position, op);
            op.apply(arena)?;
        }
        self.replayed = true;
        Ok(())
    }

    /// Plucks row `row` of `m` as a column vector.
    ///
    /// # Errors
    /// `IndexOutOfBounds` if `row` is not a row of `m`; `InvalidHandle` for a stale handle.
    pub fn row_pluck(&mut self, arena: &mut Arena, m: MatrixId, row: usize) -> Result<MatrixId, TapeError> {
        let value = ops::row_pluck_op(arena.get(m)?, row)?;
        let out = arena.insert(value);
        self.record(BackwardOp::RowPluck { m, row, out });
        Ok(out)
    }

    /// Element-wise gaussian sample with means `m` and standard deviations `std`.
    ///
    /// Never recorded, whatever the recording flag says.
    pub fn gauss(
        &mut self,
        arena: &mut Arena,
        m: MatrixId,
        std: MatrixId,
        sampler: &mut NormalSampler,
    ) -> Result<MatrixId, TapeError> {
        let value = ops::gauss_op(arena.get(m)?, arena.get(std)?, sampler)?;
        Ok(arena.insert(value))
    }

    pub fn tanh(&mut self, arena: &mut Arena, m: MatrixId) -> Result<MatrixId, TapeError> {
        let value = ops::tanh_op(arena.get(m)?);
        let out = arena.insert(value);
        self.record(BackwardOp::Tanh { m, out });
        Ok(out)
    }

    pub fn sig(&mut self, arena: &mut Arena, m: MatrixId) -> Result<MatrixId, TapeError> {
        let value = ops::sig_op(arena.get(m)?);
        let out = arena.insert(value);
        self.record(BackwardOp::Sig { m, out });
        Ok(out)
    }

    pub fn relu(&mut self, arena: &mut Arena, m: MatrixId) -> Result<MatrixId, TapeError> {
        let value = ops::relu_op(arena.get(m)?);
        let out = arena.insert(value);
        self.record(BackwardOp::Relu { m, out });
        Ok(out)
    }

    /// Matrix product `a · b`.
    ///
    /// # Errors
    /// `ShapeMismatch` tagged `"mul"` if `a.cols != b.rows`. Nothing is inserted or
    /// recorded in that case.
    pub fn mul(&mut self, arena: &mut Arena, a: MatrixId, b: MatrixId) -> Result<MatrixId, TapeError> {
        let value = ops::mul_op(arena.get(a)?, arena.get(b)?)?;
        let out = arena.insert(value);
        self.record(BackwardOp::Mul { a, b, out });
        Ok(out)
    }

    pub fn add(&mut self, arena: &mut Arena, a: MatrixId, b: MatrixId) -> Result<MatrixId, TapeError> {
        let value = ops::add_op(arena.get(a)?, arena.get(b)?)?;
        let out = arena.insert(value);
        self.record(BackwardOp::Add { a, b, out });
        Ok(out)
    }

    /// Scalar product of two identically shaped matrices, as a `1×1` matrix.
    pub fn dot(&mut self, arena: &mut Arena, a: MatrixId, b: MatrixId) -> Result<MatrixId, TapeError> {
        let value = ops::dot_op(arena.get(a)?, arena.get(b)?)?;
        let out = arena.insert(value);
        self.record(BackwardOp::Dot { a, b, out });
        Ok(out)
    }

    pub fn eltmul(&mut self, arena: &mut Arena, a: MatrixId, b: MatrixId) -> Result<MatrixId, TapeError> {
        let value = ops::eltmul_op(arena.get(a)?, arena.get(b)?)?;
        let out = arena.insert(value);
        self.record(BackwardOp::Eltmul { a, b, out });
        Ok(out)
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
