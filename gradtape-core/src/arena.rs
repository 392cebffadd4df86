//! Owning store for every [`Matrix`] a computation touches.
//!
//! Tape entries refer to matrices through copyable [`MatrixId`] handles instead of
//! references, so one matrix can appear in any number of recorded operations. Gradient
//! contributions from all of them land in the same `dw` buffer, which is what makes
//! fan-in accumulate correctly.
//!
//! Parameters are usually inserted first. Taking a [`Checkpoint`] right after and
//! rewinding to it once a training step is done drops the per-pass intermediates
//! while keeping the parameters (and their handles) alive.

use crate::error::TapeError;
use crate::matrix::Matrix;
use std::ops::{Index, IndexMut};

/// Stable handle of a matrix stored in an [`Arena`].
///
/// A handle remembers the generation of the slot it was issued for. Once
/// [`Arena::rewind`] drops that slot, the handle stays invalid even after a later
/// insert reuses the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatrixId {
    index: usize,
    generation: u64,
}

impl MatrixId {
    /// Position of the matrix inside its arena.
    pub fn index(self) -> usize {
        self.index
    }
}

/// Arena length captured by [`Arena::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

#[derive(Debug, Default, Clone)]
pub struct Arena {
    matrices: Vec<Matrix>,
    // Generation each slot was filled in, parallel to `matrices`.
    slot_generations: Vec<u64>,
    generation: u64,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `m` into the arena and returns its handle.
    pub fn insert(&mut self, m: Matrix) -> MatrixId {
        self.matrices.push(m);
        self.slot_generations.push(self.generation);
        MatrixId {
            index: self.matrices.len() - 1,
            generation: self.generation,
        }
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// True if `id` refers to a live matrix of this arena.
    pub fn contains(&self, id: MatrixId) -> bool {
        self.slot_generations.get(id.index) == Some(&id.generation)
    }

    fn check(&self, id: MatrixId) -> Result<usize, TapeError> {
        if self.contains(id) {
            Ok(id.index)
        } else {
            Err(TapeError::InvalidHandle {
                id: id.index,
                len: self.matrices.len(),
            })
        }
    }

    /// # Errors
    /// `InvalidHandle` if `id` does not refer to a live matrix.
    pub fn get(&self, id: MatrixId) -> Result<&Matrix, TapeError> {
        let ix = self.check(id)?;
        Ok(&self.matrices[ix])
    }

    /// # Errors
    /// `InvalidHandle` if `id` does not refer to a live matrix.
    pub fn get_mut(&mut self, id: MatrixId) -> Result<&mut Matrix, TapeError> {
        let ix = self.check(id)?;
        Ok(&mut self.matrices[ix])
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.matrices.len())
    }

    /// Drops every matrix inserted after `checkpoint` was taken. Their handles become
    /// invalid for good; handles issued before the checkpoint keep working.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.matrices.truncate(checkpoint.0);
        self.slot_generations.truncate(checkpoint.0);
        self.generation += 1;
    }

    /// Resets the gradient buffer of every stored matrix.
    pub fn zero_grad(&mut self) {
        for m in self.matrices.iter_mut() {
            m.zero_grad();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MatrixId, &Matrix)> {
        self.matrices
            .iter()
            .zip(&self.slot_generations)
            .enumerate()
            .map(|(index, (m, &generation))| (MatrixId { index, generation }, m))
    }
}

/// Panics on an invalid handle, like slice indexing. Use [`Arena::get`] for a
/// fallible lookup.
impl Index<MatrixId> for Arena {
    type Output = Matrix;

    fn index(&self, id: MatrixId) -> &Matrix {
        match self.get(id) {
            Ok(m) => m,
            Err(e) => panic!("{}", e),
        }
    }
}

impl IndexMut<MatrixId> for Arena {
    fn index_mut(&mut self, id: MatrixId) -> &mut Matrix {
        match self.check(id) {
            Ok(ix) => &mut self.matrices[ix],
            Err(e) => panic!("{}", e),
        }
    }
}
