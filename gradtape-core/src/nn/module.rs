use crate::arena::{Arena, MatrixId};
use crate::error::TapeError;

/// The trait every trainable model implements to expose its parameters.
///
/// The engine knows nothing about network topology. A model keeps its parameter
/// matrices in an [`Arena`] and lists their handles under stable, unique names; the
/// [`RmsPropSolver`](crate::optim::RmsPropSolver) solver keys its per-parameter state by those
/// names, so a name must keep referring to a matrix of the same shape across steps.
pub trait Module {
    /// Returns every learnable parameter with its name, e.g. `"hidden.0.Wh"`.
    fn named_parameters(&self) -> Vec<(String, MatrixId)>;

    /// Returns the handles of all parameters, in `named_parameters` order.
    fn parameters(&self) -> Vec<MatrixId> {
        self.named_parameters().into_iter().map(|(_, id)| id).collect()
    }

    /// Plain gradient-descent step on every parameter, see [`Matrix::update`].
    ///
    /// [`Matrix::update`]: crate::Matrix::update
    ///
    /// # Errors
    /// `InvalidHandle` if a parameter handle is not present in `arena`.
    fn update(&self, arena: &mut Arena, alpha: f64) -> Result<(), TapeError> {
        for id in self.parameters() {
            arena.get_mut(id)?.update(alpha);
        }
        Ok(())
    }

    /// Resets the gradients of every parameter.
    fn zero_grad(&self, arena: &mut Arena) -> Result<(), TapeError> {
        for id in self.parameters() {
            arena.get_mut(id)?.zero_grad();
        }
        Ok(())
    }
}
