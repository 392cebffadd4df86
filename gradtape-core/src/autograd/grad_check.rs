use crate::arena::{Arena, MatrixId};
use crate::autograd::graph::Graph;
use crate::error::TapeError;
use crate::matrix::Matrix;
use approx::relative_eq;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: analytical {analytical_grad:?} != numerical {numerical_grad:?} (difference {difference:?})")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Output gradient has {actual} elements but the function output has {expected}")]
    OutputGradLength { expected: usize, actual: usize },
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Analytical gradient is NaN or infinite for input {input_index}, element {element_index}. Value: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },
    #[error("Engine error during gradient check: {0}")]
    TapeError(TapeError),
}

impl From<TapeError> for GradCheckError {
    fn from(err: TapeError) -> Self {
        GradCheckError::TapeError(err)
    }
}

/// Compares the gradients produced by the tape against central finite differences.
///
/// The scalar loss is `L = Σ out[i] * output_grad[i]`, so `output_grad` is exactly the
/// upstream gradient injected into the output before the analytical backward pass.
///
/// `func` receives a fresh graph, arena and the handles of copies of `inputs`, and must
/// return the handle of its output. It runs once with recording enabled for the
/// analytical gradients and twice per input element, with recording disabled, for the
/// numerical ones.
///
/// Gradients match when they are within `abs_tol` of each other or within `rel_tol`
/// relative to the larger magnitude.
pub fn check_grad<F>(
    func: F,
    inputs: &[Matrix],
    output_grad: &[f64],
    epsilon: f64,
    abs_tol: f64,
    rel_tol: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&mut Graph, &mut Arena, &[MatrixId]) -> Result<MatrixId, TapeError>,
{
    // --- Analytical gradients ---
    let mut arena = Arena::new();
    let ids: Vec<MatrixId> = inputs.iter().map(|m| arena.insert(m.clone())).collect();
    let mut graph = Graph::recording();
    let out = func(&mut graph, &mut arena, &ids)?;
    {
        let out_m = arena.get_mut(out)?;
        if out_m.len() != output_grad.len() {
            return Err(GradCheckError::OutputGradLength {
                expected: out_m.len(),
                actual: output_grad.len(),
            });
        }
        out_m.dw_mut().copy_from_slice(output_grad);
    }
    graph.backward(&mut arena)?;
    let analytical: Vec<Vec<f64>> = ids.iter().map(|&id| arena[id].dw().to_vec()).collect();

    // --- Numerical gradients ---
    for (input_index, original) in inputs.iter().enumerate() {
        for element_index in 0..original.len() {
            let loss_plus = perturbed_loss(&func, inputs, input_index, element_index, epsilon, output_grad)?;
            let loss_minus = perturbed_loss(&func, inputs, input_index, element_index, -epsilon, output_grad)?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);
            let analytical_grad = analytical[input_index][element_index];

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index,
                    element_index,
                    loss_plus,
                    loss_minus,
                });
            }
            if !analytical_grad.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index,
                    element_index,
                    value: analytical_grad,
                });
            }
            if !relative_eq!(analytical_grad, numerical_grad, epsilon = abs_tol, max_relative = rel_tol) {
                return Err(GradCheckError::GradientMismatch {
                    input_index,
                    element_index,
                    analytical_grad,
                    numerical_grad,
                    difference: (analytical_grad - numerical_grad).abs(),
                });
            }
        }
    }
    Ok(())
}

/// Loss of `func` with element `element_index` of input `input_index` shifted by `delta`.
fn perturbed_loss<F>(
    func: &F,
    inputs: &[Matrix],
    input_index: usize,
    element_index: usize,
    delta: f64,
    output_grad: &[f64],
) -> Result<f64, GradCheckError>
where
    F: Fn(&mut Graph, &mut Arena, &[MatrixId]) -> Result<MatrixId, TapeError>,
{
    let mut arena = Arena::new();
    let ids: Vec<MatrixId> = inputs
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let mut m = m.clone();
            if i == input_index {
                m.w_mut()[element_index] += delta;
            }
            arena.insert(m)
        })
        .collect();
    let mut graph = Graph::new();
    let out = func(&mut graph, &mut arena, &ids)?;
    Ok(arena
        .get(out)?
        .w()
        .iter()
        .zip(output_grad)
        .map(|(&y, &g)| y * g)
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_with_wrong_rule(graph: &mut Graph, arena: &mut Arena, ids: &[MatrixId]) -> Result<MatrixId, TapeError> {
        // add(x, x) has derivative 2, but the numerical probe below sees 3x.
        let doubled = graph.add(arena, ids[0], ids[0])?;
        if graph.is_recording() {
            Ok(doubled)
        } else {
            graph.add(arena, doubled, ids[0])
        }
    }

    #[test]
    fn test_check_grad_detects_mismatch() {
        let x = Matrix::from_vec(1, 2, vec![0.3, -0.7]).unwrap();
        let result = check_grad(square_with_wrong_rule, &[x], &[1.0, 1.0], 1e-5, 1e-6, 1e-6);
        match result {
            Err(GradCheckError::GradientMismatch { analytical_grad, numerical_grad, .. }) => {
                assert!((analytical_grad - 2.0).abs() < 1e-9);
                assert!((numerical_grad - 3.0).abs() < 1e-6);
            }
            other => panic!("Expected GradientMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_check_grad_rejects_wrong_output_grad_length() {
        let x = Matrix::from_vec(2, 1, vec![0.1, 0.2]).unwrap();
        let result = check_grad(
            |g: &mut Graph, a: &mut Arena, ids: &[MatrixId]| g.tanh(a, ids[0]),
            &[x],
            &[1.0],
            1e-5,
            1e-6,
            1e-6,
        );
        assert_eq!(
            result,
            Err(GradCheckError::OutputGradLength { expected: 2, actual: 1 })
        );
    }
}
