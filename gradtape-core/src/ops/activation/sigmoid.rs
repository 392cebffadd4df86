use crate::matrix::Matrix;
use crate::ops::map_elements;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Element-wise logistic sigmoid, `1 / (1 + e^-x)`.
pub fn sig_op(m: &Matrix) -> Matrix {
    map_elements(m, sigmoid)
}

/// Contribution to `dm` for `out = sig(m)`: `y * (1 - y) * dy`.
pub fn sig_backward(_m: &Matrix, out: &Matrix) -> Vec<f64> {
    out.w()
        .iter()
        .zip(out.dw())
        .map(|(&y, &dy)| y * (1.0 - y) * dy)
        .collect()
}
