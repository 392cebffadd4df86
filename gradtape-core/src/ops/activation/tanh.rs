use crate::matrix::Matrix;
use crate::ops::map_elements;

/// Element-wise hyperbolic tangent.
pub fn tanh_op(m: &Matrix) -> Matrix {
    map_elements(m, f64::tanh)
}

/// Contribution to `dm` for `out = tanh(m)`: `(1 - y^2) * dy`.
pub fn tanh_backward(_m: &Matrix, out: &Matrix) -> Vec<f64> {
    out.w()
        .iter()
        .zip(out.dw())
        .map(|(&y, &dy)| (1.0 - y * y) * dy)
        .collect()
}
