use crate::matrix::Matrix;
use crate::ops::map_elements;

/// Applies the Rectified Linear Unit element-wise: `max(0, x)`. NaN passes through and
/// `-0.0` becomes `0.0`.
pub fn relu_op(m: &Matrix) -> Matrix {
    map_elements(m, |x| if x <= 0.0 { 0.0 } else { x })
}

/// Contribution to `dm` for `out = relu(m)`: the upstream gradient where the input was
/// strictly positive, zero elsewhere (including at `x == 0`).
pub fn relu_backward(m: &Matrix, out: &Matrix) -> Vec<f64> {
    m.w()
        .iter()
        .zip(out.dw())
        .map(|(&x, &dy)| if x > 0.0 { dy } else { 0.0 })
        .collect()
}
