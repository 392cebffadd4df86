use crate::error::TapeError;
use crate::matrix::Matrix;
use crate::ops::check_same_shape;

/// Element-wise sum of two matrices of identical shape.
///
/// # Errors
/// `ShapeMismatch` tagged `"add"` if the shapes differ.
pub fn add_op(a: &Matrix, b: &Matrix) -> Result<Matrix, TapeError> {
    check_same_shape("add", a, b)?;
    let mut out = Matrix::zeros(a.rows(), a.cols());
    for ((o, &x), &y) in out.w_mut().iter_mut().zip(a.w()).zip(b.w()) {
        *o = x + y;
    }
    Ok(out)
}

/// Contributions `(da, db)` for `out = a + b`: both receive the upstream gradient as is.
pub fn add_backward(_a: &Matrix, _b: &Matrix, out: &Matrix) -> (Vec<f64>, Vec<f64>) {
    (out.dw().to_vec(), out.dw().to_vec())
}
