use crate::error::TapeError;
use crate::matrix::Matrix;
use crate::ops::check_same_shape;

/// Scalar product of two identically shaped matrices, returned as a `1×1` matrix.
///
/// # Errors
/// `ShapeMismatch` tagged `"dot"` if the shapes differ.
pub fn dot_op(a: &Matrix, b: &Matrix) -> Result<Matrix, TapeError> {
    check_same_shape("dot", a, b)?;
    let dot: f64 = a.w().iter().zip(b.w()).map(|(&x, &y)| x * y).sum();
    Matrix::from_vec(1, 1, vec![dot])
}

/// Contributions `(da, db)` for `out = a · b` (scalar): `da = b * dy[0]`, `db = a * dy[0]`.
pub fn dot_backward(a: &Matrix, b: &Matrix, out: &Matrix) -> (Vec<f64>, Vec<f64>) {
    let g = out.dw()[0];
    let da = b.w().iter().map(|&bv| bv * g).collect();
    let db = a.w().iter().map(|&av| av * g).collect();
    (da, db)
}
