use crate::error::TapeError;
use crate::matrix::Matrix;
use crate::ops::check_same_shape;

/// Element-wise (Hadamard) product of two matrices of identical shape.
///
/// # Errors
/// `ShapeMismatch` tagged `"eltmul"` if the shapes differ.
pub fn eltmul_op(a: &Matrix, b: &Matrix) -> Result<Matrix, TapeError> {
    check_same_shape("eltmul", a, b)?;
    let mut out = Matrix::zeros(a.rows(), a.cols());
    for ((o, &x), &y) in out.w_mut().iter_mut().zip(a.w()).zip(b.w()) {
        *o = x * y;
    }
    Ok(out)
}

/// Contributions `(da, db)` for `out = a ⊙ b`: `da = b ⊙ dy`, `db = a ⊙ dy`.
pub fn eltmul_backward(a: &Matrix, b: &Matrix, out: &Matrix) -> (Vec<f64>, Vec<f64>) {
    let dy = out.dw();
    let da = b.w().iter().zip(dy).map(|(&bv, &g)| bv * g).collect();
    let db = a.w().iter().zip(dy).map(|(&av, &g)| av * g).collect();
    (da, db)
}
