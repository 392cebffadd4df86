use crate::error::TapeError;
use crate::matrix::Matrix;

/// Standard matrix product `a (n×k) · b (k×m) → (n×m)`.
///
/// # Errors
/// `ShapeMismatch` tagged `"mul"` if `a.cols() != b.rows()`.
pub fn mul_op(a: &Matrix, b: &Matrix) -> Result<Matrix, TapeError> {
    if a.cols() != b.rows() {
        return Err(TapeError::ShapeMismatch {
            operation: "mul".to_string(),
            left: a.shape(),
            right: b.shape(),
        });
    }
    let (n, k, m) = (a.rows(), a.cols(), b.cols());
    let (aw, bw) = (a.w(), b.w());
    let mut out = Matrix::zeros(n, m);
    let ow = out.w_mut();
    for row in 0..n {
        for col in 0..m {
            let mut dot = 0.0;
            for i in 0..k {
                dot += aw[row * k + i] * bw[i * m + col];
            }
            ow[row * m + col] = dot;
        }
    }
    Ok(out)
}

/// Contributions `(da, db)` for `out = a · b`:
/// `da[i,k] += b[k,j] * dy[i,j]` and `db[k,j] += a[i,k] * dy[i,j]` over all `i, j, k`.
pub fn mul_backward(a: &Matrix, b: &Matrix, out: &Matrix) -> (Vec<f64>, Vec<f64>) {
    let (n, k, m) = (a.rows(), a.cols(), b.cols());
    let (aw, bw, dy) = (a.w(), b.w(), out.dw());
    let mut da = vec![0.0; a.len()];
    let mut db = vec![0.0; b.len()];
    for i in 0..n {
        for j in 0..m {
            let g = dy[i * m + j];
            for p in 0..k {
                da[i * k + p] += bw[p * m + j] * g;
                db[p * m + j] += aw[i * k + p] * g;
            }
        }
    }
    (da, db)
}
