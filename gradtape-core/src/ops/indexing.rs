use crate::error::TapeError;
use crate::matrix::Matrix;

/// Copies row `row` of `m` into a new `cols×1` column vector.
///
/// # Errors
/// `IndexOutOfBounds` if `row >= m.rows()`.
pub fn row_pluck_op(m: &Matrix, row: usize) -> Result<Matrix, TapeError> {
    if row >= m.rows() {
        return Err(TapeError::IndexOutOfBounds {
            index: (row, 0),
            shape: m.shape(),
        });
    }
    let cols = m.cols();
    let start = row * cols;
    Matrix::from_vec(cols, 1, m.w()[start..start + cols].to_vec())
}

/// Contribution for `out = row_pluck(m, row)`.
///
/// Only the plucked row receives gradient, so the contribution is returned together
/// with the offset of that row inside `m`'s buffer: `dm[offset + i] += values[i]`.
pub fn row_pluck_backward(m: &Matrix, row: usize, out: &Matrix) -> (usize, Vec<f64>) {
    (row * m.cols(), out.dw().to_vec())
}
